//! stockdash-core: shared library for the stockdash dashboard.
//!
//! Provides:
//! - `store`: table sources (PostgreSQL, in-memory mock) and the dataset allow-list
//! - `table`: in-memory tabular snapshots with typed cells
//! - `models`: typed rows decoded from tables
//! - `chart`: serializable chart specifications (bar, area, pie, heatmap)
//! - `views`: the five dashboard views and their controls
//! - `session`: per-process session owning the store, lazy per-view loading
//! - `fmt`: shared rounding and date helpers
//!
//! With `api` feature:
//! - OpenAPI schemas (`utoipa`) on every JSON-facing type

pub mod chart;
pub mod fmt;
pub mod models;
pub mod session;
pub mod store;
pub mod table;
pub mod views;

pub use session::Session;
pub use store::{Catalog, Dataset, MockStore, PostgresStore, StoreError, TableSource};
pub use table::{Table, Value};
pub use views::{ViewError, ViewKind, ViewPage, ViewParams};

/// Crate version reported by the web server and CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
