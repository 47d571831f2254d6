//! Table sources.
//!
//! A [`TableSource`] turns a logical [`Dataset`] into a full-table snapshot.
//! Identifiers never come from user text: every dataset resolves through the
//! [`Catalog`] allow-list.
//!
//! ```text
//!                ┌─────────────┐
//!                │   Session   │
//!                └──────┬──────┘
//!                       │ Dataset
//!                ┌──────▼──────┐
//!                │ TableSource │ (trait)
//!                └──────┬──────┘
//!              ┌────────┴────────┐
//!       ┌──────▼──────┐   ┌──────▼──────┐
//!       │PostgresStore│   │  MockStore  │
//!       │ (production)│   │(demo, tests)│
//!       └─────────────┘   └─────────────┘
//! ```

pub mod catalog;
pub mod mock;
mod postgres;

pub use catalog::{Catalog, Dataset, Ticker};
pub use mock::MockStore;
pub use postgres::PostgresStore;

use crate::table::Table;

/// Error type for table loading.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Environment variable not set.
    EnvNotSet(String),
    /// The store is unreachable.
    ConnectionError(String),
    /// The table does not exist or the query failed.
    QueryError(String),
    /// The requested dataset is not on the allow-list.
    UnknownDataset(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::EnvNotSet(var) => write!(f, "store: {} not set", var),
            StoreError::ConnectionError(msg) => write!(f, "store connection error: {}", msg),
            StoreError::QueryError(msg) => write!(f, "store query error: {}", msg),
            StoreError::UnknownDataset(name) => write!(f, "unknown dataset: {}", name),
        }
    }
}

impl std::error::Error for StoreError {}

/// Source of full-table snapshots.
///
/// Implementations are used sequentially by one [`crate::Session`]; they do
/// not need to be `Sync`.
pub trait TableSource {
    /// Loads the full contents of `dataset`.
    fn load(&mut self, dataset: &Dataset) -> Result<Table, StoreError>;

    /// Short human-readable description for logs (never contains secrets).
    fn describe(&self) -> String;
}

impl<T: TableSource + ?Sized> TableSource for Box<T> {
    fn load(&mut self, dataset: &Dataset) -> Result<Table, StoreError> {
        (**self).load(dataset)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
