//! Shared application state and the global allocator.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::sync::{Arc, Mutex};

use axum::extract::State;

use stockdash_core::{Session, TableSource};

/// The table source chosen at startup (PostgreSQL or demo data).
pub(crate) type DynSource = Box<dyn TableSource + Send>;

/// One session per process. Requests lock it for the duration of a render.
pub(crate) type SharedSession = Arc<Mutex<Session<DynSource>>>;

#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) session: SharedSession,
    /// Table source description, captured once at startup.
    pub(crate) source: Arc<str>,
}

pub(crate) type AppState = State<AppContext>;

pub(crate) fn shared(session: Session<DynSource>) -> AppContext {
    let source = Arc::from(session.source().describe());
    AppContext {
        session: Arc::new(Mutex::new(session)),
        source,
    }
}
