use std::path::PathBuf;
use std::sync::Arc;

use manifesto_core::{Catalog, ReplayEngine, SnapshotSet};

/// Default listen address
pub const DEFAULT_ADDR: &str = "0.0.0.0:3001";

/// Server settings read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// `MANIFESTO_RECORDING`: simulation recording answering household requests
    pub recording: Option<PathBuf>,
    /// `MANIFESTO_SNAPSHOTS`: directory of exported snapshot tables
    pub snapshots: Option<PathBuf>,
    /// `MANIFESTO_ADDR`
    pub addr: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let path = |key: &str| var(key).filter(|v| !v.is_empty()).map(PathBuf::from);
        Self {
            recording: path("MANIFESTO_RECORDING"),
            snapshots: path("MANIFESTO_SNAPSHOTS"),
            addr: var("MANIFESTO_ADDR")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_ADDR.to_string()),
        }
    }
}

/// Shared, read-only request state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ReplayEngine>,
    pub catalog: Arc<Catalog>,
    pub snapshots: Option<Arc<SnapshotSet>>,
}

impl AppState {
    pub fn new(engine: ReplayEngine, catalog: Catalog, snapshots: Option<SnapshotSet>) -> Self {
        Self {
            engine: Arc::new(engine),
            catalog: Arc::new(catalog),
            snapshots: snapshots.map(Arc::new),
        }
    }
}
