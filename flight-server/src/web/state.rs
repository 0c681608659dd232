//! Application state for the web layer.

use std::sync::Arc;

use crate::planner::SearchConfig;
use crate::store::{CachedStore, MemoryStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Cached flight graph
    pub store: Arc<CachedStore<MemoryStore>>,

    /// Route planner configuration
    pub config: Arc<SearchConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(store: CachedStore<MemoryStore>, config: SearchConfig) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}
