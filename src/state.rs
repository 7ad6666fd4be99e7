use std::sync::Arc;
use crate::config::Config;
use crate::services::Store;

// Application state that can be shared between handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Store, config: Config) -> Self {
        Self { store, config: Arc::new(config) }
    }
}

#[cfg(test)]
impl AppState {
    pub fn for_tests() -> Self {
        Self::new(Store::memory(), Config::for_tests())
    }
}
