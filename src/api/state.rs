//! Application state for the payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::store::DocumentStore;

/// Shared application state.
///
/// Holds the loaded configuration and the store of generated documents.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    store: Arc<DocumentStore>,
}

impl AppState {
    /// Creates the state, sizing the document store from the configuration.
    pub fn new(config: ConfigLoader) -> Self {
        let store = DocumentStore::from_config(&config.config().store);
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the generated-document store.
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }
}
