//! Application state for the payroll engine API.

use std::sync::Arc;

use crate::config::ConfigLoader;

/// Shared application state.
///
/// The configuration is read-only once loaded, so every request sees a
/// consistent catalog snapshot.
#[derive(Clone)]
pub struct AppState {
    /// The loaded payroll configuration.
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }
}
