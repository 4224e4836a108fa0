//! Application state management

use trainbook_core::{AppConfig, Store};

use crate::auth::AuthService;

/// Application state shared across requests
///
/// Built once in `main` and injected into every GraphQL request's data;
/// nothing in the API reaches for a process-global handle.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// PostgreSQL store
    pub store: Store,
    /// Authentication service
    pub auth: AuthService,
}

impl AppState {
    /// Create new application state
    pub fn new(config: AppConfig, store: Store) -> Self {
        let auth = AuthService::new(store.clone(), &config.auth);
        Self {
            config,
            store,
            auth,
        }
    }
}
