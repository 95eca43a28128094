//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::SignupConfig;
use crate::db::AccountStore;
use crate::services::SignupService;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The account store is injected rather than
/// referenced globally, so tests can swap in the in-memory store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SignupConfig,
    accounts: Arc<dyn AccountStore>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: SignupConfig, accounts: Arc<dyn AccountStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, accounts }),
        }
    }

    /// Get a reference to the service configuration.
    #[must_use]
    pub fn config(&self) -> &SignupConfig {
        &self.inner.config
    }

    /// Get a reference to the account store.
    #[must_use]
    pub fn accounts(&self) -> &Arc<dyn AccountStore> {
        &self.inner.accounts
    }

    /// Build a signup service over the shared store.
    #[must_use]
    pub fn signup(&self) -> SignupService {
        SignupService::new(
            Arc::clone(&self.inner.accounts),
            self.inner.config.bcrypt_cost,
        )
    }
}
