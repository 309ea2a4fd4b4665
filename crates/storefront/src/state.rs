//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::db::{ADMINS_FILE, JsonStore, USERS_FILE, WATCHES_FILE};
use crate::models::{AdminRecord, UserRecord, WatchRecord};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Each data file has exactly
/// one `JsonStore`, so every handler writing it shares the same lock.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    users: JsonStore<UserRecord>,
    watches: JsonStore<WatchRecord>,
    admins: JsonStore<AdminRecord>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The stores point into `config.data_dir`; no file is read here.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let users = JsonStore::new(config.data_dir.join(USERS_FILE));
        let watches = JsonStore::new(config.data_dir.join(WATCHES_FILE));
        let admins = JsonStore::new(config.data_dir.join(ADMINS_FILE));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                users,
                watches,
                admins,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The `users.json` store.
    #[must_use]
    pub fn users(&self) -> &JsonStore<UserRecord> {
        &self.inner.users
    }

    /// The `watches.json` store.
    #[must_use]
    pub fn watches(&self) -> &JsonStore<WatchRecord> {
        &self.inner.watches
    }

    /// The `admins.json` store.
    #[must_use]
    pub fn admins(&self) -> &JsonStore<AdminRecord> {
        &self.inner.admins
    }
}
