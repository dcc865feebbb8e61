//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::{OrderRepository, ProductRepository, RepositoryError, Store, UserRepository};
use crate::services::auth::{self, AuthError, AuthService};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to open data directory: {0}")]
    Store(#[from] RepositoryError),
    #[error("failed to migrate legacy passwords: {0}")]
    Migration(#[from] AuthError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; every clone sees the same collections.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    store: Store,
}

impl AppState {
    /// Open the collections under `config.data_dir` and migrate legacy users.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created or the
    /// legacy password migration cannot be written.
    pub async fn open(config: ServerConfig) -> Result<Self, StateError> {
        let store = Store::open_dir(&config.data_dir)?;
        Self::with_store(config, store).await
    }

    /// Build the state around an already opened store.
    ///
    /// # Errors
    ///
    /// Returns an error if the legacy password migration fails.
    pub async fn with_store(config: ServerConfig, store: Store) -> Result<Self, StateError> {
        let migrated = auth::migrate_legacy_passwords(&store.users).await?;
        if migrated > 0 {
            tracing::info!(count = migrated, "Hashed legacy plaintext passwords");
        }

        Ok(Self {
            inner: Arc::new(AppStateInner { config, store }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the collections.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    #[must_use]
    pub fn users(&self) -> &UserRepository {
        &self.inner.store.users
    }

    #[must_use]
    pub fn products(&self) -> &ProductRepository {
        &self.inner.store.products
    }

    #[must_use]
    pub fn orders(&self) -> &OrderRepository {
        &self.inner.store.orders
    }

    /// Authentication service over this state's users and admin credentials.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.users(), &self.inner.config.admin)
    }
}
