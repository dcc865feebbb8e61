//! Persistence for the three JSON collections.
//!
//! # Collections
//!
//! - `users.json` - Customer accounts keyed by email
//! - `products.json` - The catalog, replaced wholesale on upload
//! - `orders.json` - Submitted orders, append-only
//!
//! Each collection is read once at startup and then held in memory behind
//! its own async mutex. A write runs clone → mutate → atomic write → commit
//! while holding the mutex, so a failed write leaves memory untouched and
//! concurrent writers to the same collection are serialized.
//!
//! # Load policy
//!
//! | On disk | Result |
//! |---------|--------|
//! | missing | empty collection |
//! | not valid JSON | warning, file copied to `<file>.corrupt`, empty collection |
//! | unreadable | error, empty collection marked unverified: writes are refused |

pub mod backend;
pub mod collection;
pub mod orders;
pub mod products;
pub mod users;

use std::path::PathBuf;

use thiserror::Error;

use tany_orders_core::SubmissionId;

pub use backend::{DocumentBackend, JsonFileStore, MemoryBackend};
pub use collection::Collection;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Reading or writing a collection document failed.
    #[error("i/o error on {collection}: {source}")]
    Io {
        collection: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Encoding a collection document failed.
    #[error("serialization error on {collection}: {source}")]
    Serialization {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The collection could not be read at startup; writing would overwrite it.
    #[error("{0} could not be read at startup; refusing to overwrite it")]
    Unverified(&'static str),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// An order with this submission id already exists.
    #[error("submission {0} was already stored")]
    DuplicateSubmission(SubmissionId),
}

/// The three collections, opened against one backend.
#[derive(Debug)]
pub struct Store {
    pub users: UserRepository,
    pub products: ProductRepository,
    pub orders: OrderRepository,
}

impl Store {
    /// Open every collection, applying the load policy to each.
    #[must_use]
    pub fn open(backend: &std::sync::Arc<dyn DocumentBackend>) -> Self {
        Self {
            users: UserRepository::open(backend.clone()),
            products: ProductRepository::open(backend.clone()),
            orders: OrderRepository::open(backend.clone()),
        }
    }

    /// Open the collections stored under `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the directory cannot be created.
    pub fn open_dir(data_dir: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let backend: std::sync::Arc<dyn DocumentBackend> =
            std::sync::Arc::new(JsonFileStore::create(data_dir)?);
        Ok(Self::open(&backend))
    }

    /// Names of the collections that refuse writes because they could not
    /// be read at startup.
    #[must_use]
    pub fn unverified(&self) -> Vec<&'static str> {
        [
            (users::USERS, self.users.is_verified()),
            (products::PRODUCTS, self.products.is_verified()),
            (orders::ORDERS, self.orders.is_verified()),
        ]
        .into_iter()
        .filter_map(|(name, verified)| (!verified).then_some(name))
        .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_store_reports_unverified_collections() {
        let backend: Arc<dyn DocumentBackend> = Arc::new(
            MemoryBackend::new()
                .with_document(products::PRODUCTS, "not json")
                .with_unreadable(orders::ORDERS),
        );
        let store = Store::open(&backend);

        // Corrupt documents are quarantined and writable again; unreadable ones are not.
        assert_eq!(store.unverified(), vec![orders::ORDERS]);
    }
}
