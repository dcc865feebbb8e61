//! Product repository.

use std::sync::Arc;

use tany_orders_core::{ItemCode, Product, catalog};

use super::{Collection, DocumentBackend, RepositoryError};

/// Collection name of the product document.
pub const PRODUCTS: &str = "products";

/// Repository for the catalog.
#[derive(Debug)]
pub struct ProductRepository {
    collection: Collection<Vec<Product>>,
}

impl ProductRepository {
    #[must_use]
    pub fn open(backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            collection: Collection::open(PRODUCTS, backend),
        }
    }

    /// Whether the document was read successfully at startup.
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        self.collection.is_verified()
    }

    /// All products, in upload order.
    pub async fn all(&self) -> Vec<Product> {
        self.collection.snapshot().await
    }

    /// Run `f` against the product list without copying it.
    pub async fn read<R>(&self, f: impl FnOnce(&[Product]) -> R) -> R {
        self.collection.read(|products| f(products)).await
    }

    /// Get a product by item code.
    pub async fn find(&self, item_code: &ItemCode) -> Option<Product> {
        self.read(|products| catalog::find(products, item_code).cloned())
            .await
    }

    /// Replace the whole catalog. Returns the new product count.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the write fails; the old catalog is kept.
    pub async fn replace_all(&self, products: Vec<Product>) -> Result<usize, RepositoryError> {
        self.collection
            .update(|current| {
                *current = products;
                Ok(current.len())
            })
            .await
    }
}
