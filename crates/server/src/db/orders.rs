//! Order repository. Orders are only ever appended.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use tany_orders_core::{Order, OrderDraft, OrderId};

use super::{Collection, DocumentBackend, RepositoryError};

/// Collection name of the order document.
pub const ORDERS: &str = "orders";

/// Repository for submitted orders.
#[derive(Debug)]
pub struct OrderRepository {
    collection: Collection<Vec<Order>>,
}

impl OrderRepository {
    #[must_use]
    pub fn open(backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            collection: Collection::open(ORDERS, backend),
        }
    }

    /// Whether the document was read successfully at startup.
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        self.collection.is_verified()
    }

    /// All orders, oldest first.
    pub async fn all(&self) -> Vec<Order> {
        self.collection.snapshot().await
    }

    pub async fn count(&self) -> usize {
        self.collection.read(Vec::len).await
    }

    /// Stamp `draft` with a fresh id and `at`, then append it.
    ///
    /// The duplicate check and id generation run under the collection lock,
    /// so two confirmations of one submission store a single order and no
    /// two orders share an id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DuplicateSubmission` if an order for this
    /// submission already exists, or a persistence error if the write fails.
    pub async fn append(
        &self,
        draft: OrderDraft,
        at: DateTime<Utc>,
    ) -> Result<Order, RepositoryError> {
        self.collection
            .update(|orders| {
                let submission_id = draft.submission_id;
                if orders
                    .iter()
                    .any(|o| o.submission_id == Some(submission_id))
                {
                    return Err(RepositoryError::DuplicateSubmission(submission_id));
                }

                let mut order_id = OrderId::generate(at);
                while orders.iter().any(|o| o.order_id == order_id) {
                    order_id = OrderId::generate(at);
                }

                let order = draft.into_order(order_id, at);
                orders.push(order.clone());
                Ok(order)
            })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::db::MemoryBackend;
    use tany_orders_core::{
        CartLine, CustomerProfile, Email, ItemCode, Quantity, SubmissionId, UnitOfMeasure,
    };

    fn draft(submission_id: SubmissionId) -> OrderDraft {
        OrderDraft {
            customer: CustomerProfile {
                email: Email::parse("ann@acme.com").unwrap(),
                first_name: "Ann".to_string(),
                last_name: "Lee".to_string(),
                company_name: "Acme".to_string(),
            },
            items: vec![CartLine {
                item_code: ItemCode::parse("SKU1").unwrap(),
                description: "Rice 5kg".to_string(),
                brand: String::new(),
                unit_of_measure: UnitOfMeasure::Case,
                quantity: Quantity::new(3).unwrap(),
            }],
            submission_id,
        }
    }

    #[tokio::test]
    async fn test_append_stamps_order() {
        let repo = OrderRepository::open(Arc::new(MemoryBackend::new()));
        let order = repo.append(draft(SubmissionId::new()), Utc::now()).await.unwrap();
        assert!(order.order_id.as_str().starts_with("ORD-"));
        assert_eq!(order.customer_name, "Ann Lee");
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn test_same_submission_is_stored_once() {
        let repo = OrderRepository::open(Arc::new(MemoryBackend::new()));
        let submission = SubmissionId::new();
        repo.append(draft(submission), Utc::now()).await.unwrap();
        let err = repo.append(draft(submission), Utc::now()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateSubmission(id) if id == submission));
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn test_ids_unique_within_one_second() {
        let repo = OrderRepository::open(Arc::new(MemoryBackend::new()));
        let at = Utc::now();
        for _ in 0..50 {
            repo.append(draft(SubmissionId::new()), at).await.unwrap();
        }
        let ids: HashSet<_> = repo.all().await.into_iter().map(|o| o.order_id).collect();
        assert_eq!(ids.len(), 50);
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_not_lost() {
        let repo = Arc::new(OrderRepository::open(Arc::new(MemoryBackend::new())));
        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.append(draft(SubmissionId::new()), Utc::now()).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }
        assert_eq!(repo.count().await, 20);
    }
}
