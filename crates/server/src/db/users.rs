//! User repository.

use std::collections::BTreeMap;
use std::sync::Arc;

use tany_orders_core::Email;

use super::{Collection, DocumentBackend, RepositoryError};
use crate::models::StoredUser;

/// Collection name of the user document.
pub const USERS: &str = "users";

/// Email (as typed at signup, trimmed) to account.
pub type UserMap = BTreeMap<String, StoredUser>;

/// Repository for customer accounts.
#[derive(Debug)]
pub struct UserRepository {
    collection: Collection<UserMap>,
}

impl UserRepository {
    #[must_use]
    pub fn open(backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            collection: Collection::open(USERS, backend),
        }
    }

    /// Whether the document was read successfully at startup.
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        self.collection.is_verified()
    }

    /// Get a user by email.
    pub async fn get(&self, email: &Email) -> Option<StoredUser> {
        self.collection
            .read(|users| users.get(email.as_str()).cloned())
            .await
    }

    /// Store a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered,
    /// or a persistence error if the write fails.
    pub async fn insert(&self, email: &Email, user: StoredUser) -> Result<(), RepositoryError> {
        self.collection
            .update(|users| {
                if users.contains_key(email.as_str()) {
                    return Err(RepositoryError::Conflict(format!(
                        "{email} is already registered"
                    )));
                }
                users.insert(email.as_str().to_string(), user);
                Ok(())
            })
            .await
    }

    /// Number of registered users.
    pub async fn count(&self) -> usize {
        self.collection.read(BTreeMap::len).await
    }

    /// Replace legacy plaintext passwords with hashes produced by `hash`.
    ///
    /// Writes only when at least one record changed. Returns how many did.
    ///
    /// # Errors
    ///
    /// Returns `hash`'s error, or a persistence error converted into `E`.
    pub async fn migrate_legacy_passwords<E>(
        &self,
        hash: impl Fn(&str) -> Result<String, E>,
    ) -> Result<usize, E>
    where
        E: From<RepositoryError>,
    {
        let pending = self
            .collection
            .read(|users| users.values().filter(|u| u.needs_migration()).count())
            .await;
        if pending == 0 {
            return Ok(0);
        }

        self.collection
            .update(|users| {
                let mut migrated = 0;
                for user in users.values_mut().filter(|u| u.needs_migration()) {
                    if let Some(plaintext) = user.password.take() {
                        user.password_hash = hash(&plaintext)?;
                        migrated += 1;
                    }
                }
                Ok(migrated)
            })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryBackend;

    fn ann() -> StoredUser {
        StoredUser {
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            company_name: "Acme".to_string(),
            password_hash: "hash".to_string(),
            password: None,
        }
    }

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let repo = UserRepository::open(Arc::new(MemoryBackend::new()));
        repo.insert(&email("ann@acme.com"), ann()).await.unwrap();
        assert_eq!(repo.get(&email("ann@acme.com")).await.unwrap(), ann());
        assert!(repo.get(&email("bob@acme.com")).await.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = UserRepository::open(Arc::new(MemoryBackend::new()));
        repo.insert(&email("ann@acme.com"), ann()).await.unwrap();
        let err = repo.insert(&email("ann@acme.com"), ann()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn test_migrate_legacy_passwords() {
        let legacy = r#"{"ann@acme.com": {"first_name": "Ann", "last_name": "Lee", "company_name": "Acme", "password": "pw1"}}"#;
        let backend = Arc::new(MemoryBackend::new().with_document(USERS, legacy));
        let repo = UserRepository::open(backend.clone());

        let migrated = repo
            .migrate_legacy_passwords(|p| Ok::<_, RepositoryError>(format!("hashed:{p}")))
            .await
            .unwrap();
        assert_eq!(migrated, 1);

        let user = repo.get(&email("ann@acme.com")).await.unwrap();
        assert_eq!(user.password_hash, "hashed:pw1");
        let written = String::from_utf8(backend.document(USERS).unwrap()).unwrap();
        assert!(!written.contains("\"password\""));

        let again = repo
            .migrate_legacy_passwords(|p| Ok::<_, RepositoryError>(format!("hashed:{p}")))
            .await
            .unwrap();
        assert_eq!(again, 0);
    }
}
