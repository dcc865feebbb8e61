//! User domain types.
//!
//! `users.json` maps an email to a [`StoredUser`]; the email itself is the key
//! and is not repeated inside the record.

use serde::{Deserialize, Serialize};

use tany_orders_core::{CustomerProfile, Email};

/// A customer account as stored on disk.
///
/// Implements `Debug` manually to redact the password fields.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUser {
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    /// Argon2 PHC string.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password_hash: String,
    /// Plaintext password from documents written before hashing was
    /// introduced. Read once for migration, never written back.
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

impl StoredUser {
    /// Whether this record still needs its plaintext password hashed.
    #[must_use]
    pub fn needs_migration(&self) -> bool {
        self.password_hash.is_empty() && self.password.is_some()
    }

    /// The profile loaded into a session at login.
    #[must_use]
    pub fn profile(&self, email: Email) -> CustomerProfile {
        CustomerProfile {
            email,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            company_name: self.company_name.clone(),
        }
    }
}

impl std::fmt::Debug for StoredUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredUser")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("company_name", &self.company_name)
            .field("password_hash", &"[REDACTED]")
            .field("legacy_password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_password_is_read_but_not_written() {
        let legacy = serde_json::json!({
            "first_name": "Ann",
            "last_name": "Lee",
            "company_name": "Acme",
            "password": "pw1"
        });
        let mut user: StoredUser = serde_json::from_value(legacy).unwrap();
        assert!(user.needs_migration());

        user.password_hash = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$aGFzaA".to_string();
        user.password = None;
        let written = serde_json::to_value(&user).unwrap();
        assert!(written.get("password").is_none());
        assert!(written["password_hash"].as_str().unwrap().starts_with("$argon2id$"));
        assert!(!user.needs_migration());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let user = StoredUser {
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            company_name: "Acme".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            password: Some("pw1".to_string()),
        };
        let debug = format!("{user:?}");
        assert!(!debug.contains("pw1"));
        assert!(!debug.contains("argon2id"));
    }
}
