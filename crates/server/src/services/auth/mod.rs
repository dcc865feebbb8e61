//! Authentication service.
//!
//! Customer signup and login against the user collection, and administrator
//! login against the configured credentials. Passwords are stored and
//! configured only as Argon2id PHC strings.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::ExposeSecret;

use tany_orders_core::{CustomerProfile, Email, Registration};

use crate::config::AdminCredentials;
use crate::db::{RepositoryError, UserRepository};
use crate::models::StoredUser;

/// Authentication service.
pub struct AuthService<'a> {
    users: &'a UserRepository,
    admin: &'a AdminCredentials,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a UserRepository, admin: &'a AdminCredentials) -> Self {
        Self { users, admin }
    }

    /// Register a new customer.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Registration` if the form is invalid and
    /// `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn signup(&self, registration: Registration) -> Result<CustomerProfile, AuthError> {
        let valid = registration.validate()?;
        let password_hash = hash_password(&valid.password)?;
        let profile = valid.profile;

        let user = StoredUser {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            company_name: profile.company_name.clone(),
            password_hash,
            password: None,
        };
        self.users
            .insert(&profile.email, user)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(profile)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` for an unknown email and
    /// `AuthError::InvalidCredentials` for a wrong password.
    pub async fn login(&self, email: &str, password: &str) -> Result<CustomerProfile, AuthError> {
        let email = Email::parse(email)?;
        let user = self
            .users
            .get(&email)
            .await
            .ok_or(AuthError::UserNotFound)?;

        verify_password(password, &user.password_hash)?;
        Ok(user.profile(email))
    }

    /// Login as the administrator. Returns the admin username.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidAdminCredentials` unless both the username
    /// and the password match.
    pub fn login_admin(&self, username: &str, password: &str) -> Result<String, AuthError> {
        // Verify even on a username mismatch so both failures cost the same.
        let password_ok =
            verify_password(password, self.admin.password_hash.expose_secret()).is_ok();
        if username != self.admin.username || !password_ok {
            return Err(AuthError::InvalidAdminCredentials);
        }
        Ok(self.admin.username.clone())
    }
}

/// Hash any plaintext passwords left in the user collection.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails or a repository error
/// if the migrated collection cannot be written.
pub async fn migrate_legacy_passwords(users: &UserRepository) -> Result<usize, AuthError> {
    users.migrate_legacy_passwords(hash_password).await
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on mismatch or an unparseable hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use secrecy::SecretString;

    use super::*;
    use crate::db::MemoryBackend;
    use tany_orders_core::RegistrationError;

    fn admin() -> AdminCredentials {
        AdminCredentials {
            username: "admin".to_string(),
            password_hash: SecretString::from(hash_password("s3cret").unwrap()),
        }
    }

    fn ann(password: &str, confirm: &str) -> Registration {
        Registration {
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            company_name: "Acme".to_string(),
            email: "ann@acme.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("pw1").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("pw1", &hash).is_ok());
        assert!(matches!(
            verify_password("pw2", &hash),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(verify_password("pw1", "not-a-hash").is_err());
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let users = UserRepository::open(Arc::new(MemoryBackend::new()));
        let admin = admin();
        let auth = AuthService::new(&users, &admin);

        let profile = auth.signup(ann("pw1", "pw1")).await.unwrap();
        assert_eq!(profile.full_name(), "Ann Lee");

        let stored = users.get(&profile.email).await.unwrap();
        assert_ne!(stored.password_hash, "pw1");

        let logged_in = auth.login("ann@acme.com", "pw1").await.unwrap();
        assert_eq!(logged_in, profile);
    }

    #[tokio::test]
    async fn test_signup_errors() {
        let users = UserRepository::open(Arc::new(MemoryBackend::new()));
        let admin = admin();
        let auth = AuthService::new(&users, &admin);

        assert!(matches!(
            auth.signup(ann("pw1", "pw2")).await,
            Err(AuthError::Registration(RegistrationError::PasswordMismatch))
        ));
        auth.signup(ann("pw1", "pw1")).await.unwrap();
        assert!(matches!(
            auth.signup(ann("other", "other")).await,
            Err(AuthError::UserAlreadyExists)
        ));
        assert_eq!(users.count().await, 1);
    }

    #[tokio::test]
    async fn test_login_errors() {
        let users = UserRepository::open(Arc::new(MemoryBackend::new()));
        let admin = admin();
        let auth = AuthService::new(&users, &admin);
        auth.signup(ann("pw1", "pw1")).await.unwrap();

        assert!(matches!(
            auth.login("bob@acme.com", "pw1").await,
            Err(AuthError::UserNotFound)
        ));
        assert!(matches!(
            auth.login("ann@acme.com", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_admin_login() {
        let users = UserRepository::open(Arc::new(MemoryBackend::new()));
        let admin = admin();
        let auth = AuthService::new(&users, &admin);

        assert_eq!(auth.login_admin("admin", "s3cret").unwrap(), "admin");
        assert!(matches!(
            auth.login_admin("admin", "wrong"),
            Err(AuthError::InvalidAdminCredentials)
        ));
        assert!(matches!(
            auth.login_admin("Admin", "s3cret"),
            Err(AuthError::InvalidAdminCredentials)
        ));
    }
}
