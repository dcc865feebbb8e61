//! Authentication error types.

use thiserror::Error;

use tany_orders_core::{EmailError, RegistrationError};

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Signup form failed validation.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Wrong customer password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Wrong admin username or password.
    #[error("invalid admin credentials")]
    InvalidAdminCredentials,

    /// No account for this email.
    #[error("user not found")]
    UserNotFound,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
