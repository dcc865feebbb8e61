//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`.
//!
//! | Kind | Status |
//! |------|--------|
//! | validation, mismatch, parse | 400 |
//! | bad credentials, not signed in | 401 |
//! | unknown user, product or cart line | 404 |
//! | conflict, duplicate cart line, empty cart | 409 |
//! | persistence, internal | 500 |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use tany_orders_core::{
    EmptyItemCode, InvalidUnit, RegistrationError, cart::CartError, checkout::CheckoutError,
    session::SessionError,
};

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::export::ExportError;
use crate::services::import::ImportError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Persistence operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Cart operation rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Submission workflow rejected.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Navigation or access rejected by the session context.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Catalog upload rejected.
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Report export failed.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Session store failed.
    #[error("Session store error: {0}")]
    SessionStore(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<InvalidUnit> for AppError {
    fn from(err: InvalidUnit) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<EmptyItemCode> for AppError {
    fn from(err: EmptyItemCode) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Repository(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Repository(_)
            | Self::Export(_)
            | Self::SessionStore(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::Registration(_) | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::InvalidCredentials | AuthError::InvalidAdminCredentials => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Cart(err) => match err {
                CartError::Duplicate(_) => StatusCode::CONFLICT,
                CartError::LineNotFound(_) => StatusCode::NOT_FOUND,
                CartError::InvalidQuantity(_)
                | CartError::UnitNotAllowed { .. }
                | CartError::NotPurchasable(_) => StatusCode::BAD_REQUEST,
            },
            Self::Checkout(err) | Self::Session(SessionError::Checkout(err)) => match err {
                CheckoutError::EmptyCart => StatusCode::CONFLICT,
                CheckoutError::NotPending => StatusCode::BAD_REQUEST,
            },
            Self::Session(SessionError::NavigationNotAllowed { .. })
            | Self::Import(_)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Session(SessionError::CustomerRequired) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Message safe to show to the client.
    fn public_message(&self) -> String {
        match self {
            Self::Repository(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Repository(_) | Self::SessionStore(_) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
            Self::Export(_) => "Failed to export orders".to_string(),
            Self::Auth(err) => match err {
                AuthError::Registration(RegistrationError::MissingField(_)) => {
                    "Please fill in all required fields".to_string()
                }
                AuthError::Registration(RegistrationError::PasswordMismatch) => {
                    "Passwords do not match".to_string()
                }
                AuthError::Registration(RegistrationError::InvalidEmail(_))
                | AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                AuthError::InvalidCredentials => "Incorrect password".to_string(),
                AuthError::InvalidAdminCredentials => "Invalid admin credentials".to_string(),
                AuthError::UserNotFound => "Email not found. Please sign up.".to_string(),
                AuthError::UserAlreadyExists => {
                    "Email already registered. Please log in.".to_string()
                }
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    "Internal server error".to_string()
                }
            },
            Self::Cart(err) => err.to_string(),
            Self::Checkout(err) => err.to_string(),
            Self::Session(err) => err.to_string(),
            Self::Import(err) => err.to_string(),
            Self::NotFound(what) => format!("{what} not found"),
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        // Don't expose internal error details to clients
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context after a login.
pub fn set_sentry_user(id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
