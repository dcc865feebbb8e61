//! Session middleware configuration and the per-request session context.
//!
//! Sessions live in the in-memory tower-sessions store; each holds one
//! serialized [`SessionContext`]. Handlers take a [`CurrentSession`], work on
//! `context` and call [`CurrentSession::save`] before answering.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::models::{SessionContext, session_keys};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "tany_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &ServerConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// The session of the current request with its loaded context.
pub struct CurrentSession {
    session: Session,
    pub context: SessionContext,
}

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer is not installed".to_string()))?;

        let context = match session.get::<SessionContext>(session_keys::CONTEXT).await {
            Ok(context) => context.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable session context");
                SessionContext::default()
            }
        };

        Ok(Self { session, context })
    }
}

impl CurrentSession {
    /// Store the context back into the session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::SessionStore` if the session cannot be modified.
    pub async fn save(&self) -> Result<(), AppError> {
        self.session
            .insert(session_keys::CONTEXT, &self.context)
            .await?;
        Ok(())
    }

    /// Issue a new session id, e.g. after a login.
    ///
    /// # Errors
    ///
    /// Returns `AppError::SessionStore` if the store fails.
    pub async fn cycle_id(&self) -> Result<(), AppError> {
        self.session.cycle_id().await?;
        Ok(())
    }
}
