//! Authentication extractors.
//!
//! Customer-only operations check the actor through
//! [`SessionContext::customer`](tany_orders_core::session::SessionContext::customer);
//! admin routes take [`RequireAdmin`] instead, which rejects before the
//! handler runs.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::session::CurrentSession;
use tany_orders_core::session::Actor;

/// Extractor that requires an administrator session. Holds the admin username.
///
/// # Example
///
/// ```rust,ignore
/// async fn dashboard(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
///     format!("Hello, {admin}!")
/// }
/// ```
pub struct RequireAdmin(pub String);

/// Error returned when an admin session is required.
pub enum AdminAuthRejection {
    /// No admin is signed in.
    Unauthorized,
    /// Loading the session failed.
    Session(Response),
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                axum::Json(json!({ "error": "Administrator login required" })),
            )
                .into_response(),
            Self::Session(response) => response,
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let current = CurrentSession::from_request_parts(parts, state)
            .await
            .map_err(|e| AdminAuthRejection::Session(e.into_response()))?;

        match current.context.actor() {
            Actor::Admin { username } => Ok(Self(username.clone())),
            _ => Err(AdminAuthRejection::Unauthorized),
        }
    }
}
