//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transactions)
//! 2. `TraceLayer` (request spans)
//! 3. Session layer (tower-sessions, in-memory store)

pub mod auth;
pub mod session;

pub use auth::{AdminAuthRejection, RequireAdmin};
pub use session::{CurrentSession, SESSION_COOKIE_NAME, create_session_layer};
