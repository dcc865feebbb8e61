//! Session-related types.
//!
//! The whole per-session state is one [`SessionContext`] stored under a
//! single key, so a request loads it, works on it and saves it in one piece.

pub use tany_orders_core::session::SessionContext;

/// Session keys.
pub mod keys {
    /// Key for the serialized [`super::SessionContext`].
    pub const CONTEXT: &str = "context";
}
