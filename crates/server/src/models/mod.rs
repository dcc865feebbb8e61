//! Domain models for the server.

pub mod session;
pub mod user;

pub use session::{SessionContext, keys as session_keys};
pub use user::StoredUser;
