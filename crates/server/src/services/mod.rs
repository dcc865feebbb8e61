//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Customer signup/login and administrator login (Argon2)
//! - `import` - Catalog upload parsing (CSV, XLSX)
//! - `export` - Order report export (CSV, XLSX)

pub mod auth;
pub mod export;
pub mod import;
