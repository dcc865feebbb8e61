//! CLI command implementations.

pub mod admin;
pub mod orders;
pub mod products;
