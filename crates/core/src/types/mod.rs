//! Core types for Tany Orders.
//!
//! This module provides type-safe wrappers for the domain concepts shared by
//! the server and the CLI.

pub mod email;
pub mod id;
pub mod order;
pub mod product;
pub mod unit;
pub mod user;

pub use email::{Email, EmailError};
pub use id::{EmptyItemCode, ItemCode, OrderId, SubmissionId};
pub use order::{CartLine, InvalidQuantity, Order, OrderDraft, Quantity};
pub use product::{DEFAULT_CATEGORY, Product, ProductRow, ProductRowError, parse_flag};
pub use unit::{InvalidUnit, UnitOfMeasure};
pub use user::{CustomerProfile, Registration, RegistrationError, ValidRegistration};
