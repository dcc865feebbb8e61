//! Tany Orders Core - domain types and workflow rules.
//!
//! This crate holds everything about B2B ordering that does not touch I/O.
//! It is shared by:
//! - `server` - HTTP service for customers and the admin dashboard
//! - `cli` - Command-line tools for product imports and order exports
//!
//! # Architecture
//!
//! No files, no HTTP, no clocks except where a caller passes one in. The
//! server owns persistence and sessions; this crate decides what is valid.
//!
//! # Modules
//!
//! - [`types`] - Newtypes for emails, item codes, order ids, quantities, products and orders
//! - [`catalog`] - Search and category filtering over the product collection
//! - [`cart`] - Per-session cart with one line per item code
//! - [`checkout`] - Request / confirm / cancel submission workflow
//! - [`session`] - Per-session context and page router
//! - [`report`] - Flat order rows shared by the dashboard and exports

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod report;
pub mod session;
pub mod types;

pub use types::*;
