//! Bloom Core - Shared types and cart pricing.
//!
//! This crate provides the types used across all Bloom components:
//! - `client` - REST API client, session store and application context
//! - `cli` - Command-line front end for quoting carts and browsing the catalog
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no persistence. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, money, discounts, emails and roles
//! - [`models`] - Catalog, user and order payloads exchanged with the REST API
//! - [`cart`] - The cart ledger and its pricing rules

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod models;
pub mod types;

pub use cart::{CartError, CartLedger, CartSummary, LineItem, SharedCartLedger};
pub use types::*;
