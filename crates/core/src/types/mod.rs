//! Core types for Bloom.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod discount;
pub mod email;
pub mod id;
pub mod price;
pub mod role;

pub use discount::{Discount, DiscountError};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Money};
pub use role::UserRole;
