//! Cart line items and pricing.
//!
//! A [`CartLedger`] owns the line items currently in the cart and derives
//! every displayed amount from them on demand:
//!
//! | Amount | Rule |
//! |--------|------|
//! | line total | discounted unit price × quantity |
//! | subtotal | sum of line totals |
//! | tax | subtotal × [`TAX_RATE`] |
//! | shipping | [`FLAT_SHIPPING_FEE`] unless subtotal > [`FREE_SHIPPING_THRESHOLD`] |
//! | total | subtotal + tax + shipping |
//!
//! All arithmetic is exact decimal. Nothing is rounded until an amount is
//! formatted through [`Money`](crate::types::Money).

mod error;
mod ledger;
mod shared;

pub use error::CartError;
pub use ledger::{CartLedger, CartSummary, LineItem};
pub use shared::SharedCartLedger;

use rust_decimal::Decimal;

/// Goods and services tax applied to the subtotal (18%).
pub const TAX_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Shipping is waived when the subtotal is strictly above this amount.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

/// Flat shipping fee charged at or below the threshold.
pub const FLAT_SHIPPING_FEE: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
