use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::ProductId;

/// Errors returned by cart mutations.
///
/// A failed mutation leaves the ledger exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Quantity supplied to add/update was not positive.
    #[error("quantity must be at least 1 (got {0})")]
    InvalidQuantity(u32),

    /// The product cannot be priced.
    #[error("product {id} has a negative price ({price})")]
    InvalidProduct { id: ProductId, price: Decimal },

    /// Incrementing the line would overflow its quantity.
    #[error("quantity for product {0} exceeds the supported maximum")]
    QuantityOverflow(ProductId),

    /// The change would push a line total, the subtotal or the total past
    /// what [`Decimal`] can hold.
    #[error("amount for product {0} exceeds the supported maximum")]
    AmountOverflow(ProductId),
}
