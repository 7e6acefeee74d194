//! Order placement payload.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::cart::CartLedger;
use crate::types::ProductId;

/// Body of `POST orders`, built from the cart at checkout.
///
/// Amounts are sent as JSON numbers because that is what the order endpoint
/// stores; they are exact decimals up to that point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    pub items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// One ordered product with the unit price the shopper saw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
    pub product: ProductId,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl From<&CartLedger> for OrderRequest {
    fn from(cart: &CartLedger) -> Self {
        let summary = cart.summary();
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| OrderItem {
                    product: item.product().id.clone(),
                    quantity: item.quantity(),
                    price: item.unit_price(),
                })
                .collect(),
            subtotal: summary.subtotal,
            tax: summary.tax,
            shipping: summary.shipping,
            total: summary.total,
        }
    }
}
