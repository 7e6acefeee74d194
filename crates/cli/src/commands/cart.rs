//! Cart file commands.
//!
//! # Usage
//!
//! ```bash
//! # Price a cart offline
//! bloom quote cart.json
//! bloom quote cart.json --json
//!
//! # Place an order for it (requires a session and `BLOOM_API_BASE_URL`)
//! bloom checkout cart.json
//! ```
//!
//! # Cart file format
//!
//! ```json
//! {
//!   "items": [
//!     { "product": { "_id": "p1", "name": "Tulips", "price": 1000, "discount": 10 }, "quantity": 2 }
//!   ]
//! }
//! ```
//!
//! `quantity` defaults to 1. Products use the same JSON shape as the API.

use std::path::Path;

use bloom_core::models::Product;
use bloom_core::{CartError, CartLedger, CurrencyCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use super::output;

/// Errors that can occur while loading a cart file.
#[derive(Debug, Error)]
pub enum CartFileError {
    /// The file could not be read.
    #[error("Could not read cart file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid cart document.
    #[error("Invalid cart file: {0}")]
    Parse(#[from] serde_json::Error),

    /// A line was rejected by the cart.
    #[error("Invalid cart line for {product}: {source}")]
    Line {
        product: String,
        #[source]
        source: CartError,
    },
}

/// Parsed cart file.
#[derive(Debug, Deserialize)]
pub struct CartFile {
    pub items: Vec<CartFileLine>,
}

/// One line of a cart file.
#[derive(Debug, Deserialize)]
pub struct CartFileLine {
    pub product: Product,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

impl CartFile {
    /// Read and parse a cart file.
    ///
    /// # Errors
    ///
    /// Returns `CartFileError` if the file is unreadable or malformed.
    pub async fn load(path: &Path) -> Result<Self, CartFileError> {
        let content = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Replay every line into `ledger`, in file order.
    ///
    /// # Errors
    ///
    /// Returns `CartFileError::Line` for the first line the ledger rejects.
    pub fn apply_to(self, ledger: &mut CartLedger) -> Result<(), CartFileError> {
        for line in self.items {
            let product = line.product.id.to_string();
            ledger
                .add_item(line.product, line.quantity)
                .map_err(|source| CartFileError::Line { product, source })?;
        }
        Ok(())
    }

    /// Build a fresh ledger from the file.
    ///
    /// # Errors
    ///
    /// Returns `CartFileError::Line` for the first line the ledger rejects.
    pub fn into_ledger(self) -> Result<CartLedger, CartFileError> {
        let mut ledger = CartLedger::new();
        self.apply_to(&mut ledger)?;
        Ok(ledger)
    }
}

/// Price a cart file and print the breakdown.
///
/// Uses `BLOOM_CURRENCY` for display if set; no other configuration is
/// needed.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or a line is invalid.
pub async fn quote(path: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ledger = CartFile::load(path).await?.into_ledger()?;
    let currency = std::env::var("BLOOM_CURRENCY")
        .ok()
        .and_then(|c| c.parse::<CurrencyCode>().ok())
        .unwrap_or_default();

    info!(lines = ledger.len(), items = ledger.total_items(), "Cart priced");
    if json {
        output::print(&serde_json::to_string_pretty(&output::QuoteJson::from(&ledger))?);
    } else {
        output::print(&output::render_cart(&ledger, currency));
    }
    Ok(())
}

/// Load a cart file into the session cart and place the order.
///
/// # Errors
///
/// Returns an error if the file is invalid, there is no session, or the
/// server rejects the order.
pub async fn checkout(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = super::context().await?;
    let file = CartFile::load(path).await?;
    ctx.cart().with(|ledger| file.apply_to(ledger))?;

    output::print(&output::render_cart(&ctx.cart().snapshot(), ctx.config().currency));
    let order = ctx.checkout().await?;

    let order_id = order
        .get("_id")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("(unknown)");
    output::print(&format!("Order placed: {order_id}"));
    Ok(())
}
