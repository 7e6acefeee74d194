//! Plain-text and JSON rendering for command output.

use std::fmt::Write as _;

use bloom_core::models::{Category, Product};
use bloom_core::{CartLedger, CartSummary, CurrencyCode, Money, ProductId};
use rust_decimal::Decimal;
use serde::Serialize;

/// Write a block of output to stdout.
#[allow(clippy::print_stdout)]
pub fn print(text: &str) {
    println!("{text}");
}

/// `quote --json` document.
#[derive(Debug, Serialize)]
pub struct QuoteJson {
    pub lines: Vec<QuoteLineJson>,
    pub summary: CartSummary,
}

/// One priced line in a [`QuoteJson`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLineJson {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl From<&CartLedger> for QuoteJson {
    fn from(ledger: &CartLedger) -> Self {
        let lines = ledger
            .items()
            .iter()
            .map(|item| QuoteLineJson {
                product_id: item.product().id.clone(),
                name: item.product().display_name().to_string(),
                quantity: item.quantity(),
                unit_price: item.unit_price(),
                line_total: item.line_total(),
            })
            .collect();
        Self {
            lines,
            summary: ledger.summary(),
        }
    }
}

/// Render the cart as a line listing followed by the price breakdown.
pub fn render_cart(ledger: &CartLedger, currency: CurrencyCode) -> String {
    if ledger.is_empty() {
        return "Cart is empty".to_string();
    }

    let money = |amount: Decimal| Money::new(amount, currency).display();
    let mut out = String::new();
    for item in ledger.items() {
        let _ = writeln!(
            out,
            "{:<30} x{:<4} {:>12} {:>12}",
            item.product().display_name(),
            item.quantity(),
            money(item.unit_price()),
            money(item.line_total()),
        );
    }

    let summary = ledger.summary();
    let shipping = if summary.shipping.is_zero() {
        "Free".to_string()
    } else {
        money(summary.shipping)
    };
    let _ = writeln!(out);
    let _ = writeln!(out, "Items:     {}", summary.total_items);
    let _ = writeln!(out, "Subtotal:  {}", money(summary.subtotal));
    let _ = writeln!(out, "GST (18%): {}", money(summary.tax));
    let _ = writeln!(out, "Shipping:  {shipping}");
    let _ = write!(out, "Total:     {}", money(summary.total));
    out
}

/// One catalog line: name, price (with discount if any) and id.
pub fn render_product(product: &Product, currency: CurrencyCode) -> String {
    let price = Money::new(product.price, currency).display();
    let stock = if product.in_stock { "" } else { " (out of stock)" };
    if product.discount.is_active() {
        let discounted = Money::new(product.discounted_price(), currency).display();
        format!(
            "{} - {discounted} ({price}, {} off) [{}]{stock}",
            product.display_name(),
            product.discount,
            product.id,
        )
    } else {
        format!("{} - {price} [{}]{stock}", product.display_name(), product.id)
    }
}

/// One category line, with subcategories indented beneath it.
pub fn render_category(category: &Category) -> String {
    let mut out = format!("{} [{}]", category.name, category.id);
    for sub in &category.subcategories {
        let _ = write!(out, "\n  {} [{}]", sub.name, sub.id);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bloom_core::Discount;

    fn tulips() -> Product {
        Product::new("p1", Decimal::from(1000), Discount::new(10).unwrap()).with_name("Tulips")
    }

    #[test]
    fn test_render_empty_cart() {
        assert_eq!(render_cart(&CartLedger::new(), CurrencyCode::INR), "Cart is empty");
    }

    #[test]
    fn test_render_cart_free_shipping() {
        let mut ledger = CartLedger::new();
        ledger.add_item(tulips(), 2).unwrap();

        let text = render_cart(&ledger, CurrencyCode::INR);
        assert!(text.contains("Tulips"));
        assert!(text.contains("₹900.00"));
        assert!(text.contains("Subtotal:  ₹1800.00"));
        assert!(text.contains("GST (18%): ₹324.00"));
        assert!(text.contains("Shipping:  Free"));
        assert!(text.ends_with("Total:     ₹2124.00"));
    }

    #[test]
    fn test_render_cart_flat_shipping() {
        let mut ledger = CartLedger::new();
        ledger
            .add_item(Product::new("p2", Decimal::from(200), Discount::NONE), 1)
            .unwrap();

        let text = render_cart(&ledger, CurrencyCode::INR);
        assert!(text.contains("Shipping:  ₹50.00"));
        assert!(text.ends_with("Total:     ₹286.00"));
    }

    #[test]
    fn test_quote_json_shape() {
        let mut ledger = CartLedger::new();
        ledger.add_item(tulips(), 2).unwrap();

        let json = serde_json::to_value(QuoteJson::from(&ledger)).unwrap();
        assert_eq!(json["lines"][0]["productId"], "p1");
        assert_eq!(json["lines"][0]["quantity"], 2);
        let unit: Decimal = json["lines"][0]["unitPrice"].as_str().unwrap().parse().unwrap();
        assert_eq!(unit, Decimal::from(900));
        assert_eq!(json["summary"]["totalItems"], 2);
    }

    #[test]
    fn test_render_product_with_discount() {
        let line = render_product(&tulips(), CurrencyCode::INR);
        assert_eq!(line, "Tulips - ₹900.00 (₹1000.00, 10% off) [p1]");
    }

    #[test]
    fn test_render_product_without_discount() {
        let mut product = Product::new("p2", Decimal::new(4_999, 2), Discount::NONE).with_name("Card");
        product.in_stock = false;
        let line = render_product(&product, CurrencyCode::USD);
        assert_eq!(line, "Card - $49.99 [p2] (out of stock)");
    }

    #[test]
    fn test_render_category_lists_subcategories() {
        let category: Category = serde_json::from_value(serde_json::json!({
            "_id": "c1",
            "name": "Flowers",
            "slug": "flowers",
            "subcategories": [{"_id": "c2", "name": "Roses", "slug": "roses"}]
        }))
        .unwrap();

        assert_eq!(render_category(&category), "Flowers [c1]\n  Roses [c2]");
    }
}
