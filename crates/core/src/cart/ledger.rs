use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::{CartError, FLAT_SHIPPING_FEE, FREE_SHIPPING_THRESHOLD, TAX_RATE};
use crate::models::Product;
use crate::types::ProductId;

/// One product in the cart and how many of it.
///
/// The quantity is always at least 1; the ledger never stores a zero line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    product: Product,
    quantity: u32,
}

impl LineItem {
    /// The product this line refers to.
    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    /// Units of the product in the cart.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Discounted unit price of the product.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.product.discounted_price()
    }

    /// Discounted unit price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity)
    }

    fn checked_line_total(&self) -> Option<Decimal> {
        self.unit_price().checked_mul(Decimal::from(self.quantity))
    }
}

/// Every derived cart amount, computed from one snapshot of the lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub total_items: u64,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

/// The shopping cart: an ordered set of line items, unique by product id.
///
/// Created empty, mutated only through its own methods, and held in memory.
/// Derived amounts are recomputed from the current lines on every call.
///
/// Every mutation is checked so that the line totals, subtotal, tax and total
/// of the resulting cart are representable; the derived reads never overflow.
///
/// # Example
///
/// ```
/// use bloom_core::{CartLedger, Discount};
/// use bloom_core::models::Product;
/// use rust_decimal::Decimal;
///
/// let mut cart = CartLedger::new();
/// let bouquet = Product::new("p1", Decimal::from(1000), Discount::new(10).unwrap());
/// cart.add_item(bouquet, 2).unwrap();
///
/// assert_eq!(cart.subtotal(), Decimal::from(1800));
/// assert_eq!(cart.tax(), Decimal::from(324));
/// assert_eq!(cart.shipping(), Decimal::ZERO);
/// assert_eq!(cart.total(), Decimal::from(2124));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CartLedger {
    items: Vec<LineItem>,
}

impl CartLedger {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Per-unit price of `product` after its percentage discount.
    #[must_use]
    pub fn discounted_unit_price(product: &Product) -> Decimal {
        product.discounted_price()
    }

    /// Total for a single line.
    #[must_use]
    pub fn line_total(item: &LineItem) -> Decimal {
        item.line_total()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// The line for `product_id`, if present.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.product.id == product_id)
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add `quantity` units of `product`.
    ///
    /// Adding a product that is already in the cart increases that line's
    /// quantity instead of creating a second line.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`] if `quantity` is zero.
    /// - [`CartError::InvalidProduct`] if the product price is negative.
    /// - [`CartError::QuantityOverflow`] if the new quantity does not fit.
    /// - [`CartError::AmountOverflow`] if the cart's amounts would no longer
    ///   be representable.
    pub fn add_item(&mut self, product: Product, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        if product.price < Decimal::ZERO {
            return Err(CartError::InvalidProduct {
                id: product.id,
                price: product.price,
            });
        }

        let candidate = match self.get(&product.id) {
            Some(item) => LineItem {
                product: item.product.clone(),
                quantity: item
                    .quantity
                    .checked_add(quantity)
                    .ok_or_else(|| CartError::QuantityOverflow(product.id.clone()))?,
            },
            None => LineItem { product, quantity },
        };
        self.ensure_representable(&candidate)?;

        let quantity = candidate.quantity;
        if let Some(item) = self.line_mut(&candidate.product.id) {
            item.quantity = quantity;
            debug!(product_id = %candidate.product.id, quantity, "Cart line incremented");
        } else {
            debug!(product_id = %candidate.product.id, quantity, "Cart line added");
            self.items.push(candidate);
        }
        Ok(())
    }

    /// Add a single unit of `product`.
    ///
    /// # Errors
    ///
    /// See [`CartLedger::add_item`].
    pub fn add_one(&mut self, product: Product) -> Result<(), CartError> {
        self.add_item(product, 1)
    }

    /// Remove the line for `product_id`. Absent products are ignored.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        let before = self.items.len();
        self.items.retain(|item| &item.product.id != product_id);
        if self.items.len() != before {
            debug!(product_id = %product_id, "Cart line removed");
        }
    }

    /// Set the quantity of the line for `product_id`.
    ///
    /// Absent products are ignored.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`] if `quantity` is zero. Use
    ///   [`CartLedger::remove_item`] to drop a line.
    /// - [`CartError::AmountOverflow`] if the cart's amounts would no longer
    ///   be representable.
    ///
    /// On error the line keeps its previous quantity.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        let Some(item) = self.get(product_id) else {
            return Ok(());
        };
        let candidate = LineItem {
            product: item.product.clone(),
            quantity,
        };
        self.ensure_representable(&candidate)?;

        if let Some(item) = self.line_mut(product_id) {
            item.quantity = quantity;
            debug!(product_id = %product_id, quantity, "Cart line quantity set");
        }
        Ok(())
    }

    /// Take the lines of a placed order out of the cart.
    ///
    /// Each ordered quantity is subtracted from the matching line, and lines
    /// that reach zero are removed. Lines added after `ordered` was taken, and
    /// units added to an ordered line since then, stay in the cart.
    pub fn remove_ordered(&mut self, ordered: &Self) {
        for placed in &ordered.items {
            if let Some(item) = self.line_mut(&placed.product.id) {
                item.quantity = item.quantity.saturating_sub(placed.quantity);
            }
        }
        self.items.retain(|item| item.quantity > 0);
        debug!(lines = self.items.len(), "Ordered lines removed from cart");
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| &item.product.id == product_id)
    }

    /// Whether the cart, with `candidate` in place of its product's line,
    /// still has a representable subtotal, tax and total.
    fn ensure_representable(&self, candidate: &LineItem) -> Result<(), CartError> {
        let lines = self.items.iter().map(|item| {
            if item.product.id == candidate.product.id {
                candidate
            } else {
                item
            }
        });
        let appended = self.get(&candidate.product.id).is_none().then_some(candidate);
        let subtotal = lines
            .chain(appended)
            .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(line.checked_line_total()?));

        subtotal
            .and_then(|subtotal| {
                let tax = subtotal.checked_mul(TAX_RATE)?;
                subtotal.checked_add(tax)?.checked_add(shipping_for(subtotal))
            })
            .map(drop)
            .ok_or_else(|| CartError::AmountOverflow(candidate.product.id.clone()))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
        debug!("Cart cleared");
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Tax on the current subtotal.
    #[must_use]
    pub fn tax(&self) -> Decimal {
        tax_for(self.subtotal())
    }

    /// Shipping for the current subtotal. An empty cart ships nothing.
    #[must_use]
    pub fn shipping(&self) -> Decimal {
        if self.is_empty() {
            return Decimal::ZERO;
        }
        shipping_for(self.subtotal())
    }

    /// Subtotal plus tax plus shipping.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.summary().total
    }

    /// All derived amounts at once.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        if self.is_empty() {
            return CartSummary::default();
        }
        let subtotal = self.subtotal();
        let tax = tax_for(subtotal);
        let shipping = shipping_for(subtotal);
        CartSummary {
            total_items: self.total_items(),
            subtotal,
            tax,
            shipping,
            total: subtotal + tax + shipping,
        }
    }
}

fn tax_for(subtotal: Decimal) -> Decimal {
    subtotal * TAX_RATE
}

fn shipping_for(subtotal: Decimal) -> Decimal {
    if subtotal > FREE_SHIPPING_THRESHOLD {
        Decimal::ZERO
    } else {
        FLAT_SHIPPING_FEE
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::Discount;
    use proptest::prelude::*;

    fn product(id: &str, price: Decimal, discount: u8) -> Product {
        Product::new(id, price, Discount::new(discount).unwrap())
    }

    fn id(raw: &str) -> ProductId {
        ProductId::new(raw)
    }

    #[test]
    fn test_empty_cart_derives_zero_everywhere() {
        let cart = CartLedger::new();
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.subtotal(), Decimal::ZERO);
        assert_eq!(cart.tax(), Decimal::ZERO);
        assert_eq!(cart.shipping(), Decimal::ZERO);
        assert_eq!(cart.total(), Decimal::ZERO);
        assert_eq!(cart.summary(), CartSummary::default());
    }

    #[test]
    fn test_discounted_bouquet_gets_free_shipping() {
        let mut cart = CartLedger::new();
        cart.add_item(product("p1", Decimal::from(1000), 10), 2).unwrap();

        assert_eq!(CartLedger::line_total(&cart.items()[0]), Decimal::new(180_000, 2));
        assert_eq!(cart.subtotal(), Decimal::new(180_000, 2));
        assert_eq!(cart.tax(), Decimal::new(32_400, 2));
        assert_eq!(cart.shipping(), Decimal::ZERO);
        assert_eq!(cart.total(), Decimal::new(212_400, 2));
    }

    #[test]
    fn test_small_order_pays_flat_shipping() {
        let mut cart = CartLedger::new();
        cart.add_one(product("p1", Decimal::from(100), 0)).unwrap();

        let summary = cart.summary();
        assert_eq!(summary.subtotal, Decimal::new(10_000, 2));
        assert_eq!(summary.tax, Decimal::new(1_800, 2));
        assert_eq!(summary.shipping, Decimal::new(5_000, 2));
        assert_eq!(summary.total, Decimal::new(16_800, 2));
        assert_eq!(summary.total_items, 1);
    }

    #[test]
    fn test_shipping_threshold_is_strictly_greater_than() {
        let mut at_threshold = CartLedger::new();
        at_threshold.add_one(product("p1", Decimal::from(500), 0)).unwrap();
        assert_eq!(at_threshold.shipping(), FLAT_SHIPPING_FEE);

        let mut above = CartLedger::new();
        above.add_one(product("p1", Decimal::new(50_001, 2), 0)).unwrap();
        assert_eq!(above.shipping(), Decimal::ZERO);
    }

    #[test]
    fn test_adding_same_product_merges_lines() {
        let mut cart = CartLedger::new();
        cart.add_item(product("p1", Decimal::from(10), 0), 2).unwrap();
        cart.add_item(product("p1", Decimal::from(10), 0), 3).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&id("p1")).unwrap().quantity(), 5);
    }

    #[test]
    fn test_add_with_zero_quantity_is_rejected() {
        let mut cart = CartLedger::new();
        let err = cart.add_item(product("p1", Decimal::from(10), 0), 0).unwrap_err();
        assert_eq!(err, CartError::InvalidQuantity(0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_negative_price_is_rejected() {
        let mut cart = CartLedger::new();
        let err = cart.add_one(product("p1", Decimal::from(-5), 0)).unwrap_err();
        assert!(matches!(err, CartError::InvalidProduct { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_overflow_leaves_line_untouched() {
        let mut cart = CartLedger::new();
        cart.add_item(product("p1", Decimal::ONE, 0), u32::MAX).unwrap();
        let err = cart.add_one(product("p1", Decimal::ONE, 0)).unwrap_err();

        assert_eq!(err, CartError::QuantityOverflow(id("p1")));
        assert_eq!(cart.get(&id("p1")).unwrap().quantity(), u32::MAX);
    }

    #[test]
    fn test_remove_absent_product_is_noop() {
        let mut cart = CartLedger::new();
        cart.add_one(product("p1", Decimal::from(10), 0)).unwrap();
        let before = cart.clone();

        cart.remove_item(&id("missing"));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let mut cart = CartLedger::new();
        cart.add_one(product("a", Decimal::from(10), 0)).unwrap();
        cart.update_quantity(&id("a"), 3).unwrap();

        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_update_quantity_zero_is_rejected_and_keeps_line() {
        let mut cart = CartLedger::new();
        cart.add_item(product("a", Decimal::from(10), 0), 2).unwrap();

        let err = cart.update_quantity(&id("a"), 0).unwrap_err();
        assert_eq!(err, CartError::InvalidQuantity(0));
        assert_eq!(cart.get(&id("a")).unwrap().quantity(), 2);
    }

    #[test]
    fn test_update_quantity_absent_product_is_noop() {
        let mut cart = CartLedger::new();
        cart.update_quantity(&id("ghost"), 4).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut cart = CartLedger::new();
        cart.add_one(product("a", Decimal::from(10), 0)).unwrap();
        cart.add_one(product("b", Decimal::from(20), 5)).unwrap();
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.summary(), CartSummary::default());
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = CartLedger::new();
        for raw in ["c", "a", "b"] {
            cart.add_one(product(raw, Decimal::ONE, 0)).unwrap();
        }
        let order: Vec<&str> = cart.items().iter().map(|i| i.product().id.as_str()).collect();
        assert_eq!(order, ["c", "a", "b"]);
    }

    #[test]
    fn test_free_product_still_ships_at_flat_fee() {
        let mut cart = CartLedger::new();
        cart.add_one(product("gift", Decimal::from(300), 100)).unwrap();
        assert_eq!(cart.subtotal(), Decimal::ZERO);
        assert_eq!(cart.shipping(), FLAT_SHIPPING_FEE);
        assert_eq!(cart.total(), FLAT_SHIPPING_FEE);
    }

    #[test]
    fn test_add_rejects_line_total_overflow() {
        let mut cart = CartLedger::new();
        let err = cart
            .add_item(product("big", Decimal::MAX / Decimal::TWO, 0), 3)
            .unwrap_err();

        assert_eq!(err, CartError::AmountOverflow(id("big")));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_rejects_total_overflow_and_keeps_cart() {
        let mut cart = CartLedger::new();
        cart.add_one(product("a", Decimal::from(10), 0)).unwrap();
        let before = cart.clone();

        // The line on its own fits
        let err = cart.add_one(product("max", Decimal::MAX, 0)).unwrap_err();
        assert_eq!(err, CartError::AmountOverflow(id("max")));
        assert_eq!(cart, before);
        assert_eq!(cart.total(), Decimal::new(6_180, 2));
    }

    #[test]
    fn test_merge_rejects_amount_overflow() {
        let mut cart = CartLedger::new();
        let quarter = Decimal::MAX / Decimal::from(4);
        cart.add_one(product("p1", quarter, 0)).unwrap();

        let err = cart.add_item(product("p1", quarter, 0), 3).unwrap_err();
        assert_eq!(err, CartError::AmountOverflow(id("p1")));
        assert_eq!(cart.get(&id("p1")).unwrap().quantity(), 1);
    }

    #[test]
    fn test_update_quantity_rejects_amount_overflow() {
        let mut cart = CartLedger::new();
        let quarter = Decimal::MAX / Decimal::from(4);
        cart.add_one(product("p1", quarter, 0)).unwrap();
        let summary = cart.summary();
        assert_eq!(summary.subtotal, quarter);
        assert_eq!(summary.total, quarter + quarter * TAX_RATE);

        let err = cart.update_quantity(&id("p1"), 4).unwrap_err();
        assert_eq!(err, CartError::AmountOverflow(id("p1")));
        assert_eq!(cart.get(&id("p1")).unwrap().quantity(), 1);
        assert_eq!(cart.summary(), summary);
    }

    #[test]
    fn test_remove_ordered_keeps_later_additions() {
        let mut cart = CartLedger::new();
        cart.add_item(product("a", Decimal::from(100), 0), 2).unwrap();
        cart.add_one(product("b", Decimal::from(50), 0)).unwrap();
        let ordered = cart.clone();

        // Added while the order was being placed
        cart.add_one(product("a", Decimal::from(100), 0)).unwrap();
        cart.add_item(product("c", Decimal::from(30), 0), 4).unwrap();

        cart.remove_ordered(&ordered);

        let lines: Vec<(&str, u32)> = cart
            .items()
            .iter()
            .map(|i| (i.product().id.as_str(), i.quantity()))
            .collect();
        assert_eq!(lines, [("a", 1), ("c", 4)]);
    }

    #[test]
    fn test_remove_ordered_tolerates_lines_changed_meanwhile() {
        let mut cart = CartLedger::new();
        cart.add_item(product("a", Decimal::from(100), 0), 3).unwrap();
        cart.add_one(product("b", Decimal::from(50), 0)).unwrap();
        let ordered = cart.clone();

        cart.update_quantity(&id("a"), 1).unwrap();
        cart.remove_item(&id("b"));
        cart.remove_ordered(&ordered);

        assert!(cart.is_empty());
        assert_eq!(cart.summary(), CartSummary::default());
    }

    fn line_strategy() -> impl Strategy<Value = (i64, u8, u32)> {
        (0i64..10_000_000i64, 0u8..=100u8, 1u32..500u32)
    }

    fn build_cart(lines: &[(i64, u8, u32)]) -> CartLedger {
        let mut cart = CartLedger::new();
        for (i, (cents, discount, quantity)) in lines.iter().enumerate() {
            let p = product(&format!("p{i}"), Decimal::new(*cents, 2), *discount);
            cart.add_item(p, *quantity).unwrap();
        }
        cart
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the discounted unit price follows the percentage formula
        /// exactly and never goes negative.
        #[test]
        fn test_discounted_price_matches_formula(cents in 0i64..100_000_000i64, d in 0u8..=100u8) {
            let price = Decimal::new(cents, 2);
            let p = product("p", price, d);
            let expected = price * (Decimal::ONE - Decimal::from(d) / Decimal::ONE_HUNDRED);

            let actual = CartLedger::discounted_unit_price(&p);
            prop_assert_eq!(actual, expected);
            prop_assert!(actual >= Decimal::ZERO);
        }

        /// Property: adding the same product twice yields one line with the
        /// summed quantity.
        #[test]
        fn test_repeated_add_merges(q1 in 1u32..10_000u32, q2 in 1u32..10_000u32) {
            let mut cart = CartLedger::new();
            cart.add_item(product("p", Decimal::from(7), 0), q1).unwrap();
            cart.add_item(product("p", Decimal::from(7), 0), q2).unwrap();

            prop_assert_eq!(cart.len(), 1);
            prop_assert_eq!(cart.items()[0].quantity(), q1 + q2);
        }

        /// Property: total items is the sum of line quantities and tax is
        /// 18% of the subtotal.
        #[test]
        fn test_totals_track_lines(lines in prop::collection::vec(line_strategy(), 0..12)) {
            let cart = build_cart(&lines);
            let quantities: u64 = lines.iter().map(|(_, _, q)| u64::from(*q)).sum();

            prop_assert_eq!(cart.total_items(), quantities);
            prop_assert_eq!(cart.tax(), cart.subtotal() * TAX_RATE);
            prop_assert_eq!(cart.total(), cart.subtotal() + cart.tax() + cart.shipping());
        }

        /// Property: removing a line lowers the subtotal by exactly its total.
        #[test]
        fn test_subtotal_is_additive(
            lines in prop::collection::vec(line_strategy(), 1..12),
            pick in any::<prop::sample::Index>(),
        ) {
            let mut cart = build_cart(&lines);
            let victim = pick.get(cart.items()).clone();
            let before = cart.subtotal();

            cart.remove_item(&victim.product().id);
            prop_assert_eq!(cart.subtotal(), before - victim.line_total());
            prop_assert_eq!(cart.len(), lines.len() - 1);
        }

        /// Property: tax is recomputed after every quantity change.
        #[test]
        fn test_tax_follows_updates(
            lines in prop::collection::vec(line_strategy(), 1..8),
            new_quantity in 1u32..1_000u32,
        ) {
            let mut cart = build_cart(&lines);
            let first = cart.items()[0].product().id.clone();

            cart.update_quantity(&first, new_quantity).unwrap();
            prop_assert_eq!(cart.tax(), cart.subtotal() * TAX_RATE);
            prop_assert_eq!(cart.get(&first).unwrap().quantity(), new_quantity);
        }
    }
}
