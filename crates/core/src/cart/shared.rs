use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;

use super::{CartError, CartLedger, CartSummary};
use crate::models::Product;
use crate::types::ProductId;

/// A [`CartLedger`] shared between threads behind a single mutex.
///
/// Every method takes the lock for the whole operation, so readers always
/// see a ledger between two complete mutations. Clones share the same cart.
#[derive(Debug, Clone, Default)]
pub struct SharedCartLedger {
    inner: Arc<Mutex<CartLedger>>,
}

impl SharedCartLedger {
    /// Create an empty shared cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // Ledger methods never panic while holding the lock, so a poisoned
    // mutex still guards a consistent ledger.
    fn lock(&self) -> MutexGuard<'_, CartLedger> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the ledger.
    pub fn with<R>(&self, f: impl FnOnce(&mut CartLedger) -> R) -> R {
        f(&mut self.lock())
    }

    /// Copy of the current ledger.
    #[must_use]
    pub fn snapshot(&self) -> CartLedger {
        self.lock().clone()
    }

    /// See [`CartLedger::add_item`].
    ///
    /// # Errors
    ///
    /// Propagates the ledger's validation errors.
    pub fn add_item(&self, product: Product, quantity: u32) -> Result<(), CartError> {
        self.lock().add_item(product, quantity)
    }

    /// See [`CartLedger::remove_item`].
    pub fn remove_item(&self, product_id: &ProductId) {
        self.lock().remove_item(product_id);
    }

    /// See [`CartLedger::update_quantity`].
    ///
    /// # Errors
    ///
    /// Propagates the ledger's validation errors.
    pub fn update_quantity(&self, product_id: &ProductId, quantity: u32) -> Result<(), CartError> {
        self.lock().update_quantity(product_id, quantity)
    }

    /// See [`CartLedger::remove_ordered`].
    pub fn remove_ordered(&self, ordered: &CartLedger) {
        self.lock().remove_ordered(ordered);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lock().total_items()
    }

    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lock().subtotal()
    }

    #[must_use]
    pub fn summary(&self) -> CartSummary {
        self.lock().summary()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Discount;

    #[test]
    fn test_clones_share_one_cart() {
        let cart = SharedCartLedger::new();
        let other = cart.clone();
        cart.add_item(Product::new("p1", Decimal::from(10), Discount::NONE), 2)
            .unwrap();

        assert_eq!(other.total_items(), 2);
        other.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_concurrent_adds_are_not_lost() {
        let cart = SharedCartLedger::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cart = cart.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        cart.add_item(Product::new("p1", Decimal::ONE, Discount::NONE), 1)
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cart.total_items(), 800);
        assert_eq!(cart.snapshot().len(), 1);
        assert_eq!(cart.subtotal(), Decimal::from(800));
    }

    #[test]
    fn test_with_gives_exclusive_access() {
        let cart = SharedCartLedger::new();
        let lines = cart.with(|ledger| {
            ledger.add_one(Product::new("a", Decimal::ONE, Discount::NONE)).unwrap();
            ledger.add_one(Product::new("b", Decimal::ONE, Discount::NONE)).unwrap();
            ledger.len()
        });
        assert_eq!(lines, 2);
        assert_eq!(cart.summary().shipping, Decimal::from(50));
    }
}
