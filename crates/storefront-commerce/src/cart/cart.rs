//! Cart and line item types.
//!
//! These are the pure state transitions; [`CartEngine`](crate::cart::CartEngine)
//! adds persistence on top.

use crate::cart::Coupon;
use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use crate::persist::Restorable;
use serde::{Deserialize, Serialize};

/// A shopping cart: line items in insertion order plus an optional coupon.
///
/// Holds at most one line item per product id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Cart {
    /// Items in the cart, in display order.
    pub items: Vec<LineItem>,
    /// Applied coupon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon: Option<Coupon>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of `product`.
    ///
    /// An existing line for the product grows by `quantity`; otherwise a new
    /// line is appended holding a snapshot of `product`. The snapshot price
    /// stays in force even if the catalog price later changes.
    ///
    /// Returns an error if:
    /// - Quantity is not positive
    /// - The new quantity or cart subtotal would overflow
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> Result<(), CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }

        match self.position(product.id) {
            Some(index) => {
                let new_quantity = self.items[index]
                    .quantity
                    .checked_add(quantity)
                    .ok_or(CommerceError::Overflow)?;
                self.ensure_subtotal_fits(Some(index), new_quantity, &self.items[index].product)?;
                self.items[index].quantity = new_quantity;
            }
            None => {
                self.ensure_subtotal_fits(None, quantity, product)?;
                self.items.push(LineItem::new(product.clone(), quantity));
            }
        }
        Ok(())
    }

    /// Remove the line for `product_id`. Returns `false` if there was none.
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() < len_before
    }

    /// Set the quantity of an existing line to exactly `quantity`.
    ///
    /// If quantity is <= 0, removes the item. Updating a product that is not
    /// in the cart is a no-op; returns whether anything changed.
    pub fn update_quantity(
        &mut self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return Ok(self.remove_item(product_id));
        }

        let Some(index) = self.position(product_id) else {
            return Ok(false);
        };
        if self.items[index].quantity == quantity {
            return Ok(false);
        }
        self.ensure_subtotal_fits(Some(index), quantity, &self.items[index].product)?;
        self.items[index].quantity = quantity;
        Ok(true)
    }

    /// Clear all items and the coupon.
    pub fn clear(&mut self) {
        self.items.clear();
        self.coupon = None;
    }

    /// Attach a coupon, replacing any previous one.
    pub fn apply_coupon(&mut self, coupon: Coupon, now: i64) -> Result<(), CommerceError> {
        if coupon.is_expired(now) {
            return Err(CommerceError::CouponExpired(coupon.code));
        }
        self.coupon = Some(coupon);
        Ok(())
    }

    /// Detach the coupon. Returns `false` if none was applied.
    pub fn remove_coupon(&mut self) -> bool {
        self.coupon.take().is_some()
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |acc, i| acc.saturating_add(i.quantity))
    }

    /// Get number of distinct products.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the line for a product.
    pub fn get_item(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Merchandise subtotal: Σ price × quantity, before tax, shipping and discount.
    ///
    /// Mutations reject states whose subtotal would overflow, so this is exact.
    pub fn total_price(&self) -> Money {
        self.items
            .iter()
            .fold(Money::zero(), |acc, i| acc + i.line_total())
    }

    /// Check the invariants the mutators maintain: one line per product, a
    /// positive quantity on every line, line ids matching their product
    /// snapshot, and a representable subtotal.
    ///
    /// Only decoded carts can break these.
    pub fn validate(&self) -> Result<(), CommerceError> {
        for (index, item) in self.items.iter().enumerate() {
            if item.quantity <= 0 {
                return Err(CommerceError::InvalidState(format!(
                    "line for product {} has quantity {}",
                    item.product_id, item.quantity
                )));
            }
            if item.product_id != item.product.id {
                return Err(CommerceError::InvalidState(format!(
                    "line for product {} holds product {}",
                    item.product_id, item.product.id
                )));
            }
            if self.items[..index].iter().any(|i| i.product_id == item.product_id) {
                return Err(CommerceError::InvalidState(format!(
                    "product {} has more than one line",
                    item.product_id
                )));
            }
        }
        self.items
            .iter()
            .try_fold(Money::zero(), |acc, i| {
                i.product.price.try_multiply(i.quantity).and_then(|line| acc.try_add(&line))
            })
            .map(|_| ())
            .ok_or(CommerceError::Overflow)
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items.iter().position(|i| i.product_id == product_id)
    }

    /// Check that replacing line `index` (or appending) with `quantity` units
    /// of `product` keeps every line total and the subtotal representable.
    fn ensure_subtotal_fits(
        &self,
        index: Option<usize>,
        quantity: i64,
        product: &Product,
    ) -> Result<(), CommerceError> {
        let candidate = product
            .price
            .try_multiply(quantity)
            .ok_or(CommerceError::Overflow)?;

        self.items
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != index)
            .try_fold(candidate, |acc, (_, item)| {
                item.product
                    .price
                    .try_multiply(item.quantity)
                    .and_then(|line| acc.try_add(&line))
            })
            .map(|_| ())
            .ok_or(CommerceError::Overflow)
    }
}

impl Restorable for Cart {
    fn validate(&self) -> Result<(), CommerceError> {
        Cart::validate(self)
    }
}

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Product being purchased.
    pub product_id: ProductId,
    /// Quantity, always >= 1.
    pub quantity: i64,
    /// Product as it was when first added.
    pub product: Product,
}

impl LineItem {
    /// Create a new line item.
    pub fn new(product: Product, quantity: i64) -> Self {
        Self {
            product_id: product.id,
            quantity,
            product,
        }
    }

    /// Unit price captured at add time.
    pub fn unit_price(&self) -> Money {
        self.product.price
    }

    /// unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.product.price.try_multiply(self.quantity).unwrap_or(Money::new(i64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Rate;

    fn product(id: u64, cents: i64) -> Product {
        Product::new(id, format!("Product {}", id), Money::new(cents), "misc")
    }

    #[test]
    fn test_cart_creation() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total_price(), Money::zero());
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 1000), 2).unwrap();

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.unique_item_count(), 1);
    }

    #[test]
    fn test_add_same_item_increases_quantity() {
        let mut cart = Cart::new();
        let p = product(1, 1000);

        cart.add_item(&p, 1).unwrap();
        cart.add_item(&p, 2).unwrap();

        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_invalid_quantity() {
        let mut cart = Cart::new();
        let result = cart.add_item(&product(1, 1000), 0);
        assert!(matches!(result, Err(CommerceError::InvalidQuantity(0))));
        assert!(matches!(
            cart.add_item(&product(1, 1000), -3),
            Err(CommerceError::InvalidQuantity(-3))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_overflow_leaves_cart_unchanged() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 100), 1).unwrap();
        let before = cart.clone();

        assert!(matches!(
            cart.add_item(&product(1, 100), i64::MAX),
            Err(CommerceError::Overflow)
        ));
        assert!(matches!(
            cart.add_item(&product(2, i64::MAX), 1),
            Err(CommerceError::Overflow)
        ));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_snapshot_price_is_kept() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 1000), 1).unwrap();

        // Catalog price changed since; the line keeps its original price.
        cart.add_item(&product(1, 1500), 1).unwrap();
        assert_eq!(cart.total_price(), Money::new(2000));
    }

    #[test]
    fn test_insertion_order_is_display_order() {
        let mut cart = Cart::new();
        cart.add_item(&product(3, 1), 1).unwrap();
        cart.add_item(&product(1, 1), 1).unwrap();
        cart.add_item(&product(3, 1), 1).unwrap();
        cart.add_item(&product(2, 1), 1).unwrap();

        let ids: Vec<u64> = cart.items.iter().map(|i| i.product_id.get()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_update_quantity_replaces() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 1000), 3).unwrap();

        assert!(cart.update_quantity(ProductId::new(1), 5).unwrap());
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 1000), 3).unwrap();

        assert!(cart.update_quantity(ProductId::new(1), 0).unwrap());
        assert!(cart.get_item(ProductId::new(1)).is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_missing_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 1000), 3).unwrap();
        let before = cart.clone();

        assert!(!cart.update_quantity(ProductId::new(99), 4).unwrap());
        assert!(!cart.update_quantity(ProductId::new(99), 0).unwrap());
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 1000), 1).unwrap();
        cart.add_item(&product(2, 500), 4).unwrap();

        assert!(cart.remove_item(ProductId::new(1)));
        assert_eq!(cart.item_count(), 4);
        assert!(!cart.remove_item(ProductId::new(1)));
    }

    #[test]
    fn test_total_price() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 1000), 2).unwrap();
        cart.add_item(&product(2, 550), 1).unwrap();

        assert_eq!(cart.total_price(), Money::new(2550));
    }

    #[test]
    fn test_clear_removes_coupon() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 1000), 1).unwrap();
        cart.apply_coupon(Coupon::percentage("SAVE10", Rate::from_percent(10.0)), 0)
            .unwrap();

        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.coupon.is_none());

        cart.clear();
        assert_eq!(cart, Cart::new());
    }

    #[test]
    fn test_expired_coupon_rejected() {
        let mut cart = Cart::new();
        let coupon = Coupon::fixed_amount("OLD", Money::new(100)).expires_at(10);
        assert!(matches!(
            cart.apply_coupon(coupon, 11),
            Err(CommerceError::CouponExpired(code)) if code == "OLD"
        ));
        assert!(cart.coupon.is_none());
    }

    #[test]
    fn test_validate_rejects_broken_lines() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 1000), 2).unwrap();
        cart.add_item(&product(2, 500), 1).unwrap();
        assert!(cart.validate().is_ok());

        let mut duplicated = cart.clone();
        duplicated.items.push(LineItem::new(product(1, 1000), 1));
        assert!(matches!(duplicated.validate(), Err(CommerceError::InvalidState(_))));

        let mut zero = cart.clone();
        zero.items[0].quantity = 0;
        assert!(matches!(zero.validate(), Err(CommerceError::InvalidState(_))));

        let mut mismatched = cart.clone();
        mismatched.items[1].product_id = ProductId::new(9);
        assert!(matches!(mismatched.validate(), Err(CommerceError::InvalidState(_))));

        let mut huge = Cart::new();
        huge.items.push(LineItem::new(product(1, i64::MAX), 2));
        assert!(matches!(huge.validate(), Err(CommerceError::Overflow)));
    }
}
