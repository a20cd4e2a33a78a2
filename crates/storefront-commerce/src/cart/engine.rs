//! Cart engine: the pure [`Cart`] plus persistence.

use std::sync::Arc;

use storefront_cache::{Cache, SnapshotWriter};

use crate::cart::{Cart, Coupon, LineItem, PriceBreakdown, PricingEngine};
use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use crate::persist::{self, Persistence};

/// Storage key for the cart record.
pub const CART_KEY: &str = "cart";

/// Owns the cart and persists it after each successful mutation.
///
/// Without a writer the engine is purely in-memory.
#[derive(Debug, Default)]
pub struct CartEngine {
    cart: Cart,
    persistence: Option<Persistence>,
}

impl CartEngine {
    /// In-memory engine with an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty cart persisted through `writer`.
    pub fn with_writer(writer: Arc<dyn SnapshotWriter>) -> Self {
        Self {
            cart: Cart::new(),
            persistence: Some(Persistence::new(CART_KEY, writer)),
        }
    }

    /// Rehydrate from `cache`, then persist through `writer`.
    ///
    /// A missing, unreadable or inconsistent record yields an empty cart.
    pub fn restore(cache: &Cache, writer: Arc<dyn SnapshotWriter>) -> Self {
        let (cart, revision) = persist::restore::<Cart>(cache, CART_KEY);
        tracing::debug!(
            items = cart.unique_item_count(),
            revision,
            "cart restored"
        );
        Self {
            cart,
            persistence: Some(Persistence::new(CART_KEY, writer).resume_at(revision)),
        }
    }

    /// Add `quantity` units of `product`. See [`Cart::add_item`].
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> Result<(), CommerceError> {
        self.cart.add_item(product, quantity)?;
        tracing::debug!(product_id = %product.id, quantity, "cart add");
        self.persist();
        Ok(())
    }

    /// Remove a product's line. Returns `false` if it was not in the cart.
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        let removed = self.cart.remove_item(product_id);
        if removed {
            tracing::debug!(%product_id, "cart remove");
            self.persist();
        }
        removed
    }

    /// Set a line's quantity; `quantity <= 0` removes it. Absent ids are a no-op.
    pub fn update_quantity(
        &mut self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<bool, CommerceError> {
        let changed = self.cart.update_quantity(product_id, quantity)?;
        if changed {
            tracing::debug!(%product_id, quantity, "cart update");
            self.persist();
        }
        Ok(changed)
    }

    /// Empty the cart, including any coupon.
    pub fn clear_cart(&mut self) {
        if self.cart == Cart::default() {
            return;
        }
        self.cart.clear();
        tracing::debug!("cart cleared");
        self.persist();
    }

    /// Attach a coupon valid as of `now`.
    pub fn apply_coupon(&mut self, coupon: Coupon, now: i64) -> Result<(), CommerceError> {
        let code = coupon.code.clone();
        self.cart.apply_coupon(coupon, now)?;
        tracing::debug!(%code, "coupon applied");
        self.persist();
        Ok(())
    }

    /// Detach the coupon. Returns `false` if none was applied.
    pub fn remove_coupon(&mut self) -> bool {
        let removed = self.cart.remove_coupon();
        if removed {
            tracing::debug!("coupon removed");
            self.persist();
        }
        removed
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> i64 {
        self.cart.item_count()
    }

    /// Pre-tax merchandise subtotal.
    pub fn total_price(&self) -> Money {
        self.cart.total_price()
    }

    /// Number of distinct products.
    pub fn unique_item_count(&self) -> usize {
        self.cart.unique_item_count()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Line for a product.
    pub fn get_item(&self, product_id: ProductId) -> Option<&LineItem> {
        self.cart.get_item(product_id)
    }

    /// Line items in display order.
    pub fn items(&self) -> &[LineItem] {
        &self.cart.items
    }

    /// Current cart state.
    pub fn snapshot(&self) -> &Cart {
        &self.cart
    }

    /// Price the current cart.
    pub fn quote(&self, pricing: &PricingEngine, as_of: i64) -> PriceBreakdown {
        pricing.quote(&self.cart, as_of)
    }

    /// Revision of the last persisted snapshot, if persisting.
    pub fn revision(&self) -> Option<u64> {
        self.persistence.as_ref().map(Persistence::revision)
    }

    fn persist(&mut self) {
        if let Some(persistence) = self.persistence.as_mut() {
            persistence.save(&self.cart);
        }
    }
}
