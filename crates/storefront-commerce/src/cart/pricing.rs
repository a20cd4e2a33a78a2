//! Cart pricing calculations.
//!
//! Tax is exclusive: it is charged on the merchandise subtotal and added on
//! top. Shipping is waived once the subtotal reaches the free-shipping
//! threshold. A coupon discount comes off last and the total never goes
//! below zero.

use crate::cart::Cart;
use crate::money::{Money, Rate};
use serde::{Deserialize, Serialize};

/// Store-wide pricing rules.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PricingRules {
    /// Tax rate applied to the merchandise subtotal.
    pub tax_rate: Rate,
    /// Subtotal at or above which shipping is free.
    pub free_shipping_threshold: Money,
    /// Shipping fee below the threshold.
    pub flat_shipping_fee: Money,
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            tax_rate: Rate::from_basis_points(800),
            free_shipping_threshold: Money::new(5000),
            flat_shipping_fee: Money::new(999),
        }
    }
}

/// Complete pricing breakdown for a cart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PriceBreakdown {
    /// Σ price × quantity.
    pub subtotal: Money,
    /// Tax on the subtotal.
    pub tax: Money,
    /// Shipping cost.
    pub shipping: Money,
    /// Coupon discount.
    pub discount: Money,
    /// subtotal + tax + shipping − discount, floored at zero.
    pub total: Money,
}

impl PriceBreakdown {
    /// Check if any discount is applied.
    pub fn has_discount(&self) -> bool {
        self.discount.amount_cents > 0
    }
}

/// Computes [`PriceBreakdown`]s from a cart and a set of rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingEngine {
    rules: PricingRules,
}

impl PricingEngine {
    /// Create an engine with the given rules.
    pub fn new(rules: PricingRules) -> Self {
        Self { rules }
    }

    /// The rules in force.
    pub fn rules(&self) -> &PricingRules {
        &self.rules
    }

    /// Price `cart` as of Unix time `as_of`. An expired coupon contributes nothing.
    pub fn quote(&self, cart: &Cart, as_of: i64) -> PriceBreakdown {
        let subtotal = cart.total_price();
        let tax = self.rules.tax_rate.of(subtotal);
        let shipping = self.shipping_for(cart, subtotal);
        let discount = cart
            .coupon
            .as_ref()
            .filter(|c| !c.is_expired(as_of))
            .map(|c| c.discount_for(subtotal))
            .unwrap_or_default();

        let total = (subtotal + tax + shipping - discount).floor_zero();

        PriceBreakdown {
            subtotal,
            tax,
            shipping,
            discount,
            total,
        }
    }

    /// Whether `subtotal` qualifies for free shipping.
    pub fn is_free_shipping(&self, subtotal: Money) -> bool {
        subtotal >= self.rules.free_shipping_threshold
    }

    /// How much more the customer must spend to get free shipping.
    pub fn amount_to_free_shipping(&self, subtotal: Money) -> Money {
        (self.rules.free_shipping_threshold - subtotal).floor_zero()
    }

    fn shipping_for(&self, cart: &Cart, subtotal: Money) -> Money {
        if cart.is_empty() || self.is_free_shipping(subtotal) {
            Money::zero()
        } else {
            self.rules.flat_shipping_fee
        }
    }
}
