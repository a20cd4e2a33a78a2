//! Coupon types.

use crate::money::{Money, Rate};
use serde::{Deserialize, Serialize};

/// How a coupon reduces the merchandise subtotal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CouponKind {
    /// Percentage off the pre-tax subtotal.
    Percentage(Rate),
    /// Fixed amount off.
    Fixed(Money),
}

/// A discount code attached to a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Coupon {
    /// Discount code (e.g., "SAVE10").
    pub code: String,
    /// Discount rule.
    pub kind: CouponKind,
    /// Unix timestamp after which the coupon no longer applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl Coupon {
    /// Create a percentage coupon.
    pub fn percentage(code: impl Into<String>, rate: Rate) -> Self {
        Self {
            code: code.into(),
            kind: CouponKind::Percentage(rate),
            expires_at: None,
        }
    }

    /// Create a fixed amount coupon.
    pub fn fixed_amount(code: impl Into<String>, amount: Money) -> Self {
        Self {
            code: code.into(),
            kind: CouponKind::Fixed(amount),
            expires_at: None,
        }
    }

    /// Set expiration date.
    pub fn expires_at(mut self, timestamp: i64) -> Self {
        self.expires_at = Some(timestamp);
        self
    }

    /// Check if the coupon has expired as of `now`.
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at.map(|ends| now > ends).unwrap_or(false)
    }

    /// Discount for a given pre-tax subtotal, never more than the subtotal
    /// and never negative.
    pub fn discount_for(&self, subtotal: Money) -> Money {
        let subtotal = subtotal.floor_zero();
        let raw = match self.kind {
            CouponKind::Percentage(rate) => rate.of(subtotal),
            CouponKind::Fixed(amount) => amount,
        };
        raw.floor_zero().min(subtotal)
    }
}
