//! Shopping cart module.
//!
//! Contains the cart state, its persisting engine, pricing, and coupons.

mod cart;
mod discount;
mod engine;
mod pricing;

pub use cart::{Cart, LineItem};
pub use discount::{Coupon, CouponKind};
pub use engine::{CartEngine, CART_KEY};
pub use pricing::{PriceBreakdown, PricingEngine, PricingRules};
