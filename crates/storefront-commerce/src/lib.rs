//! Storefront domain types and engines.
//!
//! This crate holds the client-side state of a small online store:
//!
//! - **Catalog**: Product records and category summaries
//! - **Cart**: Line items, coupons, and the persisting [`CartEngine`](cart::CartEngine)
//! - **Search**: Filter criteria and the visible-list derivation
//! - **Checkout**: Order submission with a single in-flight attempt
//!
//! Money is integer cents throughout; see [`money`].
//!
//! # Example
//!
//! ```rust
//! use storefront_commerce::prelude::*;
//!
//! let shirt = Product::new(1u64, "Slim Fit T-Shirt", Money::new(2230), "men's clothing");
//!
//! let mut cart = CartEngine::new();
//! cart.add_item(&shirt, 2).unwrap();
//!
//! let quote = cart.quote(&PricingEngine::default(), 0);
//! assert_eq!(quote.subtotal, Money::new(4460));
//! println!("Total: {}", quote.total.display());
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod search;

mod persist;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Money, Rate};
pub use persist::{Persistence, Restorable};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Money, Rate};

    // Catalog
    pub use crate::catalog::{categories_of, CategorySummary, Product, Rating};

    // Cart
    pub use crate::cart::{
        Cart, CartEngine, Coupon, CouponKind, LineItem, PriceBreakdown, PricingEngine,
        PricingRules,
    };

    // Checkout
    pub use crate::checkout::{
        CheckoutRequest, CheckoutService, MemoryOrderGateway, OrderGateway, OrderLine, Receipt,
    };

    // Search
    pub use crate::search::{CatalogFilterEngine, FilterState, PriceRange, SortBy, ViewMode};
}
