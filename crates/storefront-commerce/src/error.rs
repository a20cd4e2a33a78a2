//! Commerce error types.

use crate::ids::ProductId;
use crate::money::Money;
use thiserror::Error;

/// Errors that can occur in storefront operations.
///
/// Engine mutations that fail with any of these leave state unchanged.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Quantity passed to an add was not a positive integer.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Price range lower bound above upper bound.
    #[error("Invalid price range: {min} > {max}")]
    InvalidRange { min: Money, max: Money },

    /// Product not found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Checkout attempted without an authenticated user.
    #[error("Please log in to check out")]
    AuthRequired,

    /// Checkout attempted with no line items.
    #[error("Cart is empty")]
    EmptyCart,

    /// Another checkout submission is still pending.
    #[error("A checkout is already in progress")]
    CheckoutInProgress,

    /// The order service refused the order.
    #[error("Order rejected: {0}")]
    OrderRejected(String),

    /// Coupon is past its expiry.
    #[error("Coupon expired: {0}")]
    CouponExpired(String),

    /// Catalog retrieval failed after retries.
    #[error("Failed to load catalog: {0}")]
    Network(String),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Cache error.
    #[error("Cache error: {0}")]
    CacheError(#[from] storefront_cache::CacheError),

    /// A decoded record breaks an invariant the engines rely on.
    #[error("Inconsistent state: {0}")]
    InvalidState(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CommerceError {
    /// Whether retrying the same call later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CommerceError::Network(_) | CommerceError::CheckoutInProgress
        )
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
