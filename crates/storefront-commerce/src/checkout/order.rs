//! Order submission types.

use crate::cart::{Cart, PriceBreakdown};
use crate::ids::{OrderId, ProductId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One product and quantity in a submitted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Payload handed to the order service.
///
/// Serializes as `{"userId", "date", "products": [{"productId", "quantity"}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub user_id: UserId,
    pub date: DateTime<Utc>,
    #[serde(rename = "products")]
    pub lines: Vec<OrderLine>,
}

impl CheckoutRequest {
    /// Build a request from the cart's line items, in display order.
    pub fn from_cart(user_id: UserId, cart: &Cart, date: DateTime<Utc>) -> Self {
        Self {
            user_id,
            date,
            lines: cart
                .items
                .iter()
                .map(|item| OrderLine {
                    product_id: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> i64 {
        self.lines
            .iter()
            .fold(0i64, |acc, l| acc.saturating_add(l.quantity))
    }
}

/// Outcome of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Identifier assigned by the order service.
    pub order_id: OrderId,
    /// Prices at the moment of submission.
    pub breakdown: PriceBreakdown,
    /// Number of distinct products ordered.
    pub line_count: usize,
    /// Total units ordered.
    pub item_count: i64,
    pub placed_at: DateTime<Utc>,
}
