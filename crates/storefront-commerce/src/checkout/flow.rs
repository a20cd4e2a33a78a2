//! Checkout submission.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};

use crate::cart::{CartEngine, PricingEngine};
use crate::checkout::{CheckoutRequest, OrderGateway, Receipt};
use crate::error::CommerceError;
use crate::ids::UserId;

/// Submits carts to an [`OrderGateway`], one attempt at a time.
///
/// A call made while another is still waiting on the gateway fails with
/// [`CommerceError::CheckoutInProgress`] instead of queueing.
pub struct CheckoutService<G> {
    gateway: G,
    pricing: PricingEngine,
    in_flight: AtomicBool,
}

impl<G: OrderGateway> CheckoutService<G> {
    pub fn new(gateway: G, pricing: PricingEngine) -> Self {
        Self {
            gateway,
            pricing,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Whether a submission is waiting on the gateway.
    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Submit `cart` for `user` now.
    pub async fn checkout(
        &self,
        user: Option<UserId>,
        cart: &mut CartEngine,
    ) -> Result<Receipt, CommerceError> {
        self.checkout_at(user, cart, Utc::now()).await
    }

    /// Submit `cart` for `user`, dated `date`.
    ///
    /// Returns an error if:
    /// - No user is logged in
    /// - The cart is empty
    /// - Another checkout is in flight
    /// - The gateway fails
    ///
    /// The cart is cleared only after the gateway accepts the order.
    pub async fn checkout_at(
        &self,
        user: Option<UserId>,
        cart: &mut CartEngine,
        date: DateTime<Utc>,
    ) -> Result<Receipt, CommerceError> {
        let user_id = user.ok_or(CommerceError::AuthRequired)?;
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }

        let _guard = InFlight::acquire(&self.in_flight)?;

        let breakdown = cart.quote(&self.pricing, date.timestamp());
        let request = CheckoutRequest::from_cart(user_id, cart.snapshot(), date);
        tracing::debug!(%user_id, lines = request.lines.len(), "submitting order");

        let order_id = match self.gateway.submit_order(&request).await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(%user_id, error = %e, "checkout failed");
                return Err(e);
            }
        };

        let receipt = Receipt {
            order_id,
            breakdown,
            line_count: request.lines.len(),
            item_count: request.item_count(),
            placed_at: date,
        };
        cart.clear_cart();

        tracing::info!(
            order_id = %receipt.order_id,
            total = %receipt.breakdown.total,
            "order placed"
        );
        Ok(receipt)
    }
}

/// Holds the in-flight flag until dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, CommerceError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlight(flag))
            .map_err(|_| CommerceError::CheckoutInProgress)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use crate::checkout::MemoryOrderGateway;
    use crate::ids::OrderId;
    use crate::money::Money;
    use async_trait::async_trait;

    fn service() -> CheckoutService<MemoryOrderGateway> {
        CheckoutService::new(MemoryOrderGateway::new(), PricingEngine::default())
    }

    fn cart_with_items() -> CartEngine {
        let mut cart = CartEngine::new();
        cart.add_item(&Product::new(1u64, "Shirt", Money::new(2000), "clothing"), 2)
            .unwrap();
        cart
    }

    struct RejectingGateway;

    #[async_trait]
    impl OrderGateway for RejectingGateway {
        async fn submit_order(&self, _: &CheckoutRequest) -> Result<OrderId, CommerceError> {
            Err(CommerceError::OrderRejected("out of stock".into()))
        }
    }

    #[tokio::test]
    async fn test_checkout_success_clears_cart() {
        let service = service();
        let mut cart = cart_with_items();

        let receipt = service.checkout(Some(UserId::new(7)), &mut cart).await.unwrap();

        assert_eq!(receipt.breakdown.total, Money::new(5319));
        assert_eq!(receipt.item_count, 2);
        assert_eq!(receipt.line_count, 1);
        assert!(cart.is_empty());

        let orders = service.gateway().orders();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].0, receipt.order_id);
        assert_eq!(orders[0].1.user_id, UserId::new(7));
        assert!(!service.is_pending());
    }

    #[tokio::test]
    async fn test_checkout_requires_user() {
        let service = service();
        let mut cart = cart_with_items();

        let result = service.checkout(None, &mut cart).await;
        assert!(matches!(result, Err(CommerceError::AuthRequired)));
        assert_eq!(cart.item_count(), 2);
        assert!(service.gateway().orders().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_rejects_empty_cart() {
        let service = service();
        let mut cart = CartEngine::new();

        let result = service.checkout(Some(UserId::new(1)), &mut cart).await;
        assert!(matches!(result, Err(CommerceError::EmptyCart)));
        assert!(service.gateway().orders().is_empty());
    }

    #[tokio::test]
    async fn test_gateway_failure_keeps_cart() {
        let service = CheckoutService::new(RejectingGateway, PricingEngine::default());
        let mut cart = cart_with_items();

        let result = service.checkout(Some(UserId::new(1)), &mut cart).await;
        assert!(matches!(result, Err(CommerceError::OrderRejected(_))));
        assert_eq!(cart.item_count(), 2);
        assert!(!service.is_pending());
    }
}
