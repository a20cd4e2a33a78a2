//! Order service boundary.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::checkout::CheckoutRequest;
use crate::error::CommerceError;
use crate::ids::OrderId;

/// Accepts checkout submissions and assigns order ids.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submit an order. Failures leave the caller's cart untouched.
    async fn submit_order(&self, request: &CheckoutRequest) -> Result<OrderId, CommerceError>;
}

/// Keeps submitted orders in memory.
#[derive(Debug, Default)]
pub struct MemoryOrderGateway {
    orders: Mutex<Vec<(OrderId, CheckoutRequest)>>,
}

impl MemoryOrderGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders accepted so far, oldest first.
    pub fn orders(&self) -> Vec<(OrderId, CheckoutRequest)> {
        self.orders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl OrderGateway for MemoryOrderGateway {
    async fn submit_order(&self, request: &CheckoutRequest) -> Result<OrderId, CommerceError> {
        let order_id = OrderId::generate();
        self.orders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((order_id.clone(), request.clone()));
        Ok(order_id)
    }
}
