//! Checkout module.
//!
//! Contains the order submission contract and the single-attempt checkout service.

mod flow;
mod gateway;
mod order;

pub use flow::CheckoutService;
pub use gateway::{MemoryOrderGateway, OrderGateway};
pub use order::{CheckoutRequest, OrderLine, Receipt};
