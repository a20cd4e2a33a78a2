//! Catalog retrieval error types.

use std::time::Duration;

use storefront_commerce::{CommerceError, ProductId};
use thiserror::Error;

/// Errors that can occur when reading from a catalog source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The source could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// No product with this id.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// The source answered with data that is not a catalog.
    #[error("Failed to decode catalog: {0}")]
    Decode(String),

    /// The call did not finish in time.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

impl FetchError {
    /// Whether retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Network(_) | FetchError::Timeout(_))
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}

impl From<FetchError> for CommerceError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::NotFound(id) => CommerceError::ProductNotFound(id),
            other => CommerceError::Network(other.to_string()),
        }
    }
}
