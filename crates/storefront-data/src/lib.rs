//! Catalog retrieval for the storefront.
//!
//! Provides the read-only [`CatalogSource`] contract, two implementations,
//! and a [`CatalogLoader`] that retries transient failures and hands each
//! completed fetch to readers as one snapshot.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use storefront_data::{CatalogLoader, FetchPolicy, JsonFileCatalog};
//!
//! let loader = CatalogLoader::new(
//!     Arc::new(JsonFileCatalog::new("catalog.json")),
//!     FetchPolicy::default(),
//! );
//!
//! let snapshot = loader.load(Some(20)).await?;
//! for product in snapshot.products.iter() {
//!     println!("{} {}", product.title, product.price);
//! }
//! ```

mod error;
mod loader;
mod retry;
mod source;

pub use error::FetchError;
pub use loader::{CatalogLoader, CatalogSnapshot, FetchPolicy, LoadState};
pub use retry::{BackoffStrategy, RetryPolicy};
pub use source::{CatalogSource, JsonFileCatalog, StaticCatalog};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        CatalogLoader, CatalogSnapshot, CatalogSource, FetchError, FetchPolicy, LoadState,
    };
}
