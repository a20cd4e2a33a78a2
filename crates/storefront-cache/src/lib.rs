//! Durable key-value persistence for the storefront engines.
//!
//! Provides a small, ergonomic API for storing engine state with automatic
//! JSON serialization, plus the versioned snapshot envelope and the ordered
//! writer the cart and filter engines persist through.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_cache::Cache;
//!
//! let cache = Cache::open(".storefront")?;
//!
//! // Store a value
//! cache.set("prefs:theme", &"dark")?;
//!
//! // Retrieve a value
//! let theme: Option<String> = cache.get("prefs:theme")?;
//!
//! // Delete a value
//! cache.delete("prefs:theme")?;
//! ```

mod error;
mod kv;
mod snapshot;
mod store;
mod writer;

pub use error::CacheError;
pub use kv::{Cache, KvStore};
pub use snapshot::{Snapshot, SCHEMA_VERSION};
pub use store::{FileStore, MemoryStore};
pub use writer::{BackgroundWriter, PendingWrite, SnapshotWriter};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        BackgroundWriter, Cache, CacheError, KvStore, PendingWrite, Snapshot, SnapshotWriter,
    };
}
