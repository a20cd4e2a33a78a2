//! Product catalog module.
//!
//! Contains the read-only catalog records supplied by the catalog source.

mod category;
mod product;

pub use category::{categories_of, CategorySummary};
pub use product::{Product, Rating};
