//! Product listing module.
//!
//! Contains the filter state, sort options, and the persisting filter engine.

mod engine;
mod filter;
mod sort;

pub use engine::{CatalogFilterEngine, FILTERS_KEY};
pub use filter::{FilterState, PriceRange};
pub use sort::{SortBy, ViewMode};
