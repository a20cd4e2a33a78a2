//! Filter engine: [`FilterState`] plus persistence.

use std::sync::Arc;

use storefront_cache::{Cache, SnapshotWriter};

use crate::catalog::{categories_of, CategorySummary, Product};
use crate::error::CommerceError;
use crate::money::Money;
use crate::persist::{self, Persistence};
use crate::search::{FilterState, PriceRange, SortBy, ViewMode};

/// Storage key for the filter record.
pub const FILTERS_KEY: &str = "filters";

/// Owns the listing criteria and persists them after each change.
#[derive(Debug, Default)]
pub struct CatalogFilterEngine {
    state: FilterState,
    persistence: Option<Persistence>,
}

impl CatalogFilterEngine {
    /// In-memory engine with default criteria.
    pub fn new() -> Self {
        Self::default()
    }

    /// Default criteria persisted through `writer`.
    pub fn with_writer(writer: Arc<dyn SnapshotWriter>) -> Self {
        Self {
            state: FilterState::default(),
            persistence: Some(Persistence::new(FILTERS_KEY, writer)),
        }
    }

    /// Rehydrate from `cache`, then persist through `writer`.
    pub fn restore(cache: &Cache, writer: Arc<dyn SnapshotWriter>) -> Self {
        let (state, revision) = persist::restore::<FilterState>(cache, FILTERS_KEY);
        Self {
            state,
            persistence: Some(Persistence::new(FILTERS_KEY, writer).resume_at(revision)),
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// In-memory copy of the current criteria. Changes to it are not persisted.
    pub fn preview(&self) -> CatalogFilterEngine {
        CatalogFilterEngine {
            state: self.state.clone(),
            persistence: None,
        }
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.update(|s| s.search_query = query);
    }

    /// Replace the selected categories. Duplicates are dropped, first one wins.
    pub fn set_selected_categories<I, S>(&mut self, categories: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selected: Vec<String> = Vec::new();
        for category in categories {
            let category = category.into();
            if !selected.contains(&category) {
                selected.push(category);
            }
        }
        self.update(|s| s.selected_categories = selected);
    }

    /// Add `category` to the selection, or remove it if already selected.
    pub fn toggle_category(&mut self, category: &str) {
        self.update(|s| {
            match s.selected_categories.iter().position(|c| c == category) {
                Some(index) => {
                    s.selected_categories.remove(index);
                }
                None => s.selected_categories.push(category.to_string()),
            }
        });
    }

    /// Set the inclusive price bounds. `min > max` is rejected and nothing changes.
    pub fn set_price_range(&mut self, min: Money, max: Money) -> Result<(), CommerceError> {
        let range = PriceRange::new(min, max)?;
        self.update(|s| s.price_range = range);
        Ok(())
    }

    pub fn set_sort_by(&mut self, sort_by: SortBy) {
        self.update(|s| s.sort_by = sort_by);
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        self.update(|s| s.view_mode = view_mode);
    }

    /// Reset search, categories, price range and sort to their defaults in one
    /// step. Unlike every other field, `view_mode` is deliberately left as it
    /// is: it is a layout preference, not a filter.
    pub fn clear_filters(&mut self) {
        let view_mode = self.state.view_mode;
        self.update(|s| {
            *s = FilterState {
                view_mode,
                ..FilterState::default()
            }
        });
    }

    /// The products to show, filtered and sorted by the current criteria.
    pub fn derive_visible(&self, products: &[Product]) -> Vec<Product> {
        self.state.derive_visible(products)
    }

    /// Distinct categories present in `products`, in catalog order.
    pub fn available_categories(&self, products: &[Product]) -> Vec<CategorySummary> {
        categories_of(products)
    }

    /// Revision of the last persisted snapshot, if persisting.
    pub fn revision(&self) -> Option<u64> {
        self.persistence.as_ref().map(Persistence::revision)
    }

    fn update(&mut self, change: impl FnOnce(&mut FilterState)) {
        let before = self.state.clone();
        change(&mut self.state);
        if self.state == before {
            return;
        }
        tracing::debug!(filters = ?self.state, "filters updated");
        if let Some(persistence) = self.persistence.as_mut() {
            persistence.save(&self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_persist() {
        let cache = Cache::in_memory();
        let mut engine = CatalogFilterEngine::with_writer(Arc::new(cache.clone()));

        engine.set_search_query("ring");
        engine.set_sort_by(SortBy::PriceDesc);
        engine.set_view_mode(ViewMode::List);

        let restored = CatalogFilterEngine::restore(&cache, Arc::new(cache.clone()));
        assert_eq!(restored.state(), engine.state());
        assert_eq!(restored.revision(), Some(3));
    }

    #[test]
    fn test_unchanged_value_does_not_persist() {
        let cache = Cache::in_memory();
        let mut engine = CatalogFilterEngine::with_writer(Arc::new(cache.clone()));

        engine.set_sort_by(SortBy::None);
        engine.set_search_query("");
        assert_eq!(engine.revision(), Some(0));
    }

    #[test]
    fn test_invalid_range_leaves_state() {
        let mut engine = CatalogFilterEngine::new();
        engine.set_price_range(Money::new(100), Money::new(200)).unwrap();
        let before = engine.state().clone();

        assert!(engine.set_price_range(Money::new(300), Money::new(200)).is_err());
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_clear_keeps_view_mode() {
        let mut engine = CatalogFilterEngine::new();
        engine.set_search_query("ring");
        engine.set_selected_categories(["jewelery"]);
        engine.set_price_range(Money::new(100), Money::new(200)).unwrap();
        engine.set_sort_by(SortBy::Title);
        engine.set_view_mode(ViewMode::List);

        engine.clear_filters();

        let expected = FilterState {
            view_mode: ViewMode::List,
            ..FilterState::default()
        };
        assert_eq!(engine.state(), &expected);
    }

    #[test]
    fn test_clear_shows_whole_catalog() {
        let products = vec![
            Product::new(1u64, "Mug", Money::new(900), "kitchen"),
            Product::new(2u64, "Espresso Machine", Money::new(150_000), "kitchen"),
        ];
        let mut engine = CatalogFilterEngine::new();
        engine.set_price_range(Money::new(0), Money::new(1000)).unwrap();
        assert_eq!(engine.derive_visible(&products).len(), 1);

        engine.clear_filters();
        assert_eq!(engine.derive_visible(&products), products);
        assert!(!engine.state().is_active());
    }

    #[test]
    fn test_restore_inverted_range_is_default() {
        let cache = Cache::in_memory();
        let mut state = FilterState {
            search_query: "ring".into(),
            ..FilterState::default()
        };
        state.price_range.min = Money::new(5000);
        state.price_range.max = Money::new(100);
        cache
            .set(FILTERS_KEY, &storefront_cache::Snapshot::new(4, &state))
            .unwrap();

        let engine = CatalogFilterEngine::restore(&cache, Arc::new(cache.clone()));
        assert_eq!(engine.state(), &FilterState::default());
        assert_eq!(engine.revision(), Some(4));
    }

    #[test]
    fn test_selected_categories_dedup() {
        let mut engine = CatalogFilterEngine::new();
        engine.set_selected_categories(["a", "b", "a"]);
        assert_eq!(engine.state().selected_categories, vec!["a", "b"]);

        engine.toggle_category("a");
        assert_eq!(engine.state().selected_categories, vec!["b"]);
        engine.toggle_category("c");
        assert_eq!(engine.state().selected_categories, vec!["b", "c"]);
    }

    #[test]
    fn test_preview_is_not_persisted() {
        let cache = Cache::in_memory();
        let mut engine = CatalogFilterEngine::with_writer(Arc::new(cache.clone()));
        engine.set_search_query("ring");

        let mut preview = engine.preview();
        preview.set_sort_by(SortBy::Title);
        assert_eq!(preview.state().search_query, "ring");
        assert_eq!(preview.revision(), None);

        let restored = CatalogFilterEngine::restore(&cache, Arc::new(cache.clone()));
        assert_eq!(restored.state().sort_by, SortBy::None);
    }

    #[test]
    fn test_restore_missing_record_is_default() {
        let cache = Cache::in_memory();
        let engine = CatalogFilterEngine::restore(&cache, Arc::new(cache.clone()));
        assert_eq!(engine.state(), &FilterState::default());
    }
}
