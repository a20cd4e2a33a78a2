//! Engine state across a process restart, on disk.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use storefront_cache::Cache;
use storefront_commerce::prelude::*;

fn catalog() -> Vec<Product> {
    vec![
        Product::new(1u64, "A", Money::new(3000), "misc"),
        Product::new(2u64, "B", Money::new(1000), "misc"),
        Product::new(3u64, "C", Money::new(2000), "misc"),
    ]
}

fn prices(products: &[Product]) -> Vec<i64> {
    products.iter().map(|p| p.price.amount_cents).collect()
}

#[test]
fn file_store_rehydrates_identical_line_items() {
    let dir = tempfile::tempdir().unwrap();

    let before = {
        let cache = Cache::open(dir.path()).unwrap();
        let mut cart = CartEngine::with_writer(Arc::new(cache));
        cart.add_item(&catalog()[0], 2).unwrap();
        cart.add_item(&catalog()[1], 1).unwrap();
        cart.add_item(&catalog()[0], 1).unwrap();
        cart.apply_coupon(Coupon::percentage("SAVE10", Rate::from_percent(10.0)), 0)
            .unwrap();
        cart.snapshot().clone()
    };

    let cache = Cache::open(dir.path()).unwrap();
    let cart = CartEngine::restore(&cache, Arc::new(cache.clone()));
    assert_eq!(cart.snapshot(), &before);
    assert_eq!(cart.item_count(), 4);
    assert_eq!(cart.total_price(), Money::new(10000));
}

#[test]
fn restored_engine_keeps_revision_order() {
    let dir = tempfile::tempdir().unwrap();
    let cache = Cache::open(dir.path()).unwrap();

    let mut first = CartEngine::with_writer(Arc::new(cache.clone()));
    first.add_item(&catalog()[0], 1).unwrap();
    first.add_item(&catalog()[1], 1).unwrap();

    let mut second = CartEngine::restore(&cache, Arc::new(cache.clone()));
    second.remove_item(ProductId::new(1));
    assert_eq!(second.revision(), Some(3));

    let reread = CartEngine::restore(&cache, Arc::new(cache.clone()));
    assert_eq!(reread.unique_item_count(), 1);
    assert!(reread.get_item(ProductId::new(2)).is_some());
}

#[test]
fn sort_and_clear_restore_catalog_order() {
    let dir = tempfile::tempdir().unwrap();
    let cache = Cache::open(dir.path()).unwrap();
    let products = catalog();

    let mut filters = CatalogFilterEngine::with_writer(Arc::new(cache.clone()));
    filters.set_sort_by(SortBy::PriceAsc);
    assert_eq!(prices(&filters.derive_visible(&products)), vec![1000, 2000, 3000]);

    filters.set_sort_by(SortBy::None);
    assert_eq!(prices(&filters.derive_visible(&products)), vec![3000, 1000, 2000]);

    filters.set_search_query("zzz");
    filters.set_sort_by(SortBy::PriceDesc);
    assert!(filters.derive_visible(&products).is_empty());

    filters.clear_filters();
    let restored = CatalogFilterEngine::restore(&cache, Arc::new(cache.clone()));
    assert_eq!(prices(&restored.derive_visible(&products)), vec![3000, 1000, 2000]);
}
