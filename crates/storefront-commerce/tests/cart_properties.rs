//! Property-based tests for cart and filter invariants.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use storefront_commerce::prelude::*;

fn arb_product() -> impl Strategy<Value = Product> {
    (
        1u64..20,
        0i64..100_000,
        prop::sample::select(vec!["electronics", "jewelery", "men's clothing"]),
        prop::option::of(0.0f64..5.0),
        "[A-Za-z ]{1,12}",
    )
        .prop_map(|(id, cents, category, rate, title)| {
            let product = Product::new(id, title, Money::new(cents), category);
            match rate {
                Some(rate) => product.with_rating(rate, 1),
                None => product,
            }
        })
}

#[derive(Debug, Clone)]
enum CartOp {
    Add(u64, i64),
    Remove(u64),
    Update(u64, i64),
}

fn arb_op() -> impl Strategy<Value = CartOp> {
    prop_oneof![
        (1u64..6, 1i64..10).prop_map(|(id, q)| CartOp::Add(id, q)),
        (1u64..6).prop_map(CartOp::Remove),
        (1u64..6, -2i64..10).prop_map(|(id, q)| CartOp::Update(id, q)),
    ]
}

fn product(id: u64) -> Product {
    Product::new(id, format!("Product {}", id), Money::new(id as i64 * 125), "misc")
}

proptest! {
    #[test]
    fn repeated_adds_aggregate(quantities in prop::collection::vec(1i64..50, 1..20)) {
        let mut cart = Cart::new();
        for q in &quantities {
            cart.add_item(&product(1), *q).unwrap();
        }

        let expected: i64 = quantities.iter().sum();
        prop_assert_eq!(cart.unique_item_count(), 1);
        prop_assert_eq!(cart.item_count(), expected);
        prop_assert_eq!(cart.total_price(), Money::new(125 * expected));
    }

    #[test]
    fn cart_invariants_hold(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut cart = Cart::new();
        for op in ops {
            match op {
                CartOp::Add(id, q) => { cart.add_item(&product(id), q).unwrap(); }
                CartOp::Remove(id) => { cart.remove_item(ProductId::new(id)); }
                CartOp::Update(id, q) => { cart.update_quantity(ProductId::new(id), q).unwrap(); }
            }

            let mut ids: Vec<u64> = cart.items.iter().map(|i| i.product_id.get()).collect();
            let len = ids.len();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), len, "one line per product");
            prop_assert!(cart.items.iter().all(|i| i.quantity >= 1));

            let sum = cart
                .items
                .iter()
                .map(|i| i.unit_price().amount_cents * i.quantity)
                .sum::<i64>();
            prop_assert_eq!(cart.total_price(), Money::new(sum));
        }
    }

    #[test]
    fn add_then_remove_restores_subtotal(
        existing in prop::collection::vec((2u64..8, 1i64..5), 0..5),
        quantity in 1i64..20,
    ) {
        let mut cart = Cart::new();
        for (id, q) in existing {
            cart.add_item(&product(id), q).unwrap();
        }
        let before = cart.total_price();

        cart.add_item(&product(1), quantity).unwrap();
        cart.remove_item(ProductId::new(1));

        prop_assert_eq!(cart.total_price(), before);
    }

    #[test]
    fn visible_list_is_filtered_subset(
        products in prop::collection::vec(arb_product(), 0..30),
        query in "[a-z]{0,2}",
        min in 0i64..50_000,
        span in 0i64..60_000,
        sort in prop::sample::select(SortBy::ALL.to_vec()),
    ) {
        let state = FilterState {
            search_query: query.clone(),
            price_range: PriceRange::new(Money::new(min), Money::new(min + span)).unwrap(),
            sort_by: sort,
            ..FilterState::default()
        };

        let visible = state.derive_visible(&products);
        let expected = products.iter().filter(|p| state.matches(p)).count();
        prop_assert_eq!(visible.len(), expected);
        for p in &visible {
            prop_assert!(p.title.to_lowercase().contains(&query));
            prop_assert!(p.price >= Money::new(min) && p.price <= Money::new(min + span));
        }

        if sort == SortBy::PriceAsc {
            prop_assert!(visible.windows(2).all(|w| w[0].price <= w[1].price));
        }
        if sort == SortBy::None {
            let filtered: Vec<_> = products.iter().filter(|p| state.matches(p)).cloned().collect();
            prop_assert_eq!(visible, filtered);
        }
    }

    #[test]
    fn quote_total_never_negative(
        cents in 0i64..100_000,
        quantity in 1i64..10,
        off in 0i64..2_000_000,
    ) {
        let mut cart = Cart::new();
        cart.add_item(&product(1), quantity).unwrap();
        cart.add_item(&Product::new(2u64, "x", Money::new(cents), "misc"), 1).unwrap();
        cart.apply_coupon(Coupon::fixed_amount("OFF", Money::new(off)), 0).unwrap();

        let quote = PricingEngine::default().quote(&cart, 0);
        prop_assert!(!quote.total.is_negative());
        prop_assert!(quote.discount <= quote.subtotal);
    }
}
