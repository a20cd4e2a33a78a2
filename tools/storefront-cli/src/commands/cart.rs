//! Cart commands.

use anyhow::{bail, Result};
use chrono::Utc;
use dialoguer::Confirm;
use serde::Serialize;
use storefront_commerce::cart::{CartEngine, Coupon, LineItem, PriceBreakdown};
use storefront_commerce::{CommerceError, Money, Rate};

use super::{CartArgs, CartCommand, CouponArgs};
use crate::context::Context;
use crate::output::{price_cell, truncate};

#[derive(Serialize)]
struct CartView<'a> {
    items: &'a [LineItem],
    coupon: Option<&'a Coupon>,
    item_count: i64,
    unique_item_count: usize,
    breakdown: PriceBreakdown,
    amount_to_free_shipping: Money,
}

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let mut cart = store.cart();

    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => {}
        CartCommand::Add {
            product_id,
            quantity,
        } => {
            let product = ctx
                .loader()
                .get_product(product_id)
                .await
                .map_err(CommerceError::from)?;
            cart.add_item(&product, quantity)?;
            ctx.output
                .success(&format!("Added {} x {}", quantity, product.title));
        }
        CartCommand::Remove { product_id } => {
            if cart.remove_item(product_id) {
                ctx.output.success(&format!("Removed product {}", product_id));
            } else {
                ctx.output
                    .warn(&format!("Product {} is not in the cart", product_id));
            }
        }
        CartCommand::Update {
            product_id,
            quantity,
        } => {
            if cart.update_quantity(product_id, quantity)? {
                ctx.output.success(&format!("Updated product {}", product_id));
            } else {
                ctx.output
                    .warn(&format!("Product {} is not in the cart", product_id));
            }
        }
        CartCommand::Clear { yes } => {
            if cart.is_empty() {
                ctx.output.info("Cart is already empty");
            } else {
                let confirmed = yes
                    || Confirm::new()
                        .with_prompt(format!("Remove all {} items from the cart?", cart.item_count()))
                        .default(false)
                        .interact()?;
                if !confirmed {
                    ctx.output.info("Cancelled");
                    return store.close().await;
                }
                cart.clear_cart();
                ctx.output.success("Cart cleared");
            }
        }
        CartCommand::Coupon(coupon) => {
            let coupon = build_coupon(coupon)?;
            let code = coupon.code.clone();
            cart.apply_coupon(coupon, Utc::now().timestamp())?;
            ctx.output.success(&format!("Coupon {} applied", code));
        }
        CartCommand::Uncoupon => {
            if cart.remove_coupon() {
                ctx.output.success("Coupon removed");
            } else {
                ctx.output.warn("No coupon applied");
            }
        }
    }

    show(ctx, &cart);
    store.close().await
}

fn build_coupon(args: CouponArgs) -> Result<Coupon> {
    let coupon = match (args.percent, args.amount) {
        (Some(percent), None) => {
            if !(0.0..=100.0).contains(&percent) {
                bail!("Percentage must be between 0 and 100, got {}", percent);
            }
            Coupon::percentage(args.code, Rate::from_percent(percent))
        }
        (None, Some(amount)) => {
            if amount.is_negative() {
                bail!("Coupon amount must not be negative");
            }
            Coupon::fixed_amount(args.code, amount)
        }
        _ => bail!("Give exactly one of --percent or --amount"),
    };
    Ok(match args.expires {
        Some(expires) => coupon.expires_at(expires.timestamp()),
        None => coupon,
    })
}

fn show(ctx: &Context, cart: &CartEngine) {
    let pricing = ctx.pricing();
    let breakdown = cart.quote(&pricing, Utc::now().timestamp());

    if ctx.output.is_json() {
        ctx.output.json(&CartView {
            items: cart.items(),
            coupon: cart.snapshot().coupon.as_ref(),
            item_count: cart.item_count(),
            unique_item_count: cart.unique_item_count(),
            breakdown,
            amount_to_free_shipping: pricing.amount_to_free_shipping(breakdown.subtotal),
        });
        return;
    }

    ctx.output.header(&format!("Cart ({} items)", cart.item_count()));
    if cart.is_empty() {
        ctx.output.info("Your cart is empty");
        return;
    }

    let widths = [5, 36, 5, 10, 10];
    ctx.output
        .table_row(&["ID", "TITLE", "QTY", "PRICE", "TOTAL"], &widths);
    for item in cart.items() {
        ctx.output.table_row(
            &[
                &item.product_id.to_string(),
                &truncate(&item.product.title, 36),
                &item.quantity.to_string(),
                &price_cell(item.unit_price()),
                &price_cell(item.line_total()),
            ],
            &widths,
        );
    }
    if let Some(coupon) = &cart.snapshot().coupon {
        ctx.output.kv("Coupon", &coupon.code);
    }

    println!();
    ctx.output.breakdown(&breakdown);
    let remaining = pricing.amount_to_free_shipping(breakdown.subtotal);
    if !remaining.is_zero() {
        ctx.output
            .info(&format!("Add {} more for free shipping", remaining));
    }
}
