//! List products through the current criteria.

use anyhow::Result;
use console::style;
use serde::Serialize;
use storefront_commerce::catalog::Product;
use storefront_commerce::search::{FilterState, ViewMode};

use super::{load_catalog, ProductsArgs};
use crate::context::Context;
use crate::output::{format_rating, price_cell, truncate};

#[derive(Serialize)]
struct Listing<'a> {
    filters: &'a FilterState,
    total: usize,
    visible: &'a [Product],
}

/// Run the products command.
pub async fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let mut saved = store.filters();

    // Unsaved flags only apply to this listing.
    let mut preview;
    let filters = if args.save {
        &mut saved
    } else {
        preview = saved.preview();
        &mut preview
    };
    args.criteria.apply(filters)?;

    let catalog = load_catalog(ctx, args.limit).await?;
    let visible = filters.derive_visible(&catalog.products);

    if ctx.output.is_json() {
        ctx.output.json(&Listing {
            filters: filters.state(),
            total: catalog.products.len(),
            visible: &visible,
        });
    } else {
        render(ctx, filters.state(), &visible, catalog.products.len());
        if args.save && !args.criteria.is_empty() {
            ctx.output.success("Filters saved");
        }
    }

    store.close().await
}

fn render(ctx: &Context, state: &FilterState, visible: &[Product], total: usize) {
    let out = &ctx.output;
    out.header(&format!(
        "Products ({} of {}, {})",
        visible.len(),
        total,
        state.sort_by.display_name()
    ));

    if visible.is_empty() {
        out.info("No products match the current filters");
        if state.is_active() {
            out.info("Run `storefront filters clear` to show everything");
        }
        return;
    }

    match state.view_mode {
        ViewMode::Grid => {
            let widths = [5, 40, 10, 18, 16];
            out.table_row(&["ID", "TITLE", "PRICE", "CATEGORY", "RATING"], &widths);
            for product in visible {
                out.table_row(
                    &[
                        &product.id.to_string(),
                        &product.title,
                        &price_cell(product.price),
                        &product.category,
                        &format_rating(product.rating.as_ref()),
                    ],
                    &widths,
                );
            }
        }
        ViewMode::List => {
            for product in visible {
                println!(
                    "\n  {} {}  {}",
                    style(format!("#{}", product.id)).dim(),
                    style(&product.title).bold(),
                    style(product.price.display()).green()
                );
                out.kv("Category", &product.category);
                out.kv("Rating", &format_rating(product.rating.as_ref()));
                if !product.description.is_empty() {
                    out.kv("About", &truncate(&product.description, 100));
                }
            }
        }
    }
}
