//! Inspect and change the saved listing criteria.

use anyhow::Result;
use storefront_commerce::search::{FilterState, PriceRange};

use super::{FiltersArgs, FiltersCommand};
use crate::context::Context;

/// Run the filters command.
pub async fn run(args: FiltersArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let mut filters = store.filters();

    match args.command.unwrap_or(FiltersCommand::Show) {
        FiltersCommand::Show => {}
        FiltersCommand::Set(criteria) => {
            if criteria.is_empty() {
                ctx.output.warn("No criteria given; nothing changed");
            } else {
                criteria.apply(&mut filters)?;
                ctx.output.success("Filters updated");
            }
        }
        FiltersCommand::Toggle { category } => {
            filters.toggle_category(&category);
            if filters.state().selected_categories.contains(&category) {
                ctx.output.success(&format!("Showing category '{}'", category));
            } else {
                ctx.output.success(&format!("Hiding category '{}'", category));
            }
        }
        FiltersCommand::Clear => {
            filters.clear_filters();
            ctx.output.success("Filters cleared");
        }
    }

    show(ctx, filters.state());
    store.close().await
}

fn show(ctx: &Context, state: &FilterState) {
    if ctx.output.is_json() {
        ctx.output.json(state);
        return;
    }

    ctx.output.header("Filters");
    let query = if state.search_query.is_empty() {
        "(none)".to_string()
    } else {
        format!("\"{}\"", state.search_query)
    };
    ctx.output.kv("Search", &query);
    let categories = if state.selected_categories.is_empty() {
        "all".to_string()
    } else {
        state.selected_categories.join(", ")
    };
    ctx.output.kv("Categories", &categories);
    ctx.output.kv("Price", &format_price_range(&state.price_range));
    ctx.output.kv("Sort", state.sort_by.display_name());
    ctx.output.kv("View", state.view_mode.as_str());
}

fn format_price_range(range: &PriceRange) -> String {
    if range.has_upper_bound() {
        format!("{} - {}", range.min, range.max)
    } else {
        format!("{} and up", range.min)
    }
}
