//! List the categories present in the catalog.

use anyhow::Result;
use console::style;

use super::{load_catalog, CategoriesArgs};
use crate::context::Context;

/// Run the categories command.
pub async fn run(args: CategoriesArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let filters = store.filters();

    let catalog = load_catalog(ctx, args.limit).await?;
    let categories = filters.available_categories(&catalog.products);

    if ctx.output.is_json() {
        ctx.output.json(&categories);
        return store.close().await;
    }

    ctx.output.header("Categories");
    if categories.is_empty() {
        ctx.output.info("The catalog is empty");
    }
    let selected = &filters.state().selected_categories;
    for category in &categories {
        let marker = if selected.contains(&category.name) {
            style("[x]").green().to_string()
        } else {
            style("[ ]").dim().to_string()
        };
        ctx.output.list_item(&format!(
            "{} {} ({})",
            marker, category.name, category.product_count
        ));
    }

    store.close().await
}
