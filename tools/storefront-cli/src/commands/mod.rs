//! CLI command implementations.

pub mod cart;
pub mod categories;
pub mod checkout;
pub mod config;
pub mod filters;
pub mod orders;
pub mod products;

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use storefront_commerce::search::{CatalogFilterEngine, SortBy, ViewMode};
use storefront_commerce::{Money, ProductId, UserId};
use storefront_data::CatalogSnapshot;

use crate::context::Context;

/// Listing criteria shared by `products` and `filters set`.
#[derive(Args, Debug, Default)]
pub struct CriteriaArgs {
    /// Case-insensitive title search.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Category to show (repeatable). Replaces the current selection.
    #[arg(short, long = "category")]
    pub categories: Vec<String>,

    /// Show every category again.
    #[arg(long, conflicts_with = "categories")]
    pub all_categories: bool,

    /// Lowest price to show, e.g. 10.00.
    #[arg(long, visible_alias = "min")]
    pub min_price: Option<Money>,

    /// Highest price to show, e.g. 99.99.
    #[arg(long, visible_alias = "max")]
    pub max_price: Option<Money>,

    /// Sort order: none, price_asc, price_desc, rating or title.
    #[arg(long)]
    pub sort: Option<SortBy>,

    /// Listing layout: grid or list.
    #[arg(long)]
    pub view: Option<ViewMode>,
}

impl CriteriaArgs {
    /// Apply every given criterion to `engine`.
    ///
    /// A lone price bound keeps the other bound from the current range.
    pub fn apply(&self, engine: &mut CatalogFilterEngine) -> Result<()> {
        if let Some(query) = &self.search {
            engine.set_search_query(query.as_str());
        }
        if self.all_categories {
            engine.set_selected_categories(Vec::<String>::new());
        } else if !self.categories.is_empty() {
            engine.set_selected_categories(self.categories.iter().cloned());
        }
        if self.min_price.is_some() || self.max_price.is_some() {
            let current = engine.state().price_range;
            engine.set_price_range(
                self.min_price.unwrap_or(current.min),
                self.max_price.unwrap_or(current.max),
            )?;
        }
        if let Some(sort) = self.sort {
            engine.set_sort_by(sort);
        }
        if let Some(view) = self.view {
            engine.set_view_mode(view);
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.categories.is_empty()
            && !self.all_categories
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.sort.is_none()
            && self.view.is_none()
    }
}

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    #[command(flatten)]
    pub criteria: CriteriaArgs,

    /// Keep the given criteria for later runs.
    #[arg(long)]
    pub save: bool,

    /// Maximum number of products to load (default from config).
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the filters command.
#[derive(Args)]
pub struct FiltersArgs {
    #[command(subcommand)]
    pub command: Option<FiltersCommand>,
}

#[derive(Subcommand)]
pub enum FiltersCommand {
    /// Show the saved criteria.
    Show,
    /// Change saved criteria.
    Set(CriteriaArgs),
    /// Add a category to the selection, or remove it if selected.
    Toggle {
        /// Category label.
        category: String,
    },
    /// Reset every criterion except the view mode.
    Clear,
}

/// Arguments for the categories command.
#[derive(Args)]
pub struct CategoriesArgs {
    /// Maximum number of products to load (default from config).
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart with totals.
    Show,
    /// Add a product to the cart.
    Add {
        /// Product id.
        product_id: ProductId,
        /// Units to add.
        #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product's line.
    Remove {
        /// Product id.
        product_id: ProductId,
    },
    /// Set a line's quantity; zero or less removes it.
    Update {
        /// Product id.
        product_id: ProductId,
        /// New quantity.
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart.
    Clear {
        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Apply a coupon.
    Coupon(CouponArgs),
    /// Remove the applied coupon.
    Uncoupon,
}

/// Arguments for `cart coupon`.
#[derive(Args)]
pub struct CouponArgs {
    /// Coupon code.
    pub code: String,

    /// Percentage off the subtotal.
    #[arg(long, conflicts_with = "amount", required_unless_present = "amount")]
    pub percent: Option<f64>,

    /// Fixed amount off the subtotal, e.g. 5.00.
    #[arg(long)]
    pub amount: Option<Money>,

    /// Expiry time (RFC 3339).
    #[arg(long)]
    pub expires: Option<DateTime<Utc>>,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Id of the user placing the order.
    #[arg(short, long)]
    pub user: Option<UserId>,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    /// Show only the last N orders.
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration.
    Show,
    /// Write a default storefront.toml in the current directory.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}

/// Load the catalog, showing a spinner while it is fetched.
pub async fn load_catalog(ctx: &Context, limit: Option<usize>) -> Result<CatalogSnapshot> {
    let loader = ctx.loader();
    let limit = limit.or(ctx.config.catalog.limit);

    let spinner = ctx.output.spinner("Loading products...");
    let result = loader.load(limit).await;
    spinner.finish_and_clear();

    result.with_context(|| {
        format!(
            "Could not load products from {}",
            ctx.catalog_path().display()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criteria_apply() {
        let mut engine = CatalogFilterEngine::new();
        engine.set_price_range(Money::new(500), Money::new(9000)).unwrap();

        let args = CriteriaArgs {
            search: Some("ring".into()),
            categories: vec!["jewelery".into(), "jewelery".into()],
            max_price: Some(Money::new(2000)),
            sort: Some(SortBy::PriceAsc),
            ..CriteriaArgs::default()
        };
        args.apply(&mut engine).unwrap();

        let state = engine.state();
        assert_eq!(state.search_query, "ring");
        assert_eq!(state.selected_categories, vec!["jewelery"]);
        assert_eq!(state.price_range.min, Money::new(500));
        assert_eq!(state.price_range.max, Money::new(2000));
        assert_eq!(state.sort_by, SortBy::PriceAsc);
    }

    #[test]
    fn test_criteria_bad_range_is_error() {
        let mut engine = CatalogFilterEngine::new();
        let args = CriteriaArgs {
            min_price: Some(Money::new(5000)),
            max_price: Some(Money::new(100)),
            ..CriteriaArgs::default()
        };
        assert!(args.apply(&mut engine).is_err());
        assert!(CriteriaArgs::default().is_empty());
    }
}
