//! Category labels derived from a product list.

use crate::catalog::Product;
use serde::{Deserialize, Serialize};

/// A category label and how many products carry it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategorySummary {
    /// Category label.
    pub name: String,
    /// Number of products in this category.
    pub product_count: usize,
}

/// Distinct categories in first-seen catalog order, with product counts.
pub fn categories_of(products: &[Product]) -> Vec<CategorySummary> {
    let mut summaries: Vec<CategorySummary> = Vec::new();
    for product in products {
        match summaries.iter_mut().find(|s| s.name == product.category) {
            Some(summary) => summary.product_count += 1,
            None => summaries.push(CategorySummary {
                name: product.category.clone(),
                product_count: 1,
            }),
        }
    }
    summaries
}
