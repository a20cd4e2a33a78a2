//! Sort and view options for the product listing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sort options for the visible product list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Keep catalog order.
    #[default]
    None,
    /// Sort by price, low to high.
    PriceAsc,
    /// Sort by price, high to low.
    PriceDesc,
    /// Sort by highest rated.
    Rating,
    /// Sort by title A-Z, ignoring case.
    Title,
}

impl SortBy {
    /// All options, in menu order.
    pub const ALL: [SortBy; 5] = [
        SortBy::None,
        SortBy::PriceAsc,
        SortBy::PriceDesc,
        SortBy::Rating,
        SortBy::Title,
    ];

    /// Wire name, as stored and accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::None => "none",
            SortBy::PriceAsc => "price_asc",
            SortBy::PriceDesc => "price_desc",
            SortBy::Rating => "rating",
            SortBy::Title => "title",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortBy::None => "Featured",
            SortBy::PriceAsc => "Price: Low to High",
            SortBy::PriceDesc => "Price: High to Low",
            SortBy::Rating => "Highest Rated",
            SortBy::Title => "Name: A-Z",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        SortBy::ALL
            .into_iter()
            .find(|option| option.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown sort '{}', expected one of: none, price_asc, price_desc, rating, title",
                    s
                )
            })
    }
}

/// How the listing is laid out. Display preference only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(ViewMode::Grid),
            "list" => Ok(ViewMode::List),
            other => Err(format!("unknown view mode '{}', expected grid or list", other)),
        }
    }
}
