//! Filter state and the visible-list derivation.

use std::cmp::Ordering;

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::money::Money;
use crate::persist::Restorable;
use crate::search::{SortBy, ViewMode};
use serde::{Deserialize, Serialize};

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Money,
    pub max: Money,
}

impl PriceRange {
    /// Upper bound of the default range; no catalog price exceeds it.
    pub const UNBOUNDED_MAX: Money = Money::new(i64::MAX);

    /// Create a range, rejecting `min > max`.
    pub fn new(min: Money, max: Money) -> Result<Self, CommerceError> {
        if min > max {
            return Err(CommerceError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Whether `price` lies within the bounds, both ends included.
    pub fn contains(&self, price: Money) -> bool {
        self.min <= price && price <= self.max
    }

    /// Whether the upper bound is the open-ended default.
    pub fn has_upper_bound(&self) -> bool {
        self.max != Self::UNBOUNDED_MAX
    }
}

impl Default for PriceRange {
    /// Every non-negative price, so a cleared filter hides nothing.
    fn default() -> Self {
        Self {
            min: Money::zero(),
            max: Self::UNBOUNDED_MAX,
        }
    }
}

/// User-controlled listing criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FilterState {
    /// Case-insensitive title substring, matched as typed (whitespace
    /// included); empty matches everything.
    pub search_query: String,
    /// Categories to show; empty shows all. No duplicates, in selection order.
    pub selected_categories: Vec<String>,
    pub price_range: PriceRange,
    pub sort_by: SortBy,
    pub view_mode: ViewMode,
}

impl FilterState {
    /// Whether `product` passes the search, category and price criteria.
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_query(product)
            && self.matches_category(product)
            && self.price_range.contains(product.price)
    }

    /// Filter then sort `products`. Equal keys keep their catalog order.
    pub fn derive_visible(&self, products: &[Product]) -> Vec<Product> {
        let mut visible: Vec<Product> = products
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect();

        if self.sort_by != SortBy::None {
            visible.sort_by(|a, b| compare(self.sort_by, a, b));
        }
        visible
    }

    /// Whether any criterion narrows or reorders the catalog.
    pub fn is_active(&self) -> bool {
        let defaults = FilterState::default();
        !self.search_query.is_empty()
            || !self.selected_categories.is_empty()
            || self.price_range != defaults.price_range
            || self.sort_by != defaults.sort_by
    }

    fn matches_query(&self, product: &Product) -> bool {
        self.search_query.is_empty()
            || product
                .title
                .to_lowercase()
                .contains(&self.search_query.to_lowercase())
    }

    fn matches_category(&self, product: &Product) -> bool {
        self.selected_categories.is_empty()
            || self.selected_categories.iter().any(|c| *c == product.category)
    }
}

impl Restorable for FilterState {
    /// A decoded range skips [`PriceRange::new`], so recheck its bounds.
    fn validate(&self) -> Result<(), CommerceError> {
        let range = self.price_range;
        if range.min.is_negative() {
            return Err(CommerceError::InvalidState(format!(
                "price range starts below zero at {}",
                range.min
            )));
        }
        PriceRange::new(range.min, range.max).map(|_| ())
    }
}

/// Ordering for `sort_by`; `SortBy::None` treats everything as equal.
fn compare(sort_by: SortBy, a: &Product, b: &Product) -> Ordering {
    match sort_by {
        SortBy::None => Ordering::Equal,
        SortBy::PriceAsc => a.price.cmp(&b.price),
        SortBy::PriceDesc => b.price.cmp(&a.price),
        SortBy::Rating => b.rating_score().total_cmp(&a.rating_score()),
        SortBy::Title => title_sort_key(&a.title)
            .cmp(&title_sort_key(&b.title))
            .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
            .then_with(|| a.title.cmp(&b.title)),
    }
}

/// Lowercased title with Latin diacritics folded to their base letters,
/// so "Éclair" files under "e" rather than after "z".
fn title_sort_key(title: &str) -> String {
    let mut key = String::with_capacity(title.len());
    for c in title.chars().flat_map(char::to_lowercase) {
        match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => key.push('a'),
            'æ' => key.push_str("ae"),
            'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => key.push('c'),
            'ď' | 'đ' | 'ð' => key.push('d'),
            'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => key.push('e'),
            'ĝ' | 'ğ' | 'ġ' | 'ģ' => key.push('g'),
            'ĥ' | 'ħ' => key.push('h'),
            'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => key.push('i'),
            'ĵ' => key.push('j'),
            'ķ' => key.push('k'),
            'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => key.push('l'),
            'ñ' | 'ń' | 'ņ' | 'ň' => key.push('n'),
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => key.push('o'),
            'œ' => key.push_str("oe"),
            'ŕ' | 'ŗ' | 'ř' => key.push('r'),
            'ś' | 'ŝ' | 'ş' | 'š' => key.push('s'),
            'ß' => key.push_str("ss"),
            'ţ' | 'ť' | 'ŧ' => key.push('t'),
            'þ' => key.push_str("th"),
            'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => key.push('u'),
            'ŵ' => key.push('w'),
            'ý' | 'ÿ' | 'ŷ' => key.push('y'),
            'ź' | 'ż' | 'ž' => key.push('z'),
            c => key.push(c),
        }
    }
    key
}
