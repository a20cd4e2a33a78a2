//! Product records.

use crate::ids::ProductId;
use crate::money::{self, Money};
use serde::{Deserialize, Serialize};

/// Customer rating aggregate.
///
/// Decoding rejects a `rate` outside 0..=5 instead of clamping it, so a bad
/// source record fails loudly rather than jumping to the top of a rating sort.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(try_from = "RatingRecord")]
pub struct Rating {
    /// Average score, 0 to 5.
    pub rate: f64,
    /// Number of ratings.
    pub count: u64,
}

impl Rating {
    /// Create a rating, clamping `rate` into 0..=5.
    pub fn new(rate: f64, count: u64) -> Self {
        let rate = if rate.is_finite() { rate.clamp(0.0, 5.0) } else { 0.0 };
        Self { rate, count }
    }
}

/// Wire form of [`Rating`], checked before it becomes one.
#[derive(Deserialize)]
struct RatingRecord {
    rate: f64,
    count: u64,
}

impl TryFrom<RatingRecord> for Rating {
    type Error = String;

    fn try_from(record: RatingRecord) -> Result<Self, Self::Error> {
        if !(0.0..=5.0).contains(&record.rate) {
            return Err(format!("rating rate must be within 0..=5, got {}", record.rate));
        }
        Ok(Self {
            rate: record.rate,
            count: record.count,
        })
    }
}

/// A product in the catalog.
///
/// Immutable once fetched. Field names follow the catalog wire format, so a
/// record from the source deserializes directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Stable catalog identity, always positive.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price.
    #[serde(with = "money::decimal")]
    pub price: Money,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Category label.
    pub category: String,
    /// Image URI.
    #[serde(default)]
    pub image: String,
    /// Customer rating, when the source has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl Product {
    /// Create a product with no description, image or rating.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        price: Money,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            description: String::new(),
            category: category.into(),
            image: String::new(),
            rating: None,
        }
    }

    /// Set the rating.
    pub fn with_rating(mut self, rate: f64, count: u64) -> Self {
        self.rating = Some(Rating::new(rate, count));
        self
    }

    /// Set the image URI.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Rating score used for ordering; unrated products count as 0.
    pub fn rating_score(&self) -> f64 {
        self.rating.map(|r| r.rate).unwrap_or(0.0)
    }
}
