//! CLI configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use storefront_commerce::cart::PricingRules;
use storefront_commerce::{Money, Rate};
use storefront_data::{BackoffStrategy, FetchPolicy, RetryPolicy};

/// Config file names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["storefront.toml", ".storefront.toml", "storefront.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Pricing rules.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Where engine state is stored.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Catalog source.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Retry behaviour for catalog calls.
    #[serde(default)]
    pub retry: RetryConfig,
}

impl StorefrontConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if path.extension().is_some_and(|e| e == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Find the nearest config file at or above `start`.
    pub fn find(start: &Path) -> Option<PathBuf> {
        start.ancestors().find_map(|dir| {
            CONFIG_NAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|candidate| candidate.is_file())
        })
    }

    /// Reject values no store could use.
    pub fn validate(&self) -> Result<()> {
        let p = &self.pricing;
        for (name, value) in [
            ("pricing.tax_rate", p.tax_rate),
            ("pricing.free_shipping_threshold", p.free_shipping_threshold),
            ("pricing.flat_shipping_fee", p.flat_shipping_fee),
        ] {
            if !value.is_finite() || value < 0.0 {
                bail!("{} must be a non-negative number, got {}", name, value);
            }
        }
        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            bail!(
                "retry.base_delay_ms ({}) exceeds retry.max_delay_ms ({})",
                self.retry.base_delay_ms,
                self.retry.max_delay_ms
            );
        }
        Ok(())
    }
}

/// Pricing configuration, in decimal store currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Tax rate as a fraction (0.08 = 8 %).
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,

    /// Subtotal at or above which shipping is free.
    #[serde(default = "default_free_shipping_threshold")]
    pub free_shipping_threshold: f64,

    /// Shipping fee below the threshold.
    #[serde(default = "default_flat_shipping_fee")]
    pub flat_shipping_fee: f64,
}

fn default_tax_rate() -> f64 {
    0.08
}

fn default_free_shipping_threshold() -> f64 {
    50.0
}

fn default_flat_shipping_fee() -> f64 {
    9.99
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: default_tax_rate(),
            free_shipping_threshold: default_free_shipping_threshold(),
            flat_shipping_fee: default_flat_shipping_fee(),
        }
    }
}

impl PricingConfig {
    pub fn rules(&self) -> PricingRules {
        PricingRules {
            tax_rate: Rate::from_fraction(self.tax_rate),
            free_shipping_threshold: Money::from_decimal(self.free_shipping_threshold),
            flat_shipping_fee: Money::from_decimal(self.flat_shipping_fee),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// State directory, relative to the config file.
    #[serde(default = "default_storage_dir")]
    pub dir: PathBuf,
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".storefront")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
        }
    }
}

/// Catalog configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON catalog file, relative to the config file.
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,

    /// Maximum number of products to load.
    #[serde(default = "default_limit")]
    pub limit: Option<usize>,

    /// Per-attempt timeout.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("catalog.json")
}

fn default_limit() -> Option<usize> {
    Some(20)
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            limit: default_limit(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first failed attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_max_retries() -> u32 {
    2
}

fn default_base_delay_ms() -> u64 {
    200
}

fn default_max_delay_ms() -> u64 {
    2000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl StorefrontConfig {
    /// Fetch policy for catalog calls.
    pub fn fetch_policy(&self) -> FetchPolicy {
        let retry = RetryPolicy::new(self.retry.max_retries).with_backoff(
            BackoffStrategy::Exponential {
                base: Duration::from_millis(self.retry.base_delay_ms),
                max: Duration::from_millis(self.retry.max_delay_ms),
            },
        );
        FetchPolicy::new(Duration::from_millis(self.catalog.timeout_ms), retry)
    }
}

/// Generate a default storefront.toml config file.
pub fn generate_default_config() -> String {
    r#"# Storefront client configuration

[pricing]
tax_rate = 0.08
free_shipping_threshold = 50.0
flat_shipping_fee = 9.99

[storage]
dir = ".storefront"

[catalog]
path = "catalog.json"
limit = 20

[retry]
max_retries = 2
base_delay_ms = 200
max_delay_ms = 2000
"#
    .to_string()
}
