//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use storefront_cache::{BackgroundWriter, Cache};
use storefront_commerce::cart::{CartEngine, PricingEngine};
use storefront_commerce::search::CatalogFilterEngine;
use storefront_data::{CatalogLoader, JsonFileCatalog};

use crate::config::StorefrontConfig;
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: StorefrontConfig,
    /// Output handler.
    pub output: Output,
    /// Directory relative paths in the config resolve against.
    pub base_dir: PathBuf,
}

impl Context {
    /// Load context from an explicit config file, or the nearest one found
    /// from the working directory upwards.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let found = match config_path {
            Some(path) => Some(resolve(&cwd, Path::new(path))),
            None => StorefrontConfig::find(&cwd),
        };

        let (config, base_dir) = match found {
            Some(path) => {
                tracing::debug!(path = %path.display(), "using config file");
                let config = StorefrontConfig::load(&path)?;
                let base = path.parent().map(Path::to_path_buf).unwrap_or(cwd);
                (config, base)
            }
            None => (StorefrontConfig::default(), cwd),
        };

        Ok(Self {
            config,
            output,
            base_dir,
        })
    }

    /// State directory.
    pub fn storage_dir(&self) -> PathBuf {
        resolve(&self.base_dir, &self.config.storage.dir)
    }

    /// Catalog file.
    pub fn catalog_path(&self) -> PathBuf {
        resolve(&self.base_dir, &self.config.catalog.path)
    }

    /// Order log written by checkout.
    pub fn orders_path(&self) -> PathBuf {
        self.storage_dir().join("orders.jsonl")
    }

    pub fn pricing(&self) -> PricingEngine {
        PricingEngine::new(self.config.pricing.rules())
    }

    /// Catalog loader over the configured file.
    pub fn loader(&self) -> CatalogLoader<JsonFileCatalog> {
        CatalogLoader::new(
            Arc::new(JsonFileCatalog::new(self.catalog_path())),
            self.config.fetch_policy(),
        )
    }

    /// Open persisted engine state.
    pub fn open_store(&self) -> Result<Store> {
        Store::open(&self.storage_dir())
    }
}

/// Persisted engine state, written in the background.
pub struct Store {
    cache: Cache,
    writer: BackgroundWriter,
}

impl Store {
    /// Open the store at `dir`. Must be called inside a Tokio runtime.
    pub fn open(dir: &Path) -> Result<Self> {
        let cache = Cache::open(dir)
            .with_context(|| format!("Failed to open state directory: {}", dir.display()))?;
        let (writer, _task) = BackgroundWriter::spawn(cache.clone());
        Ok(Self { cache, writer })
    }

    /// The persisted cart.
    pub fn cart(&self) -> CartEngine {
        CartEngine::restore(&self.cache, Arc::new(self.writer.clone()))
    }

    /// The persisted listing criteria.
    pub fn filters(&self) -> CatalogFilterEngine {
        CatalogFilterEngine::restore(&self.cache, Arc::new(self.writer.clone()))
    }

    /// Wait for every pending snapshot to reach disk.
    pub async fn close(self) -> Result<()> {
        self.writer
            .flush()
            .await
            .context("Failed to save storefront state")
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_commerce::catalog::Product;
    use storefront_commerce::search::SortBy;
    use storefront_commerce::Money;

    #[tokio::test]
    async fn test_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();

        let store = Store::open(dir.path()).unwrap();
        let mut cart = store.cart();
        let mut filters = store.filters();
        cart.add_item(&Product::new(3u64, "Jacket", Money::new(5599), "men's clothing"), 2)
            .unwrap();
        filters.set_sort_by(SortBy::Rating);
        store.close().await.unwrap();

        let store = Store::open(dir.path()).unwrap();
        assert_eq!(store.cart().item_count(), 2);
        assert_eq!(store.filters().state().sort_by, SortBy::Rating);
    }

    #[test]
    fn test_paths_resolve_against_config_dir() {
        let ctx = Context {
            config: StorefrontConfig::default(),
            output: Output::new(false, false),
            base_dir: PathBuf::from("/srv/shop"),
        };
        assert_eq!(ctx.catalog_path(), PathBuf::from("/srv/shop/catalog.json"));
        assert_eq!(
            ctx.orders_path(),
            PathBuf::from("/srv/shop/.storefront/orders.jsonl")
        );
    }
}
