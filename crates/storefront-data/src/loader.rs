//! Catalog loading and hand-over.
//!
//! A load fetches products and categories concurrently, retrying transient
//! failures, and publishes the result as one immutable [`CatalogSnapshot`].
//! Readers hold a `watch` receiver and always see either the previous
//! snapshot or the new one, never a partial list.

use std::sync::Arc;
use std::time::Duration;

use storefront_commerce::catalog::Product;
use storefront_commerce::ProductId;
use tokio::sync::watch;

use crate::retry::RetryPolicy;
use crate::source::CatalogSource;
use crate::FetchError;

/// Timeout and retry settings for catalog calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Limit for a single attempt.
    pub timeout: Duration,
    /// Retry policy.
    pub retry: RetryPolicy,
}

impl FetchPolicy {
    pub fn new(timeout: Duration, retry: RetryPolicy) -> Self {
        Self { timeout, retry }
    }
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }
}

/// One completed catalog fetch.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    /// Products in catalog order.
    pub products: Arc<Vec<Product>>,
    /// Category labels in catalog order.
    pub categories: Arc<Vec<String>>,
    /// Number of loads published before this one; 0 means nothing loaded yet.
    pub generation: u64,
}

impl CatalogSnapshot {
    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

/// Progress of the most recent load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    /// Last load failed; the message is shown to the user.
    Failed(String),
}

/// Fetches the catalog from a [`CatalogSource`] and publishes snapshots.
pub struct CatalogLoader<S> {
    source: Arc<S>,
    policy: FetchPolicy,
    catalog: watch::Sender<CatalogSnapshot>,
    state: watch::Sender<LoadState>,
}

impl<S: CatalogSource> CatalogLoader<S> {
    pub fn new(source: Arc<S>, policy: FetchPolicy) -> Self {
        let (catalog, _) = watch::channel(CatalogSnapshot::default());
        let (state, _) = watch::channel(LoadState::Idle);
        Self {
            source,
            policy,
            catalog,
            state,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Receiver for published catalog snapshots.
    pub fn subscribe(&self) -> watch::Receiver<CatalogSnapshot> {
        self.catalog.subscribe()
    }

    /// Receiver for load state changes.
    pub fn subscribe_state(&self) -> watch::Receiver<LoadState> {
        self.state.subscribe()
    }

    /// Latest published snapshot.
    pub fn current(&self) -> CatalogSnapshot {
        self.catalog.borrow().clone()
    }

    pub fn load_state(&self) -> LoadState {
        self.state.borrow().clone()
    }

    /// Fetch products (at most `limit`) and categories, then publish them together.
    ///
    /// On failure the previous snapshot stays published and the state moves
    /// to [`LoadState::Failed`].
    pub async fn load(&self, limit: Option<usize>) -> Result<CatalogSnapshot, FetchError> {
        self.state.send_replace(LoadState::Loading);

        let products = self.call("list_products", || self.source.list_products(limit));
        let categories = self.call("list_categories", || self.source.list_categories());

        match futures::try_join!(products, categories) {
            Ok((products, categories)) => {
                let generation = self.catalog.borrow().generation + 1;
                let snapshot = CatalogSnapshot {
                    products: Arc::new(products),
                    categories: Arc::new(categories),
                    generation,
                };
                self.catalog.send_replace(snapshot.clone());
                self.state.send_replace(LoadState::Ready);
                tracing::info!(
                    products = snapshot.products.len(),
                    categories = snapshot.categories.len(),
                    generation,
                    "catalog loaded"
                );
                Ok(snapshot)
            }
            Err(e) => {
                tracing::warn!(error = %e, "catalog load failed");
                self.state
                    .send_replace(LoadState::Failed(format!("Could not load products: {}", e)));
                Err(e)
            }
        }
    }

    /// Look a product up in the current snapshot, falling back to the source.
    pub async fn get_product(&self, id: ProductId) -> Result<Product, FetchError> {
        let cached = self.catalog.borrow().find(id).cloned();
        if let Some(product) = cached {
            return Ok(product);
        }
        self.call("get_product", || self.source.get_product(id)).await
    }

    async fn call<'a, T, F, Fut>(&'a self, what: &'a str, mut op: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, FetchError>> + 'a,
    {
        let limit = self.policy.timeout;
        self.policy
            .retry
            .run(what, || {
                let attempt = op();
                async move {
                    match tokio::time::timeout(limit, attempt).await {
                        Ok(result) => result,
                        Err(_) => Err(FetchError::Timeout(limit)),
                    }
                }
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::BackoffStrategy;
    use crate::source::StaticCatalog;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use storefront_commerce::Money;

    fn products() -> Vec<Product> {
        vec![
            Product::new(1u64, "Backpack", Money::new(10995), "men's clothing"),
            Product::new(2u64, "Ring", Money::new(1099), "jewelery"),
        ]
    }

    fn fast_policy() -> FetchPolicy {
        FetchPolicy::new(
            Duration::from_secs(5),
            RetryPolicy::new(2).with_backoff(BackoffStrategy::Fixed(Duration::from_millis(1))),
        )
    }

    /// Fails the next `failures` product listings with a network error.
    struct FlakySource {
        inner: StaticCatalog,
        failures: AtomicU32,
        calls: AtomicU32,
    }

    impl FlakySource {
        fn new(failures: u32) -> Self {
            Self {
                inner: StaticCatalog::new(products()),
                failures: AtomicU32::new(failures),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl CatalogSource for FlakySource {
        async fn list_products(&self, limit: Option<usize>) -> Result<Vec<Product>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures.store(remaining - 1, Ordering::SeqCst);
                return Err(FetchError::Network("connection refused".into()));
            }
            self.inner.list_products(limit).await
        }

        async fn get_product(&self, id: ProductId) -> Result<Product, FetchError> {
            self.inner.get_product(id).await
        }

        async fn list_categories(&self) -> Result<Vec<String>, FetchError> {
            self.inner.list_categories().await
        }
    }

    #[tokio::test]
    async fn test_load_publishes_snapshot() {
        let loader = CatalogLoader::new(Arc::new(StaticCatalog::new(products())), fast_policy());
        let mut rx = loader.subscribe();
        assert_eq!(loader.load_state(), LoadState::Idle);

        loader.load(None).await.unwrap();

        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.generation, 1);
        assert_eq!(snapshot.products.len(), 2);
        assert_eq!(snapshot.categories.len(), 2);
        assert_eq!(loader.load_state(), LoadState::Ready);
    }

    #[tokio::test]
    async fn test_recovers_within_two_retries() {
        let loader = CatalogLoader::new(Arc::new(FlakySource::new(2)), fast_policy());

        let snapshot = loader.load(Some(1)).await.unwrap();
        assert_eq!(snapshot.products.len(), 1);
        assert_eq!(loader.source().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_two_retries() {
        let loader = CatalogLoader::new(Arc::new(FlakySource::new(10)), fast_policy());

        let err = loader.load(None).await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
        assert_eq!(loader.source().calls.load(Ordering::SeqCst), 3);
        assert!(matches!(loader.load_state(), LoadState::Failed(msg) if msg.contains("connection refused")));
        assert_eq!(loader.current().generation, 0);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_snapshot() {
        let loader = CatalogLoader::new(Arc::new(FlakySource::new(0)), fast_policy());
        loader.load(None).await.unwrap();

        loader.source().failures.store(10, Ordering::SeqCst);
        assert!(loader.load(None).await.is_err());
        assert!(matches!(loader.load_state(), LoadState::Failed(_)));

        assert_eq!(loader.current().generation, 1);
        assert_eq!(loader.current().products.len(), 2);
    }

    #[tokio::test]
    async fn test_get_product_prefers_snapshot() {
        let loader = CatalogLoader::new(Arc::new(StaticCatalog::new(products())), fast_policy());
        assert_eq!(loader.get_product(ProductId::new(2)).await.unwrap().title, "Ring");

        loader.load(None).await.unwrap();
        assert_eq!(loader.get_product(ProductId::new(1)).await.unwrap().title, "Backpack");
        assert_eq!(
            loader.get_product(ProductId::new(42)).await,
            Err(FetchError::NotFound(ProductId::new(42)))
        );
    }
}
