//! Catalog sources.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use storefront_commerce::catalog::Product;
use storefront_commerce::ProductId;

use crate::FetchError;

/// Read-only supplier of catalog records.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Products in catalog order, at most `limit` of them.
    async fn list_products(&self, limit: Option<usize>) -> Result<Vec<Product>, FetchError>;

    /// One product by id.
    async fn get_product(&self, id: ProductId) -> Result<Product, FetchError>;

    /// Category labels in catalog order.
    async fn list_categories(&self) -> Result<Vec<String>, FetchError>;
}

/// Distinct category labels in first-seen order.
fn category_labels(products: &[Product]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for product in products {
        if !labels.contains(&product.category) {
            labels.push(product.category.clone());
        }
    }
    labels
}

fn take_limit(mut products: Vec<Product>, limit: Option<usize>) -> Vec<Product> {
    if let Some(limit) = limit {
        products.truncate(limit);
    }
    products
}

/// A fixed in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<Product>,
}

impl StaticCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn list_products(&self, limit: Option<usize>) -> Result<Vec<Product>, FetchError> {
        Ok(take_limit(self.products.clone(), limit))
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, FetchError> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(FetchError::NotFound(id))
    }

    async fn list_categories(&self) -> Result<Vec<String>, FetchError> {
        Ok(category_labels(&self.products))
    }
}

/// A catalog stored as a JSON array of product records.
///
/// The file is re-read on every call, so edits show up on the next load.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<Product>, FetchError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            FetchError::Network(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        let products: Vec<Product> = serde_json::from_slice(&bytes)?;
        tracing::trace!(path = %self.path.display(), count = products.len(), "catalog file read");
        Ok(products)
    }
}

#[async_trait]
impl CatalogSource for JsonFileCatalog {
    async fn list_products(&self, limit: Option<usize>) -> Result<Vec<Product>, FetchError> {
        Ok(take_limit(self.read_all().await?, limit))
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, FetchError> {
        self.read_all()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or(FetchError::NotFound(id))
    }

    async fn list_categories(&self) -> Result<Vec<String>, FetchError> {
        Ok(category_labels(&self.read_all().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_commerce::Money;

    fn products() -> Vec<Product> {
        vec![
            Product::new(1u64, "Backpack", Money::new(10995), "men's clothing"),
            Product::new(2u64, "Ring", Money::new(1099), "jewelery"),
            Product::new(3u64, "Jacket", Money::new(5599), "men's clothing"),
        ]
    }

    #[tokio::test]
    async fn test_static_catalog() {
        let source = StaticCatalog::new(products());

        assert_eq!(source.list_products(Some(2)).await.unwrap().len(), 2);
        assert_eq!(source.list_products(None).await.unwrap().len(), 3);
        assert_eq!(
            source.list_categories().await.unwrap(),
            vec!["men's clothing", "jewelery"]
        );
        assert_eq!(
            source.get_product(ProductId::new(9)).await,
            Err(FetchError::NotFound(ProductId::new(9)))
        );
    }

    #[tokio::test]
    async fn test_json_file_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"[
                {"id": 1, "title": "Backpack", "price": 109.95, "category": "men's clothing",
                 "image": "", "rating": {"rate": 3.9, "count": 120}},
                {"id": 5, "title": "Ring", "price": 10.99, "category": "jewelery"}
            ]"#,
        )
        .unwrap();

        let source = JsonFileCatalog::new(&path);
        let product = source.get_product(ProductId::new(5)).await.unwrap();
        assert_eq!(product.price, Money::new(1099));
        assert_eq!(source.list_categories().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_json_file_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = JsonFileCatalog::new(dir.path().join("missing.json"));
        let err = missing.list_products(None).await.unwrap_err();
        assert!(err.is_transient());

        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = JsonFileCatalog::new(&path).list_products(None).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        assert!(!err.is_transient());
    }
}
