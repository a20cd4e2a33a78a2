//! Order gateway backed by a local JSON-lines log.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use storefront_commerce::checkout::{CheckoutRequest, OrderGateway};
use storefront_commerce::{CommerceError, OrderId};
use tokio::io::AsyncWriteExt;

/// One accepted order as written to the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: OrderId,
    pub request: CheckoutRequest,
}

/// Appends each accepted order to a file, one JSON object per line.
#[derive(Debug, Clone)]
pub struct FileOrderGateway {
    path: PathBuf,
}

impl FileOrderGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every order in the log, oldest first.
    pub async fn orders(&self) -> Result<Vec<OrderRecord>, CommerceError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CommerceError::Network(e.to_string())),
        };
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(CommerceError::from))
            .collect()
    }
}

#[async_trait]
impl OrderGateway for FileOrderGateway {
    async fn submit_order(&self, request: &CheckoutRequest) -> Result<OrderId, CommerceError> {
        let record = OrderRecord {
            order_id: OrderId::generate(),
            request: request.clone(),
        };
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CommerceError::Network(e.to_string()))?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| CommerceError::Network(e.to_string()))?;
        file.write_all(&line)
            .await
            .map_err(|e| CommerceError::Network(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| CommerceError::Network(e.to_string()))?;

        tracing::info!(order_id = %record.order_id, path = %self.path.display(), "order recorded");
        Ok(record.order_id)
    }
}
