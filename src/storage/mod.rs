use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

pub mod azure;

pub use azure::AzureBlobStore;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("blob {container}/{blob} not found")]
    NotFound { container: String, blob: String },
    #[error("storage operation {operation} timed out")]
    Timeout { operation: &'static str },
    #[error("storage operation failed: {0}")]
    Backend(String),
}

/// Bounds a storage operation so a hung transport cannot stall its caller;
/// expiry is classified as a failure of that operation.
pub(crate) async fn with_timeout<T, F>(
    limit: Duration,
    operation: &'static str,
    operation_future: F,
) -> Result<T, StorageError>
where
    F: Future<Output = Result<T, StorageError>>,
{
    match tokio::time::timeout(limit, operation_future).await {
        Ok(result) => result,
        Err(_) => Err(StorageError::Timeout { operation }),
    }
}

/// One stored input image. `name` is the display name drawn from the blob's
/// `file_name` metadata and may be absent.
#[derive(Debug, Clone, Serialize)]
pub struct BlobSummary {
    pub id: String,
    pub name: Option<String>,
}

/// Blob persistence seam. The production implementation talks to Azure Blob
/// Storage; tests substitute an in-memory store.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Uploads a blob, overwriting any existing blob under the same key.
    async fn put(
        &self,
        container: &str,
        blob: &str,
        data: Vec<u8>,
        metadata: Option<HashMap<String, String>>,
    ) -> Result<(), StorageError>;

    async fn get(&self, container: &str, blob: &str) -> Result<Vec<u8>, StorageError>;

    async fn exists(&self, container: &str, blob: &str) -> Result<bool, StorageError>;

    /// Produces a time-limited read-only signed URL for an existing blob.
    async fn signed_read_url(
        &self,
        container: &str,
        blob: &str,
        ttl: Duration,
    ) -> Result<String, StorageError>;

    async fn list_with_metadata(&self, container: &str)
        -> Result<Vec<BlobSummary>, StorageError>;
}
