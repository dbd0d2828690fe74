use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use azure_core::request_options::Metadata;
use azure_core::StatusCode;
use azure_storage::shared_access_signature::service_sas::BlobSasPermissions;
use azure_storage::StorageCredentials;
use azure_storage_blobs::prelude::{BlobClient, BlobServiceClient, ContainerClient};
use futures::StreamExt;
use time::OffsetDateTime;
use tracing::debug;

use crate::config::Config;
use crate::storage::{with_timeout, BlobStore, BlobSummary, StorageError};

/// Azure Blob Storage adapter. The SDK's default transport has no deadline,
/// so every call is bounded by the configured request timeout.
pub struct AzureBlobStore {
    service: BlobServiceClient,
    timeout: Duration,
}

fn map_azure_error(container: &str, blob: &str, err: azure_core::Error) -> StorageError {
    if let Some(http_err) = err.as_http_error() {
        if http_err.status() == StatusCode::NotFound {
            return StorageError::NotFound {
                container: container.to_string(),
                blob: blob.to_string(),
            };
        }
    }
    StorageError::Backend(err.to_string())
}

impl AzureBlobStore {
    pub fn new(config: &Config) -> Self {
        let credentials = StorageCredentials::access_key(
            config.storage_account_name.clone(),
            config.storage_account_key.clone(),
        );
        let service = BlobServiceClient::new(config.storage_account_name.clone(), credentials);
        AzureBlobStore {
            service,
            timeout: Duration::from_secs(config.request_timeout_seconds),
        }
    }

    fn blob_client(&self, container: &str, blob: &str) -> BlobClient {
        self.service.container_client(container).blob_client(blob)
    }

    fn container_client(&self, container: &str) -> ContainerClient {
        self.service.container_client(container)
    }
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    async fn put(
        &self,
        container: &str,
        blob: &str,
        data: Vec<u8>,
        metadata: Option<HashMap<String, String>>,
    ) -> Result<(), StorageError> {
        let client = self.blob_client(container, blob);
        with_timeout(self.timeout, "put", async {
            let mut request = client.put_block_blob(data).content_type("image/png");
            if let Some(entries) = metadata {
                let mut blob_metadata = Metadata::new();
                for (key, value) in entries {
                    blob_metadata.insert(key, value);
                }
                request = request.metadata(blob_metadata);
            }
            request
                .await
                .map_err(|err| map_azure_error(container, blob, err))?;
            Ok(())
        })
        .await?;
        debug!("Uploaded blob {container}/{blob}");
        Ok(())
    }

    async fn get(&self, container: &str, blob: &str) -> Result<Vec<u8>, StorageError> {
        let client = self.blob_client(container, blob);
        with_timeout(self.timeout, "get", async {
            let mut bytes: Vec<u8> = Vec::new();
            let mut stream = client.get().chunk_size(0x2000u64).into_stream();
            while let Some(chunk) = stream.next().await {
                let response = chunk.map_err(|err| map_azure_error(container, blob, err))?;
                let data = response
                    .data
                    .collect()
                    .await
                    .map_err(|err| map_azure_error(container, blob, err))?;
                bytes.extend(&data);
            }
            Ok(bytes)
        })
        .await
    }

    async fn exists(&self, container: &str, blob: &str) -> Result<bool, StorageError> {
        let client = self.blob_client(container, blob);
        with_timeout(self.timeout, "exists", async {
            client
                .exists()
                .await
                .map_err(|err| map_azure_error(container, blob, err))
        })
        .await
    }

    async fn signed_read_url(
        &self,
        container: &str,
        blob: &str,
        ttl: Duration,
    ) -> Result<String, StorageError> {
        let client = self.blob_client(container, blob);
        with_timeout(self.timeout, "signed_read_url", async {
            let expiry = OffsetDateTime::now_utc() + time::Duration::seconds(ttl.as_secs() as i64);
            let permissions = BlobSasPermissions {
                read: true,
                ..Default::default()
            };
            let signature = client
                .shared_access_signature(permissions, expiry)
                .await
                .map_err(|err| map_azure_error(container, blob, err))?;
            let url = client
                .generate_signed_blob_url(&signature)
                .map_err(|err| map_azure_error(container, blob, err))?;
            Ok(url.to_string())
        })
        .await
    }

    async fn list_with_metadata(
        &self,
        container: &str,
    ) -> Result<Vec<BlobSummary>, StorageError> {
        let client = self.container_client(container);
        with_timeout(self.timeout, "list_with_metadata", async {
            let mut summaries = Vec::new();
            let mut pages = client.list_blobs().include_metadata(true).into_stream();
            while let Some(page) = pages.next().await {
                let page = page.map_err(|err| map_azure_error(container, "", err))?;
                for blob in page.blobs.blobs() {
                    let name = blob
                        .metadata
                        .as_ref()
                        .and_then(|entries| entries.get("file_name").cloned());
                    summaries.push(BlobSummary {
                        id: blob.name.clone(),
                        name,
                    });
                }
            }
            Ok(summaries)
        })
        .await
    }
}
