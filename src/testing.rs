use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::llm::{GenerationError, ImageGenerator};
use crate::storage::{BlobStore, BlobSummary, StorageError};

type BlobKey = (String, String);

/// In-memory `BlobStore` with call counters, for orchestrator and handler
/// tests.
#[derive(Default)]
pub struct MockBlobStore {
    blobs: Mutex<HashMap<BlobKey, (Vec<u8>, Option<HashMap<String, String>>)>>,
    puts: AtomicUsize,
    calls: AtomicUsize,
    put_times_out: AtomicBool,
}

impl MockBlobStore {
    /// Makes every subsequent upload report an expired deadline instead of
    /// storing anything.
    pub fn time_out_puts(&self) {
        self.put_times_out.store(true, Ordering::SeqCst);
    }

    pub fn seed(&self, container: &str, blob: &str, data: Vec<u8>) {
        self.blobs
            .lock()
            .unwrap()
            .insert((container.to_string(), blob.to_string()), (data, None));
    }

    pub fn contains(&self, container: &str, blob: &str) -> bool {
        self.blobs
            .lock()
            .unwrap()
            .contains_key(&(container.to_string(), blob.to_string()))
    }

    pub fn stored_bytes(&self, container: &str, blob: &str) -> Option<Vec<u8>> {
        self.blobs
            .lock()
            .unwrap()
            .get(&(container.to_string(), blob.to_string()))
            .map(|(data, _)| data.clone())
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Total number of trait calls of any kind.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl BlobStore for MockBlobStore {
    async fn put(
        &self,
        container: &str,
        blob: &str,
        data: Vec<u8>,
        metadata: Option<HashMap<String, String>>,
    ) -> Result<(), StorageError> {
        self.record_call();
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.put_times_out.load(Ordering::SeqCst) {
            return Err(StorageError::Timeout { operation: "put" });
        }
        self.blobs
            .lock()
            .unwrap()
            .insert((container.to_string(), blob.to_string()), (data, metadata));
        Ok(())
    }

    async fn get(&self, container: &str, blob: &str) -> Result<Vec<u8>, StorageError> {
        self.record_call();
        self.blobs
            .lock()
            .unwrap()
            .get(&(container.to_string(), blob.to_string()))
            .map(|(data, _)| data.clone())
            .ok_or_else(|| StorageError::NotFound {
                container: container.to_string(),
                blob: blob.to_string(),
            })
    }

    async fn exists(&self, container: &str, blob: &str) -> Result<bool, StorageError> {
        self.record_call();
        Ok(self.contains(container, blob))
    }

    async fn signed_read_url(
        &self,
        container: &str,
        blob: &str,
        _ttl: Duration,
    ) -> Result<String, StorageError> {
        self.record_call();
        Ok(format!("https://storage.test/{container}/{blob}?sig=stub"))
    }

    async fn list_with_metadata(
        &self,
        container: &str,
    ) -> Result<Vec<BlobSummary>, StorageError> {
        self.record_call();
        let blobs = self.blobs.lock().unwrap();
        let mut summaries: Vec<BlobSummary> = blobs
            .iter()
            .filter(|((stored_container, _), _)| stored_container == container)
            .map(|((_, blob), (_, metadata))| BlobSummary {
                id: blob.clone(),
                name: metadata
                    .as_ref()
                    .and_then(|entries| entries.get("file_name").cloned()),
            })
            .collect();
        summaries.sort_by(|left, right| left.id.cmp(&right.id));
        Ok(summaries)
    }
}

/// Scriptable `ImageGenerator`: individual filters or the describe step can
/// be told to fail.
#[derive(Default)]
pub struct MockGenerator {
    failing_filters: Mutex<HashSet<String>>,
    describe_fails: AtomicBool,
    describes: AtomicUsize,
    stylizes: AtomicUsize,
}

impl MockGenerator {
    pub fn fail_describe(&self) {
        self.describe_fails.store(true, Ordering::SeqCst);
    }

    pub fn fail_filter(&self, filter_name: &str) {
        self.failing_filters
            .lock()
            .unwrap()
            .insert(filter_name.to_string());
    }

    pub fn describe_calls(&self) -> usize {
        self.describes.load(Ordering::SeqCst)
    }

    pub fn stylize_calls(&self) -> usize {
        self.stylizes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageGenerator for MockGenerator {
    async fn describe(&self, _image_url: &str) -> Result<String, GenerationError> {
        self.describes.fetch_add(1, Ordering::SeqCst);
        if self.describe_fails.load(Ordering::SeqCst) {
            return Err(GenerationError("description model unavailable".to_string()));
        }
        Ok("A person with short dark hair wearing a blue shirt.".to_string())
    }

    async fn stylize(
        &self,
        _description: &str,
        filter_name: &str,
    ) -> Result<String, GenerationError> {
        self.stylizes.fetch_add(1, Ordering::SeqCst);
        if self.failing_filters.lock().unwrap().contains(filter_name) {
            return Err(GenerationError(format!(
                "generation rejected for filter {filter_name}"
            )));
        }
        Ok(format!("https://generated.test/{filter_name}.png"))
    }

    async fn fetch(&self, image_url: &str) -> Result<Vec<u8>, GenerationError> {
        Ok(image_url.as_bytes().to_vec())
    }
}
