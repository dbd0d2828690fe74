use std::sync::Arc;
use std::time::Duration;

use futures::future;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{info, warn};

use crate::llm::{GenerationError, ImageGenerator};
use crate::storage::{BlobStore, StorageError};

/// One batch of stylizations for a single uploaded selfie.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub session_id: String,
    pub source_image_ref: String,
    pub filters: Vec<String>,
}

/// Per-filter result. `Success` serializes as the bare signed URL and
/// `Failure` as `{"error": message}`, matching the wire format clients
/// already consume.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FilterOutcome {
    Success(String),
    Failure { error: String },
}

/// Ordered mapping from filter name to outcome. Entry order is the request's
/// filter order; serialization preserves it.
#[derive(Debug, Default)]
pub struct BatchResult {
    entries: Vec<(String, FilterOutcome)>,
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, filter_name: &str) -> Option<&FilterOutcome> {
        self.entries
            .iter()
            .find(|(name, _)| name == filter_name)
            .map(|(_, outcome)| outcome)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, FilterOutcome)> {
        self.entries.iter()
    }
}

impl Serialize for BatchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, outcome) in &self.entries {
            map.serialize_entry(name, outcome)?;
        }
        map.end()
    }
}

/// Batch-level failures. Anything past the describe step is caught at the
/// filter boundary instead and never surfaces here.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("No {0} provided.")]
    MissingField(&'static str),
    #[error("source image {0} not found")]
    SourceNotFound(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

pub struct BatchOrchestrator {
    store: Arc<dyn BlobStore>,
    generator: Arc<dyn ImageGenerator>,
    output_container: String,
    sas_ttl: Duration,
}

fn validate(request: &GenerationRequest) -> Result<(), BatchError> {
    if request.session_id.trim().is_empty() {
        return Err(BatchError::MissingField("session_id"));
    }
    if request.source_image_ref.trim().is_empty() {
        return Err(BatchError::MissingField("stored_img"));
    }
    if request.filters.is_empty() {
        return Err(BatchError::MissingField("filters"));
    }
    Ok(())
}

impl BatchOrchestrator {
    pub fn new(
        store: Arc<dyn BlobStore>,
        generator: Arc<dyn ImageGenerator>,
        output_container: String,
        sas_ttl: Duration,
    ) -> Self {
        BatchOrchestrator {
            store,
            generator,
            output_container,
            sas_ttl,
        }
    }

    /// Runs one batch: a single description pass, then one independent
    /// generation task per filter. A filter's failure is recorded in its own
    /// slot and never affects the others; only validation, a missing source
    /// blob, or a failed description abort the batch as a whole.
    pub async fn run(
        &self,
        input_container: &str,
        request: &GenerationRequest,
    ) -> Result<BatchResult, BatchError> {
        validate(request)?;

        if !self
            .store
            .exists(input_container, &request.source_image_ref)
            .await?
        {
            return Err(BatchError::SourceNotFound(
                request.source_image_ref.clone(),
            ));
        }

        let source_url = self
            .store
            .signed_read_url(input_container, &request.source_image_ref, self.sas_ttl)
            .await?;

        // Every filter prompt depends on the description, so a failure here
        // is fatal to the whole batch.
        let description = self.generator.describe(&source_url).await?;
        info!(
            "Described source image for session {}: {} filter(s) requested",
            request.session_id,
            request.filters.len()
        );

        // Repeated filter names would produce duplicate keys in the result
        // map; keep the first occurrence and run each filter once.
        let mut filters: Vec<&str> = Vec::with_capacity(request.filters.len());
        for filter_name in &request.filters {
            if !filters.contains(&filter_name.as_str()) {
                filters.push(filter_name);
            }
        }

        let tasks = filters
            .iter()
            .map(|filter_name| self.process_filter(&request.session_id, &description, filter_name));
        let outcomes = future::join_all(tasks).await;

        let entries = filters
            .into_iter()
            .map(str::to_string)
            .zip(outcomes)
            .collect::<Vec<_>>();
        Ok(BatchResult { entries })
    }

    async fn process_filter(
        &self,
        session_id: &str,
        description: &str,
        filter_name: &str,
    ) -> FilterOutcome {
        match self
            .generate_and_store(session_id, description, filter_name)
            .await
        {
            Ok(stored_ref) => FilterOutcome::Success(stored_ref),
            Err(err) => {
                warn!("Filter '{filter_name}' failed for session {session_id}: {err}");
                FilterOutcome::Failure {
                    error: err.to_string(),
                }
            }
        }
    }

    async fn generate_and_store(
        &self,
        session_id: &str,
        description: &str,
        filter_name: &str,
    ) -> Result<String, BatchError> {
        let transient_url = self.generator.stylize(description, filter_name).await?;
        let bytes = self.generator.fetch(&transient_url).await?;

        let blob_name = format!("{session_id}/{session_id}_{filter_name}.png");
        self.store
            .put(&self.output_container, &blob_name, bytes, None)
            .await?;
        info!("Stored generated image for filter '{filter_name}' at blob: {blob_name}");

        let stored_ref = self
            .store
            .signed_read_url(&self.output_container, &blob_name, self.sas_ttl)
            .await?;
        Ok(stored_ref)
    }
}
