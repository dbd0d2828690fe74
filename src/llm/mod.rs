use async_trait::async_trait;

pub mod azure_openai;

pub use azure_openai::AzureOpenAiClient;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct GenerationError(pub String);

/// Generation seam consumed by the orchestrator: one vision description call,
/// one stylization call per filter, plus retrieval of the transient result.
/// Every call is single-shot; nothing is retried here.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Describes the subject of the image behind `image_url`.
    async fn describe(&self, image_url: &str) -> Result<String, GenerationError>;

    /// Generates a stylized image for `filter_name` and returns a transient
    /// URL to the result.
    async fn stylize(
        &self,
        description: &str,
        filter_name: &str,
    ) -> Result<String, GenerationError>;

    /// Downloads the bytes behind a transient generation URL.
    async fn fetch(&self, image_url: &str) -> Result<Vec<u8>, GenerationError>;
}
