use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::llm::ImageGenerator;
use crate::orchestrator::BatchOrchestrator;
use crate::storage::BlobStore;

/// Shared per-process state handed to every handler. All members are
/// immutable after construction; request-scoped state lives on the stack.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn BlobStore>,
    pub orchestrator: Arc<BatchOrchestrator>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        store: Arc<dyn BlobStore>,
        generator: Arc<dyn ImageGenerator>,
    ) -> Self {
        let orchestrator = Arc::new(BatchOrchestrator::new(
            store.clone(),
            generator,
            config.output_container.clone(),
            Duration::from_secs(config.sas_ttl_seconds),
        ));
        AppState {
            config,
            store,
            orchestrator,
        }
    }
}
