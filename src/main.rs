use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::info;

mod catalog;
mod config;
mod error;
mod handlers;
mod llm;
mod orchestrator;
mod state;
mod storage;
#[cfg(test)]
mod testing;
mod utils;

use config::Config;
use llm::AzureOpenAiClient;
use state::AppState;
use storage::AzureBlobStore;
use utils::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = Arc::new(Config::load()?);
    let _guards = init_logging(&config.log_level);
    info!("Starting selfie filter service");

    let store = Arc::new(AzureBlobStore::new(&config));
    let generator = Arc::new(AzureOpenAiClient::new(config.clone())?);
    let state = AppState::new(config.clone(), store, generator);

    let app = handlers::router(state);
    let listener = TcpListener::bind(&config.bind_address).await?;
    info!("Listening on {}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
        return;
    }
    info!("Shutdown signal received");
}
