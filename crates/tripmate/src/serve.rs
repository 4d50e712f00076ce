// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tripmate serve` command implementation.
//!
//! Wires SQLite storage, the OpenAI provider and the chat pipeline into the
//! HTTP gateway, then serves until SIGTERM or Ctrl+C.

use std::sync::Arc;

use tracing::info;
use tripmate_agent::{install_signal_handler, shutdown_adapters, ChatPipeline};
use tripmate_config::TripmateConfig;
use tripmate_core::{ProviderAdapter, StorageAdapter, TripmateError};
use tripmate_gateway::{start_server, GatewayState, ServerConfig};
use tripmate_openai::OpenAiProvider;
use tripmate_storage::SqliteStorage;

/// Runs the server until a shutdown signal arrives.
pub async fn run_serve(config: TripmateConfig) -> Result<(), TripmateError> {
    init_tracing(&config.agent.log_level);

    info!(
        name = config.agent.name.as_str(),
        version = env!("CARGO_PKG_VERSION"),
        "starting tripmate"
    );

    // The provider goes first so a missing API key fails before the
    // database is touched.
    let provider: Arc<dyn ProviderAdapter + Send + Sync> =
        Arc::new(OpenAiProvider::new(&config.openai)?);
    info!(model = config.openai.default_model.as_str(), "provider ready");

    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let storage: Arc<dyn StorageAdapter + Send + Sync> = Arc::new(storage);
    info!(path = config.storage.database_path.as_str(), "storage ready");

    let pipeline =
        Arc::new(ChatPipeline::from_config(&config, storage.clone(), provider.clone()).await);
    let state = GatewayState::new(&config, pipeline, storage.clone(), provider.clone());

    let cancel = install_signal_handler();
    let result = start_server(&ServerConfig::from_config(&config), state, cancel).await;

    shutdown_adapters(&storage, &provider).await;
    info!("tripmate stopped");
    result
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tripmate={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[serial_test::serial]
    async fn serve_fails_fast_without_api_key() {
        // SAFETY: serialized test; no other thread reads the variable.
        unsafe { std::env::remove_var("OPENAI_API_KEY") };
        let mut config = TripmateConfig::default();
        config.openai.api_key = None;
        config.storage.database_path = "/nonexistent/dir/never-created.db".into();

        let err = run_serve(config).await.unwrap_err();
        assert!(matches!(err, TripmateError::Config(_)));
    }
}
