//! Embedding Server Entry Point
//!
//! Selects the local or remote embedding strategy at startup, then serves
//! embedding requests as JSON-RPC over stdio. Logs go to stderr.

use clap::Parser;
use embedding_server::{bootstrap, Args, EmbeddingServer};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "embedding_server=info,embedding_component=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let timeout_secs = args.controller_timeout_secs;
    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Starting embedding server (model: {}, remote: {})",
        config.embedding_model_name,
        config.remote_embedding
    );

    let system_app = match bootstrap(config, timeout_secs).await {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("Startup failed: {}", e);
            std::process::exit(1);
        }
    };

    let server = Arc::new(EmbeddingServer::new(system_app));
    if let Err(e) = server.serve(tokio::io::stdin(), tokio::io::stdout()).await {
        tracing::error!("Embedding server error: {}", e);
        std::process::exit(1);
    }
}
