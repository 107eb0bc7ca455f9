use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use polychat::config::Config;
use polychat::credentials::CredentialStore;
use polychat::history::HistoryStore;
use polychat::llm::ProviderRegistry;
use polychat::server::{AppState, build_app};

#[derive(Parser)]
#[command(name = "polychat", version, about = "Local multi-provider LLM chat server")]
struct Cli {
    /// Path to the YAML config file.
    #[arg(long, default_value = "polychat.yaml")]
    config: PathBuf,

    /// Override the configured listen host.
    #[arg(long)]
    host: Option<String>,

    /// Override the configured listen port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)
        .await
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let credentials = CredentialStore::load(&config.credentials_file).await;
    let providers = ProviderRegistry::new(credentials.keys(), config.providers.clone());
    let histories = HistoryStore::new(config.history_dir.clone());

    let state = AppState {
        providers,
        credentials,
        histories,
    };
    let app = build_app(state, config.server.request_timeout_seconds);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding to {addr}"))?;
    info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
