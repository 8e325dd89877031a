//! voiceguard-api - AI voice detection microservice
//!
//! Loads configuration and the classifier, then serves the HTTP API.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};
use voiceguard_common::config::{self, ConfigOverrides, ServiceConfig, CONFIG_PATH_ENV};

use voiceguard_api::classifier::load_classifier;
use voiceguard_api::{build_router, AppState};

/// Command-line arguments for voiceguard-api
#[derive(Parser, Debug)]
#[command(name = "voiceguard-api")]
#[command(about = "AI-generated voice detection service")]
#[command(version)]
struct Args {
    /// Path to TOML config file
    #[arg(short, long, env = CONFIG_PATH_ENV)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Token expected in the x-api-key header
    #[arg(long)]
    api_key: Option<String>,

    /// JSON classifier model; a random classifier is used when absent
    #[arg(short, long)]
    model_path: Option<PathBuf>,

    /// Directory for temporary audio files
    #[arg(long)]
    temp_dir: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            api_key: self.api_key.clone(),
            model_path: self.model_path.clone(),
            temp_dir: self.temp_dir.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Log at info until the configured level is known; RUST_LOG always wins
    let rust_log = EnvFilter::try_from_default_env().ok();
    let has_rust_log = rust_log.is_some();
    let (filter, filter_handle) =
        reload::Layer::new(rust_log.unwrap_or_else(|| EnvFilter::new("info")));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let toml_config = config::load_or_default(args.config.as_deref())?;
    let service_config = ServiceConfig::resolve(&args.overrides(), &toml_config)?;

    if !has_rust_log {
        filter_handle
            .reload(EnvFilter::new(&service_config.logging.level))
            .context("Failed to apply configured log level")?;
    }

    info!("Starting {} v{}", service_config.service_name, env!("CARGO_PKG_VERSION"));
    info!("Temp dir: {}", service_config.temp_dir.display());
    if service_config.uses_default_api_key() {
        warn!("Using the default API key; set VOICEGUARD_API_KEY in production");
    }

    let classifier = load_classifier(service_config.model_path.as_deref())
        .context("Failed to load classifier model")?;

    let bind_address = service_config.bind_address();
    let state = AppState::new(service_config, classifier)?;
    info!("Classifier: {}", state.detector.classifier_name());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_address))?;
    info!("Listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
