//! Expense Tracker — Entry Point
//!
//! Wiring sequence:
//! 1. Load config.toml (or defaults) + env overrides + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Create the CSV repository and the record store
//! 4. Load records from the data file (fail fast on malformed data)
//! 5. Serve the HTTP API until SIGINT
//! 6. Graceful shutdown: mark not ready, drain, close the store

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{info, warn};

use expense_tracker::adapters::http::{self, AppState};
use expense_tracker::adapters::metrics::{HealthState, MetricsRegistry};
use expense_tracker::adapters::persistence::CsvRecordFile;
use expense_tracker::config::{self, AppConfig};
use expense_tracker::usecases::RecordStore;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config_path = std::env::var(config::loader::CONFIG_PATH_ENV)
        .unwrap_or_else(|_| "config.toml".to_string());
    let (config, from_file) = config::loader::load_config(&config_path)
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured logging ────────────────────
    init_tracing(&config);

    if !from_file {
        warn!(path = %config_path, "Config file not found, using defaults");
    }
    info!(
        name = %config.service.name,
        version = env!("CARGO_PKG_VERSION"),
        data_file = %config.persistence.data_file,
        decode_mode = ?config.persistence.decode_mode,
        "Starting expense tracker"
    );

    // ── 3. Repository + store ───────────────────────────────
    let repository = Arc::new(CsvRecordFile::new(
        &config.persistence.data_file,
        config.persistence.decode_mode,
    ));
    let store = Arc::new(RecordStore::new(repository));
    let health = Arc::new(HealthState::new());

    // ── 4. Load records before accepting requests ───────────
    store
        .load()
        .await
        .with_context(|| format!("Failed to load {}", config.persistence.data_file))?;
    health.mark_loaded();

    let metrics = if config.metrics.enabled {
        let registry = Arc::new(MetricsRegistry::new().context("Failed to create metrics")?);
        registry.set_records_stored(store.len().await);
        Some(registry)
    } else {
        None
    };

    info!(records = store.len().await, "Record store ready");

    // ── 5. Serve HTTP ───────────────────────────────────────
    let app = http::router(AppState {
        store: Arc::clone(&store),
        health: Arc::clone(&health),
        metrics,
        pages_dir: Arc::new(PathBuf::from(&config.server.pages_dir)),
    });

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_address))?;
    info!(address = %config.server.bind_address, "Server is running");

    let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(1);
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await
    });

    // ── 6. Wait for SIGINT ──────────────────────────────────
    signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("SIGINT received, initiating graceful shutdown");

    health.mark_shutting_down();
    let _ = shutdown_tx.send(());

    match server.await {
        Ok(Ok(())) => info!("HTTP server stopped"),
        Ok(Err(e)) => warn!(error = %e, "HTTP server exited with error"),
        Err(e) => warn!(error = %e, "HTTP server task failed"),
    }

    store.close().await.context("Failed to save records on shutdown")?;

    info!("Shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.service.log_level));

    if config.service.json_logs {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
