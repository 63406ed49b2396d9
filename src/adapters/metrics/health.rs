//! Health Checks - Liveness and Readiness Probes
//!
//! Readiness depends on the record store having loaded its data file
//! and the process not being in graceful shutdown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Shared health state polled by readiness probes.
#[derive(Debug, Default)]
pub struct HealthState {
    /// Whether the record store finished its initial load.
    store_loaded: AtomicBool,
    /// Whether graceful shutdown has started.
    shutting_down: AtomicBool,
}

impl HealthState {
    /// Create a new health state (not ready until the store is loaded).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_loaded(&self) {
        self.store_loaded.store(true, Ordering::Release);
    }

    pub fn mark_shutting_down(&self) {
        self.shutting_down.store(true, Ordering::Release);
    }

    /// Check if the service is ready to serve traffic.
    pub fn is_ready(&self) -> bool {
        self.store_loaded.load(Ordering::Acquire) && !self.shutting_down.load(Ordering::Acquire)
    }
}

/// Liveness probe: always returns 200 if the process is running.
pub async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Readiness probe: 200 only once loaded and before shutdown.
pub async fn readiness(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    if state.is_ready() {
        (StatusCode::OK, "READY")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
    }
}
