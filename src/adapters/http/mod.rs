//! HTTP Adapter - Records API, Pages, Health and Metrics
//!
//! Maps verbs and paths onto `RecordStore` operations. Handlers own
//! the response conventions (an empty list is a 404, a bad id a 400);
//! the store only reports typed outcomes.
//!
//! Sub-modules:
//! - `handlers`: JSON records API and the total endpoint
//! - `pages`: static HTML pages from the configured directory
//! - `types`: error responses

pub mod handlers;
pub mod pages;
pub mod types;

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::FromRef;
use axum::routing::get;
use axum::Router;

use crate::adapters::metrics::{health, HealthState, MetricsRegistry};
use crate::usecases::RecordStore;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The record store.
    pub store: Arc<RecordStore>,
    /// Readiness flags.
    pub health: Arc<HealthState>,
    /// Prometheus metrics, `None` when disabled.
    pub metrics: Option<Arc<MetricsRegistry>>,
    /// Directory holding the HTML pages.
    pub pages_dir: Arc<PathBuf>,
}

impl FromRef<AppState> for Arc<HealthState> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.health)
    }
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/records",
            get(handlers::list_records).post(handlers::create_record),
        )
        .route(
            "/records/:id",
            get(handlers::get_record).delete(handlers::delete_record),
        )
        .route("/total", get(handlers::total_amount))
        .route("/metrics", get(handlers::metrics))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        .route("/", get(pages::home))
        .route("/add", get(pages::add))
        .route("/list", get(pages::list))
        .route("/delete", get(pages::delete))
        .with_state(state)
}
