//! Prometheus Metrics Registry - Record Store Observability
//!
//! Counts created and deleted records, store failures by operation
//! and kind, and the time each store operation takes (including the
//! file write for mutations). All metrics are named
//! `expense_tracker_*`.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

use crate::domain::StoreError;

/// Centralized Prometheus metrics for the service.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Records successfully created.
    pub records_created: IntCounter,
    /// Records successfully deleted.
    pub records_deleted: IntCounter,
    /// Failed store operations.
    pub store_errors: IntCounterVec,
    /// Records currently held by the store.
    pub records_stored: IntGauge,
    /// Store operation latency in seconds.
    pub operation_duration: HistogramVec,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let records_created = IntCounter::new(
            "expense_tracker_records_created_total",
            "Total records created",
        )?;

        let records_deleted = IntCounter::new(
            "expense_tracker_records_deleted_total",
            "Total records deleted",
        )?;

        let store_errors = IntCounterVec::new(
            Opts::new(
                "expense_tracker_store_errors_total",
                "Failed record store operations",
            ),
            &["operation", "kind"],
        )?;

        let records_stored = IntGauge::new(
            "expense_tracker_records_stored",
            "Records currently held by the store",
        )?;

        let operation_duration = HistogramVec::new(
            HistogramOpts::new(
                "expense_tracker_operation_duration_seconds",
                "Record store operation latency in seconds",
            )
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
            &["operation"],
        )?;

        // Register all metrics
        registry.register(Box::new(records_created.clone()))?;
        registry.register(Box::new(records_deleted.clone()))?;
        registry.register(Box::new(store_errors.clone()))?;
        registry.register(Box::new(records_stored.clone()))?;
        registry.register(Box::new(operation_duration.clone()))?;

        Ok(Self {
            registry,
            records_created,
            records_deleted,
            store_errors,
            records_stored,
            operation_duration,
        })
    }

    /// Count a failed store operation.
    pub fn record_error(&self, operation: &str, error: &StoreError) {
        self.store_errors
            .with_label_values(&[operation, error.kind()])
            .inc();
    }

    /// Observe how long an operation took.
    pub fn observe(&self, operation: &str, seconds: f64) {
        self.operation_duration
            .with_label_values(&[operation])
            .observe(seconds);
    }

    pub fn set_records_stored(&self, count: usize) {
        self.records_stored
            .set(i64::try_from(count).unwrap_or(i64::MAX));
    }

    /// Render all metrics in the Prometheus text exposition format.
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
