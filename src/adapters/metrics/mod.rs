//! Metrics and Monitoring Adapters
//!
//! Health probes (`/live`, `/ready`) and Prometheus metrics
//! (`/metrics`), mounted on the main HTTP router.

pub mod health;
pub mod prometheus;

pub use health::HealthState;
pub use self::prometheus::MetricsRegistry;
