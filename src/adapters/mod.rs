//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! infrastructure (files, HTTP). Each sub-module groups adapters by
//! concern.
//!
//! Adapter categories:
//! - `http`: axum router for the records API and pages
//! - `metrics`: Prometheus metrics export and health checks
//! - `persistence`: CSV codec and the file-backed repository

pub mod http;
pub mod metrics;
pub mod persistence;
