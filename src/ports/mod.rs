//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the use-case layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `RecordRepository`: Durable storage of the record collection

pub mod repository;
