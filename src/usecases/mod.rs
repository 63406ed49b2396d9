//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain rules with port interfaces.
//!
//! Use cases:
//! - `RecordStore`: In-memory record collection kept in sync with the
//!   repository after every mutation

pub mod record_store;

pub use record_store::RecordStore;
