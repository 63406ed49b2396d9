//! Domain layer - Expense records and their invariants.
//!
//! Pure types and rules for the record store: the `Record` entity,
//! the create payload, id assignment and the amount aggregate.
//! No I/O happens here (hexagonal architecture inner ring).

pub mod error;
pub mod record;

// Re-export core types for convenience
pub use error::{ParseError, StoreError};
pub use record::{NewRecord, Record, RecordId};
