//! Persistence Adapters - CSV File Storage
//!
//! Implements the `RecordRepository` port with a single delimited text
//! file that is fully rewritten (tmp file, then rename) after every
//! mutation. No database dependency.

pub mod codec;
pub mod csv_file;

pub use codec::DecodeMode;
pub use csv_file::CsvRecordFile;
