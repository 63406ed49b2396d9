//! CSV Record File - Whole-Collection File Persistence
//!
//! Saves the record collection with atomic writes (write to
//! `<file>.tmp`, then rename over the data file). The data file is
//! always either the old or the new collection, never a partial write.
//!
//! Rows skipped by a lenient load exist only on disk. Before the first
//! write after such a load the data file is copied to `<file>.bak`.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

use super::codec::{self, DecodeMode};
use crate::domain::{Record, StoreError};
use crate::ports::repository::RecordRepository;

/// Record repository backed by one CSV file.
#[derive(Debug)]
pub struct CsvRecordFile {
    /// Path to the data file.
    path: PathBuf,
    /// Temporary path for atomic writes.
    tmp_path: PathBuf,
    /// Copy of the data file taken before skipped rows are overwritten.
    backup_path: PathBuf,
    /// Set when the last load skipped rows that are not backed up yet.
    backup_pending: AtomicBool,
    /// Malformed row handling on load.
    mode: DecodeMode,
}

impl CsvRecordFile {
    /// Create a repository for `path`. Nothing is touched on disk until
    /// the first load or save.
    pub fn new(path: impl Into<PathBuf>, mode: DecodeMode) -> Self {
        let path = path.into();
        Self {
            tmp_path: with_suffix(&path, ".tmp"),
            backup_path: with_suffix(&path, ".bak"),
            path,
            backup_pending: AtomicBool::new(false),
            mode,
        }
    }

    /// Path of the data file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the data file is copied before skipped rows are overwritten.
    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }

    /// Read and decode the data file. `None` if it does not exist yet.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn read_records(&self) -> Result<Option<Vec<Record>>, StoreError> {
        let text = match fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No data file found, starting with an empty store");
                return Ok(None);
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        let (records, skipped) = codec::decode_with(self.mode, &text)?;
        for err in &skipped {
            warn!(line = err.line(), error = %err, "Skipping malformed record");
        }
        if !skipped.is_empty() {
            warn!(
                backup = %self.backup_path.display(),
                "Skipped rows will be backed up before the next save"
            );
        }
        self.backup_pending.store(!skipped.is_empty(), Ordering::SeqCst);

        info!(
            count = records.len(),
            skipped = skipped.len(),
            "Records loaded"
        );
        Ok(Some(records))
    }

    /// Encode and atomically replace the data file (tmp -> rename).
    #[instrument(skip(self, records), fields(path = %self.path.display(), count = records.len()))]
    pub async fn write_records(&self, records: &[Record]) -> Result<(), StoreError> {
        let text = codec::encode(records);

        fs::create_dir_all(self.parent_dir())
            .await
            .map_err(|e| StoreError::io(self.parent_dir(), e))?;

        if self.backup_pending.load(Ordering::SeqCst) {
            self.backup_original().await?;
        }

        // Write to tmp file
        fs::write(&self.tmp_path, text.as_bytes())
            .await
            .map_err(|e| StoreError::io(&self.tmp_path, e))?;

        // Atomic rename
        if let Err(e) = fs::rename(&self.tmp_path, &self.path).await {
            let _ = fs::remove_file(&self.tmp_path).await;
            return Err(StoreError::io(&self.path, e));
        }

        debug!(bytes = text.len(), "Records saved");
        Ok(())
    }

    async fn backup_original(&self) -> Result<(), StoreError> {
        match fs::copy(&self.path, &self.backup_path).await {
            Ok(_) => warn!(
                backup = %self.backup_path.display(),
                "Data file with skipped rows backed up"
            ),
            // Nothing left to preserve
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::io(&self.backup_path, e)),
        }
        self.backup_pending.store(false, Ordering::SeqCst);
        Ok(())
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

#[async_trait]
impl RecordRepository for CsvRecordFile {
    async fn load(&self) -> Result<Option<Vec<Record>>, StoreError> {
        self.read_records().await
    }

    async fn save(&self, records: &[Record]) -> Result<(), StoreError> {
        self.write_records(records).await
    }

    async fn is_healthy(&self) -> bool {
        fs::metadata(self.parent_dir())
            .await
            .map(|meta| meta.is_dir() && !meta.permissions().readonly())
            .unwrap_or(false)
    }
}
