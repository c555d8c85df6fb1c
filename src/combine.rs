//! Combine pipeline: read the active set, deep-merge it, back up the previous
//! combined document, commit the new one.
//!
//! Every active document is read before anything is written. A document that
//! is missing or does not parse aborts the run with no backup and no commit, so
//! the previous combined document stays authoritative. Backup and commit are
//! not atomic as a pair: a crash between them leaves an extra backup and a
//! stale combined document, never a partial one.

use crate::error::{CombineError, StoreError};
use crate::merge::merge_all;
use crate::store::{BackupRecord, Bucket, ConfigStore, DocumentName};
use chrono::{DateTime, Local};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Result of a successful combine.
#[derive(Debug, Clone, PartialEq)]
pub struct CombineOutcome {
    pub merged: Value,
    /// Active documents in merge order (lowest precedence first).
    pub documents: Vec<DocumentName>,
    /// Snapshot of the previous combined document, if there was one.
    pub backup: Option<BackupRecord>,
}

/// Folds the active set of a [`ConfigStore`] into its combined document.
pub struct MergeEngine<'a, S: ConfigStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ConfigStore + ?Sized> MergeEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn combine(&self) -> Result<CombineOutcome, CombineError> {
        self.combine_at(Local::now())
    }

    /// Combine with an explicit backup timestamp.
    pub fn combine_at(&self, now: DateTime<Local>) -> Result<CombineOutcome, CombineError> {
        let documents = self.store.list_active()?;
        if documents.is_empty() {
            warn!("No active documents; combined configuration will be empty");
        }

        let mut values = Vec::with_capacity(documents.len());
        for name in &documents {
            let value = self
                .store
                .read_document(Bucket::Active, name)
                .map_err(|source| CombineError::Document {
                    name: name.clone(),
                    source,
                })?;
            debug!(name = %name, "Read active document");
            values.push(value);
        }

        let merged = merge_all(&values);
        let backup = self.snapshot_at(now)?;
        self.store.write_combined(&merged)?;

        info!(
            documents = documents.len(),
            backup = backup.as_ref().map(|b| b.file_name.as_str()),
            "Combined active documents"
        );
        Ok(CombineOutcome {
            merged,
            documents,
            backup,
        })
    }

    /// Back up the current combined document, if one exists.
    pub fn snapshot(&self) -> Result<Option<BackupRecord>, StoreError> {
        self.snapshot_at(Local::now())
    }

    pub fn snapshot_at(&self, now: DateTime<Local>) -> Result<Option<BackupRecord>, StoreError> {
        match self.store.read_combined()? {
            Some(prior) => self.store.write_backup(&prior, now).map(Some),
            None => {
                warn!("No combined configuration exists; nothing to back up");
                Ok(None)
            }
        }
    }
}
