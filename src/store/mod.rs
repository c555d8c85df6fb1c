//! Snippet Store
//!
//! Named JSON documents kept in two buckets ("available" catalog and "active"
//! subset), plus the single combined output document and its backups.

pub mod persistence;

pub use persistence::FsConfigStore;

use crate::config::StoreConfig;
use crate::error::StoreError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

/// File extension of every stored document.
pub const DOCUMENT_EXTENSION: &str = "json";

/// Bucket a document lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Available,
    Active,
}

impl Bucket {
    pub fn dir_name(self) -> &'static str {
        match self {
            Bucket::Available => "available",
            Bucket::Active => "active",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Name of a stored document: the file stem of `<name>.json`.
///
/// Ordering is the byte order of the name and defines merge precedence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentName(String);

impl DocumentName {
    /// Parse user input; surrounding whitespace is trimmed and a trailing
    /// `.json` is accepted and stripped.
    pub fn parse(input: &str) -> Result<Self, StoreError> {
        Self::from_file_name(input.trim())
            .map_err(|_| StoreError::InvalidName(input.to_string()))
    }

    /// Name derived from a document path (`dir/server1.json` -> `server1`).
    ///
    /// The stem is kept exactly as on disk so that `file_name` maps back to
    /// the same file.
    pub fn from_path(path: &Path) -> Result<Self, StoreError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StoreError::InvalidName(path.display().to_string()))?;
        Self::from_file_name(file_name)
    }

    fn from_file_name(file_name: &str) -> Result<Self, StoreError> {
        let stem = file_name.strip_suffix(".json").unwrap_or(file_name);
        let invalid = stem.is_empty()
            || stem == "."
            || stem == ".."
            || stem.contains(['/', '\\', '\0']);
        if invalid {
            return Err(StoreError::InvalidName(file_name.to_string()));
        }
        Ok(Self(stem.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.0, DOCUMENT_EXTENSION)
    }
}

impl fmt::Display for DocumentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A written backup snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRecord {
    pub file_name: String,
    pub path: PathBuf,
}

/// On-disk layout of a store rooted at a base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    base_dir: PathBuf,
    combined_file: String,
}

impl StoreLayout {
    pub fn new(base_dir: impl Into<PathBuf>, combined_file: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            combined_file: combined_file.into(),
        }
    }

    /// Layout from configuration, with an optional base directory override (`--dir`).
    pub fn from_config(config: &StoreConfig, base_override: Option<&Path>) -> Self {
        let base_dir = base_override
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config.base_dir.clone());
        Self::new(base_dir, config.combined_file.clone())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn bucket_dir(&self, bucket: Bucket) -> PathBuf {
        self.base_dir.join(bucket.dir_name())
    }

    pub fn document_path(&self, bucket: Bucket, name: &DocumentName) -> PathBuf {
        self.bucket_dir(bucket).join(name.file_name())
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    pub fn combined_path(&self) -> PathBuf {
        self.base_dir.join(&self.combined_file)
    }
}

/// Persistence contract consumed by the merge engine.
pub trait ConfigStore {
    /// Active document names, sorted lexicographically.
    fn list_active(&self) -> Result<Vec<DocumentName>, StoreError>;

    fn read_document(&self, bucket: Bucket, name: &DocumentName) -> Result<Value, StoreError>;

    /// Current combined document, or `None` if nothing was ever committed.
    fn read_combined(&self) -> Result<Option<Value>, StoreError>;

    /// Atomically replace the combined document.
    fn write_combined(&self, value: &Value) -> Result<(), StoreError>;

    /// Persist a new snapshot. Never overwrites an existing backup.
    fn write_backup(
        &self,
        value: &Value,
        taken_at: DateTime<Local>,
    ) -> Result<BackupRecord, StoreError>;
}
