//! Filesystem persistence for the snippet store.
//!
//! Layout under the base directory:
//!
//! ```text
//! <base>/available/<name>.json
//! <base>/active/<name>.json
//! <base>/backups/config_backup_<YYYYmmdd_HHMMSS>[_<n>].json
//! <base>/<combined_file>
//! ```
//!
//! Presence of a file in `active/` is what makes a document active.

use crate::error::StoreError;
use crate::store::{
    BackupRecord, Bucket, ConfigStore, DocumentName, StoreLayout, DOCUMENT_EXTENSION,
};
use chrono::{DateTime, Local};
use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const BACKUP_PREFIX: &str = "config_backup_";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const BACKUP_STAMP_LEN: usize = "YYYYmmdd_HHMMSS".len();

/// Directory-backed implementation of [`ConfigStore`].
#[derive(Debug, Clone)]
pub struct FsConfigStore {
    layout: StoreLayout,
}

impl FsConfigStore {
    /// Open the store, creating the base, bucket and backup directories if missing.
    pub fn open(layout: StoreLayout) -> Result<Self, StoreError> {
        for dir in [
            layout.base_dir().to_path_buf(),
            layout.bucket_dir(Bucket::Available),
            layout.bucket_dir(Bucket::Active),
            layout.backups_dir(),
        ] {
            fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        }
        debug!(base_dir = %layout.base_dir().display(), "Opened config store");
        Ok(Self { layout })
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    /// Register a JSON file in the catalog under its own file name (or `name`).
    ///
    /// The bytes are copied verbatim; invalid JSON is rejected here so that
    /// stored documents always parse.
    pub fn add(&self, source: &Path, name: Option<&str>) -> Result<DocumentName, StoreError> {
        if !source.is_file() {
            return Err(StoreError::SourceNotFound(source.to_path_buf()));
        }
        let bytes = fs::read(source).map_err(|e| StoreError::io(source, e))?;
        serde_json::from_slice::<Value>(&bytes).map_err(|e| StoreError::Parse {
            path: source.to_path_buf(),
            source: e,
        })?;

        let name = match name {
            Some(name) => DocumentName::parse(name)?,
            None => DocumentName::from_path(source)?,
        };
        let dest = self.layout.document_path(Bucket::Available, &name);
        if dest.exists() {
            info!(name = %name, "Replacing existing available document");
        }
        write_atomic(&dest, &bytes)?;
        info!(name = %name, source = %source.display(), "Added document");
        Ok(name)
    }

    /// Copy a catalog document into the active set.
    pub fn enable(&self, name: &DocumentName) -> Result<(), StoreError> {
        let source = self.layout.document_path(Bucket::Available, name);
        if !source.is_file() {
            return Err(StoreError::NotFound {
                bucket: Bucket::Available,
                name: name.clone(),
            });
        }
        let dest = self.layout.document_path(Bucket::Active, name);
        fs::copy(&source, &dest).map_err(|e| StoreError::io(&dest, e))?;
        info!(name = %name, "Enabled document");
        Ok(())
    }

    /// Drop a document from the active set. The catalog copy is untouched.
    pub fn disable(&self, name: &DocumentName) -> Result<(), StoreError> {
        let path = self.layout.document_path(Bucket::Active, name);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(name = %name, "Disabled document");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound {
                bucket: Bucket::Active,
                name: name.clone(),
            }),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    /// Delete a document from the catalog. Active documents must be disabled first.
    pub fn remove(&self, name: &DocumentName) -> Result<(), StoreError> {
        let path = self.layout.document_path(Bucket::Available, name);
        if !path.is_file() {
            return Err(StoreError::NotFound {
                bucket: Bucket::Available,
                name: name.clone(),
            });
        }
        if self.is_active(name) {
            return Err(StoreError::StillActive(name.clone()));
        }
        fs::remove_file(&path).map_err(|e| StoreError::io(&path, e))?;
        info!(name = %name, "Removed document");
        Ok(())
    }

    pub fn is_active(&self, name: &DocumentName) -> bool {
        self.layout.document_path(Bucket::Active, name).is_file()
    }

    pub fn list_available(&self) -> Result<Vec<DocumentName>, StoreError> {
        self.list_bucket(Bucket::Available)
    }

    /// Backups oldest first: by timestamp, then by same-second suffix.
    pub fn list_backups(&self) -> Result<Vec<BackupRecord>, StoreError> {
        let dir = self.layout.backups_dir();
        let mut records: Vec<BackupRecord> = json_files(&dir)?
            .into_iter()
            .filter_map(|path| {
                let file_name = path.file_name()?.to_str()?.to_string();
                file_name
                    .starts_with(BACKUP_PREFIX)
                    .then_some(BackupRecord { file_name, path })
            })
            .collect();
        records.sort_by(|a, b| {
            backup_order(&a.file_name)
                .cmp(&backup_order(&b.file_name))
                .then_with(|| a.file_name.cmp(&b.file_name))
        });
        Ok(records)
    }

    fn list_bucket(&self, bucket: Bucket) -> Result<Vec<DocumentName>, StoreError> {
        let mut names = Vec::new();
        for path in json_files(&self.layout.bucket_dir(bucket))? {
            match DocumentName::from_path(&path) {
                Ok(name) => names.push(name),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping document"),
            }
        }
        names.sort();
        Ok(names)
    }
}

impl ConfigStore for FsConfigStore {
    fn list_active(&self) -> Result<Vec<DocumentName>, StoreError> {
        self.list_bucket(Bucket::Active)
    }

    fn read_document(&self, bucket: Bucket, name: &DocumentName) -> Result<Value, StoreError> {
        let path = self.layout.document_path(bucket, name);
        match read_json(&path)? {
            Some(value) => Ok(value),
            None => Err(StoreError::NotFound {
                bucket,
                name: name.clone(),
            }),
        }
    }

    fn read_combined(&self) -> Result<Option<Value>, StoreError> {
        read_json(&self.layout.combined_path())
    }

    fn write_combined(&self, value: &Value) -> Result<(), StoreError> {
        let path = self.layout.combined_path();
        write_atomic(&path, &render(value, &path)?)?;
        debug!(path = %path.display(), "Committed combined document");
        Ok(())
    }

    fn write_backup(
        &self,
        value: &Value,
        taken_at: DateTime<Local>,
    ) -> Result<BackupRecord, StoreError> {
        let dir = self.layout.backups_dir();
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let stamp = taken_at.format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let bytes = render(value, &dir)?;
        for attempt in 0u32.. {
            let file_name = if attempt == 0 {
                format!("{BACKUP_PREFIX}{stamp}.{DOCUMENT_EXTENSION}")
            } else {
                format!("{BACKUP_PREFIX}{stamp}_{attempt}.{DOCUMENT_EXTENSION}")
            };
            let path = dir.join(&file_name);

            let created = write_new_file(&path, |file| {
                file.write_all(&bytes)?;
                file.sync_all()
            })?;
            if !created {
                continue;
            }

            info!(backup = %file_name, "Backup created");
            return Ok(BackupRecord { file_name, path });
        }
        Err(StoreError::io(
            &dir,
            std::io::Error::new(ErrorKind::AlreadyExists, "backup names exhausted"),
        ))
    }
}

/// Pretty JSON with two-space indentation and a trailing newline.
fn render(value: &Value, path: &Path) -> Result<Vec<u8>, StoreError> {
    let mut bytes = serde_json::to_vec_pretty(value).map_err(|e| {
        StoreError::io(path, std::io::Error::new(ErrorKind::InvalidData, e))
    })?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Read and parse a JSON file; `Ok(None)` if it does not exist.
fn read_json(path: &Path) -> Result<Option<Value>, StoreError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| StoreError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Create `path` (never overwriting) and fill it. `Ok(false)` if it already exists.
///
/// A file that could not be filled completely is removed again.
fn write_new_file<F>(path: &Path, fill: F) -> Result<bool, StoreError>
where
    F: FnOnce(&mut fs::File) -> std::io::Result<()>,
{
    let mut file = match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
    {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    if let Err(e) = fill(&mut file) {
        drop(file);
        if let Err(cleanup) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %cleanup, "Failed to remove partial file");
        }
        return Err(StoreError::io(path, e));
    }
    Ok(true)
}

/// Sort key of a backup file name: (timestamp, same-second suffix).
fn backup_order(file_name: &str) -> (&str, u32) {
    let stem = file_name
        .strip_prefix(BACKUP_PREFIX)
        .and_then(|s| s.strip_suffix(".json"))
        .unwrap_or(file_name);
    let stamp = stem.get(..BACKUP_STAMP_LEN).unwrap_or(stem);
    let suffix = stem
        .get(BACKUP_STAMP_LEN..)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|n| n.parse().ok())
        .unwrap_or(0);
    (stamp, suffix)
}

/// Write to a temporary sibling, then rename over the target.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, bytes).map_err(|e| StoreError::io(&temp_path, e))?;
    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        StoreError::io(path, e)
    })
}

/// Regular `*.json` files directly inside `dir`.
fn json_files(dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StoreError::io(dir, e)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() && path.extension() == Some(OsStr::new(DOCUMENT_EXTENSION)) {
            files.push(path);
        }
    }
    Ok(files)
}
