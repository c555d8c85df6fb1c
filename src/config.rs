//! Configuration System
//!
//! Layered configuration for the store location and logging. Sources, lowest
//! precedence first: built-in defaults, the global config file (or an explicit
//! `--config` file), `MCPMERGE_*` environment variables. CLI flags are applied
//! on top by the binary.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod facade;
mod merge_policy;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Directories that live beside the combined file and cannot share its name.
const RESERVED_NAMES: &[&str] = &["available", "active", "backups"];

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Store location and output file name
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the snippet store lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base directory holding `available/`, `active/`, `backups/` and the combined file
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// File name of the combined output inside the base directory
    #[serde(default = "default_combined_file")]
    pub combined_file: String,
}

pub(crate) fn default_base_dir() -> PathBuf {
    PathBuf::from("mcp_configs")
}

pub(crate) fn default_combined_file() -> String {
    "claude_desktop_config.json".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            combined_file: default_combined_file(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Store(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Store(msg) => write!(f, "Store: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.base_dir.as_os_str().is_empty() {
            return Err("Base directory cannot be empty".to_string());
        }

        let name = self.combined_file.as_str();
        if name.is_empty() {
            return Err("Combined file name cannot be empty".to_string());
        }
        if Path::new(name).file_name().and_then(|n| n.to_str()) != Some(name) {
            return Err(format!(
                "Combined file name must be a plain file name, got {:?}",
                name
            ));
        }
        if RESERVED_NAMES.contains(&name) {
            return Err(format!("Combined file name {:?} is reserved", name));
        }
        Ok(())
    }
}

impl ManagerConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.store.validate() {
            errors.push(ValidationError::Store(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, folding all problems into a single error.
    pub fn ensure_valid(&self) -> Result<(), ApiError> {
        self.validate().map_err(|errors| {
            let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                msgs.join("\n")
            ))
        })
    }
}
