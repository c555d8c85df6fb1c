//! Config loading facade: assembles sources in precedence order and deserializes.

use super::merge_policy::builder_with_defaults;
use super::sources::{environment, global_file};
use super::ManagerConfig;
use crate::error::ApiError;
use config::File;
use std::path::Path;

/// Loads [`ManagerConfig`] from layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then the global config file, then environment variables.
    pub fn load() -> Result<ManagerConfig, ApiError> {
        let builder = global_file::add_to_builder(builder_with_defaults()?)?;
        let config: ManagerConfig = environment::add_to_builder(builder)
            .build()?
            .try_deserialize()?;
        config.ensure_valid()?;
        Ok(config)
    }

    /// Defaults, then `path` (must exist), then environment variables.
    ///
    /// The global config file is skipped.
    pub fn load_from_file(path: &Path) -> Result<ManagerConfig, ApiError> {
        if !path.is_file() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let builder = builder_with_defaults()?.add_source(File::from(path).required(true));
        let config: ManagerConfig = environment::add_to_builder(builder)
            .build()?
            .try_deserialize()?;
        config.ensure_valid()?;
        Ok(config)
    }

    /// `load_from_file` when a path is given, `load` otherwise.
    pub fn load_optional(path: Option<&Path>) -> Result<ManagerConfig, ApiError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }
}
