//! CLI route: single route table and run context. Dispatches to the store and
//! merge engine, then to presentation.

use crate::cli::command_name;
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_backup_result, format_backups_json, format_backups_text, format_combine_text,
    format_document, format_list_json, format_list_text,
};
use crate::combine::MergeEngine;
use crate::config::{ConfigLoader, ManagerConfig};
use crate::error::ApiError;
use crate::store::{ConfigStore, DocumentName, FsConfigStore, StoreLayout};
use std::path::{Path, PathBuf};
use tracing::{debug, info_span};

/// Runtime context for CLI execution: resolved config and the opened store.
pub struct RunContext {
    config: ManagerConfig,
    store: FsConfigStore,
    color: bool,
}

impl RunContext {
    /// Load config (explicit file or layered default) and open the store.
    /// `base_dir` overrides the configured base directory.
    pub fn new(base_dir: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = ConfigLoader::load_optional(config_path.as_deref())?;
        Self::from_config(config, base_dir.as_deref())
    }

    pub fn from_config(config: ManagerConfig, base_dir: Option<&Path>) -> Result<Self, ApiError> {
        let layout = StoreLayout::from_config(&config.store, base_dir);
        debug!(base_dir = %layout.base_dir().display(), "Resolved store layout");
        let store = FsConfigStore::open(layout)?;
        Ok(Self {
            config,
            store,
            color: false,
        })
    }

    /// Enable terminal colors in text output.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn store(&self) -> &FsConfigStore {
        &self.store
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let span = info_span!("command", name = command_name(command));
        let _guard = span.enter();

        match command {
            Commands::Add { file, name } => {
                let added = self.store.add(file, name.as_deref())?;
                Ok(format!("Added {} to available documents.", added))
            }
            Commands::Enable { name } => {
                let name = DocumentName::parse(name)?;
                self.store.enable(&name)?;
                Ok(format!(
                    "Enabled {}. Run `mcpmerge combine` to update the combined file.",
                    name
                ))
            }
            Commands::Disable { name } => {
                let name = DocumentName::parse(name)?;
                self.store.disable(&name)?;
                Ok(format!(
                    "Disabled {}. Run `mcpmerge combine` to update the combined file.",
                    name
                ))
            }
            Commands::Remove { name } => {
                let name = DocumentName::parse(name)?;
                self.store.remove(&name)?;
                Ok(format!("Removed {} from available documents.", name))
            }
            Commands::List { format } => {
                let available = self.store.list_available()?;
                let active = self.store.list_active()?;
                if format == "json" {
                    format_list_json(&available, &active)
                } else {
                    Ok(format_list_text(&available, &active))
                }
            }
            Commands::Combine { format } => {
                let outcome = MergeEngine::new(&self.store).combine()?;
                if format == "json" {
                    format_document(&outcome.merged)
                } else {
                    Ok(format_combine_text(
                        &outcome,
                        &self.store.layout().combined_path(),
                        self.color,
                    ))
                }
            }
            Commands::Show => match self.store.read_combined()? {
                Some(value) => format_document(&value),
                None => Err(ApiError::NoCombined(self.store.layout().combined_path())),
            },
            Commands::Backup => {
                let backup = MergeEngine::new(&self.store).snapshot()?;
                Ok(format_backup_result(backup.as_ref(), self.color))
            }
            Commands::Backups { format } => {
                let backups = self.store.list_backups()?;
                if format == "json" {
                    format_backups_json(&backups)
                } else {
                    Ok(format_backups_text(&backups))
                }
            }
        }
    }
}
