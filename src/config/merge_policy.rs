//! Merge rules for configuration sources: defaults first, later sources override.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default(
            "store.base_dir",
            super::default_base_dir().to_string_lossy().to_string(),
        )?
        .set_default("store.combined_file", super::default_combined_file())
}
