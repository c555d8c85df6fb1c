//! Command-name contract used for log spans.

use crate::cli::parse::Commands;

/// Stable command name (e.g. "combine", "enable").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Add { .. } => "add",
        Commands::Enable { .. } => "enable",
        Commands::Disable { .. } => "disable",
        Commands::Remove { .. } => "remove",
        Commands::List { .. } => "list",
        Commands::Combine { .. } => "combine",
        Commands::Show => "show",
        Commands::Backup => "backup",
        Commands::Backups { .. } => "backups",
    }
}
