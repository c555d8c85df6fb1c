//! CLI domain: parse, route, help, output, and presentation only.
//! No domain logic; a single route table dispatches to the store and merge engine.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_backup_result, format_backups_json, format_backups_text, format_combine_text,
    format_document, format_list_json, format_list_text,
};
pub use route::RunContext;
