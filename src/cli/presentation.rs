//! Presentation: text and JSON rendering of command results.

use crate::combine::CombineOutcome;
use crate::error::ApiError;
use crate::store::{BackupRecord, DocumentName};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::path::Path;

pub fn format_document(value: &Value) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn format_list_text(available: &[DocumentName], active: &[DocumentName]) -> String {
    if available.is_empty() && active.is_empty() {
        return "No documents. Add one with `mcpmerge add <file>`.".to_string();
    }

    let active_set: BTreeSet<&DocumentName> = active.iter().collect();
    let all: BTreeSet<&DocumentName> = available.iter().chain(active.iter()).collect();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Name", "Status"]);
    for name in all {
        let status = match (active_set.contains(name), available.contains(name)) {
            (true, true) => "active",
            (true, false) => "active (not in catalog)",
            _ => "available",
        };
        table.add_row(vec![name.to_string(), status.to_string()]);
    }
    format!(
        "{}\n{} available, {} active",
        table,
        available.len(),
        active.len()
    )
}

pub fn format_list_json(
    available: &[DocumentName],
    active: &[DocumentName],
) -> Result<String, ApiError> {
    let out = json!({ "available": available, "active": active });
    Ok(serde_json::to_string_pretty(&out)?)
}

pub fn format_combine_text(outcome: &CombineOutcome, combined_path: &Path, color: bool) -> String {
    let headline = format!(
        "Combined {} active document(s) into {}",
        outcome.documents.len(),
        combined_path.display()
    );
    let mut lines = vec![if color {
        headline.green().to_string()
    } else {
        headline
    }];

    if outcome.documents.is_empty() {
        lines.push("  (no active documents; wrote an empty configuration)".to_string());
    } else {
        let order: Vec<&str> = outcome.documents.iter().map(DocumentName::as_str).collect();
        lines.push(format!("  Merge order: {}", order.join(" < ")));
    }
    lines.push(format_backup_line(outcome.backup.as_ref()));
    lines.join("\n")
}

fn format_backup_line(backup: Option<&BackupRecord>) -> String {
    match backup {
        Some(record) => format!("  Backup: {}", record.file_name),
        None => "  Backup: none (no previous combined file)".to_string(),
    }
}

pub fn format_backup_result(backup: Option<&BackupRecord>, color: bool) -> String {
    match backup {
        Some(record) => format!("Backup created: {}", record.path.display()),
        None => {
            let msg = "No combined configuration exists; nothing to back up.";
            if color {
                msg.yellow().to_string()
            } else {
                msg.to_string()
            }
        }
    }
}

pub fn format_backups_text(backups: &[BackupRecord]) -> String {
    if backups.is_empty() {
        return "No backups.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Backup"]);
    for (i, record) in backups.iter().enumerate() {
        table.add_row(vec![(i + 1).to_string(), record.file_name.clone()]);
    }
    table.to_string()
}

pub fn format_backups_json(backups: &[BackupRecord]) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(backups)?)
}
