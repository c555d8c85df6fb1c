//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, CombineError};

/// Map domain/service errors to a string for CLI output.
///
/// Combine failures name the offending document first, then the cause.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::Combine(CombineError::Document { name, source }) => {
            format!(
                "Error: failed to read active document '{}'\n  caused by: {}",
                name, source
            )
        }
        _ => format!("Error: {}", e),
    }
}
