//! mcpmerge: JSON Config Snippet Registry
//!
//! Keeps a folder-based catalog of JSON configuration snippets, tracks which of
//! them are active, and deep-merges the active ones into a single combined
//! document, backing up the previous one first.

pub mod cli;
pub mod combine;
pub mod config;
pub mod error;
pub mod logging;
pub mod merge;
pub mod store;

pub use combine::{CombineOutcome, MergeEngine};
pub use merge::{deep_merge, merge_all};
pub use store::{ConfigStore, FsConfigStore, StoreLayout};
