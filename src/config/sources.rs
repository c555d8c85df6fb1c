//! Configuration sources layered onto the default builder.

pub mod environment;
pub mod global_file;
