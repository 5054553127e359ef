//! CLI command implementations.

pub mod input;
pub mod init;
pub mod tag;
pub mod stats;
pub mod analyze;
pub mod matrix;
pub mod export;
