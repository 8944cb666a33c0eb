//! Shared helpers for filesystem and process operations.

pub mod fs;
pub mod process;
