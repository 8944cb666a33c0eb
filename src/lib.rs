//! Application packager library for Python entry scripts
//!
//! This library turns a single entry script into a self-contained package:
//! - a directory tree with vendored dependencies, an embedded interpreter
//!   and a native launcher
//! - optionally a single archive plus an extract-and-run launcher
//! - optionally a macOS `.app` bundle or a Windows icon association
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
