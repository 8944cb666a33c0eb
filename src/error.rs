//! Comprehensive error types for packaging operations.
//!
//! This module defines the crate-level error, the stable exit code taxonomy
//! and actionable recovery suggestions.

use thiserror::Error;

/// Result type alias for packaging operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Stable process exit codes.
pub mod exit_code {
    /// Package created.
    pub const SUCCESS: i32 = 0;
    /// Dependency manifest generation failed or the manifest was not written.
    pub const DEPENDENCY_MANIFEST: i32 = 1;
    /// Invalid command line arguments.
    pub const USAGE: i32 = 2;
    /// Dependency installation failed.
    pub const DEPENDENCY_INSTALL: i32 = 3;
    /// Filesystem operation failed.
    pub const FILESYSTEM: i32 = 4;
    /// Archive, template or metadata generation failed.
    pub const PACKAGING: i32 = 5;
    /// A required external tool is unavailable.
    pub const TOOLING: i32 = 6;
}

/// Main error type for all packaging operations
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Bundler errors
    #[error("Bundler error: {0}")]
    Bundler(#[from] crate::bundler::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl BundlerError {
    /// Maps the error to its stable process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Cli(_) => exit_code::USAGE,
            Self::Io(_) => exit_code::FILESYSTEM,
            Self::Json(_) => exit_code::PACKAGING,
            Self::Bundler(e) => e.exit_code(),
        }
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self.exit_code() {
            exit_code::DEPENDENCY_MANIFEST => vec![
                "Install pipreqs for the packaging interpreter: python -m pip install pipreqs"
                    .to_string(),
                "Check that the entry script's directory contains only parseable sources"
                    .to_string(),
            ],
            exit_code::DEPENDENCY_INSTALL => vec![
                "Review requirements.txt in the output directory for unresolvable entries"
                    .to_string(),
                "Check network access to the package index used by pip".to_string(),
            ],
            exit_code::USAGE => vec!["Run with --help to see the accepted arguments".to_string()],
            exit_code::TOOLING => vec![
                "Pass the interpreter explicitly with --python or KODEGEN_PYTHON".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
