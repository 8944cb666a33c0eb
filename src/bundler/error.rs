//! Error types for the packaging pipeline.
//!
//! Filesystem failures carry the operation and the offending path, external
//! tool failures carry the captured stderr, and every variant maps to one
//! stable exit code.

use crate::error::exit_code;
use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
};

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while assembling a package.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error with additional context.
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Self>),

    /// Filesystem operation failed.
    #[error("{context} {}: {error}", path.display())]
    Fs {
        /// What was being done.
        context: &'static str,
        /// The path involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        error: io::Error,
    },

    /// External command could not be spawned.
    #[error("failed to run {command}: {error}")]
    CommandFailed {
        /// Program name.
        command: String,
        /// Underlying error.
        #[source]
        error: io::Error,
    },

    /// The dependency scanner exited unsuccessfully.
    #[error("dependency manifest generation failed ({status}): {stderr}")]
    DependencyScan {
        /// Exit status description.
        status: String,
        /// Captured standard error.
        stderr: String,
    },

    /// The dependency scanner succeeded but wrote no manifest.
    #[error("dependency scanner did not produce a manifest at {}", .0.display())]
    ManifestNotFound(PathBuf),

    /// The dependency installer exited unsuccessfully.
    #[error("dependency installation failed ({status}): {stderr}")]
    DependencyInstall {
        /// Exit status description.
        status: String,
        /// Captured standard error.
        stderr: String,
    },

    /// No interpreter could be located.
    #[error("interpreter not found: {0}")]
    InterpreterNotFound(String),

    /// The entry script is unusable.
    #[error("invalid entry script {}: {reason}", path.display())]
    InvalidScript {
        /// Script path as given.
        path: PathBuf,
        /// Why it was rejected.
        reason: String,
    },

    /// Invalid package configuration.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Launcher template failure.
    #[error("template error: {0}")]
    Template(String),

    /// IO error without path information.
    #[error("{0}")]
    IoError(#[from] io::Error),

    /// Directory traversal error.
    #[error("{0}")]
    WalkDir(#[from] walkdir::Error),

    /// Path prefix stripping error.
    #[error("{0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// ZIP archive error.
    #[error("{0}")]
    Zip(#[from] zip::result::ZipError),

    /// Property list error.
    #[error("{0}")]
    Plist(#[from] plist::Error),

    /// Catch-all error.
    #[error("{0}")]
    GenericError(String),
}

impl Error {
    /// Maps the error to its stable process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Context(_, inner) => inner.exit_code(),
            Self::DependencyScan { .. } | Self::ManifestNotFound(_) => {
                exit_code::DEPENDENCY_MANIFEST
            }
            Self::DependencyInstall { .. } => exit_code::DEPENDENCY_INSTALL,
            Self::InvalidScript { .. } | Self::InvalidSettings(_) => exit_code::USAGE,
            Self::CommandFailed { .. } | Self::InterpreterNotFound(_) => exit_code::TOOLING,
            Self::Fs { .. } | Self::IoError(_) | Self::WalkDir(_) | Self::StripPrefix(_) => {
                exit_code::FILESYSTEM
            }
            Self::Zip(_) | Self::Plist(_) | Self::Template(_) | Self::GenericError(_) => {
                exit_code::PACKAGING
            }
        }
    }
}

/// Convenient early return with a [`Error::GenericError`].
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::bundler::Error::GenericError(format!($msg)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($fmt, $($arg)*)))
    };
}

/// Adds a message to an error or a missing value.
pub trait Context<T> {
    /// Wrap the error with a fixed message.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context(context.to_string(), Box::new(e)))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}

/// Attaches the operation and path to raw IO errors.
pub trait ErrorExt<T> {
    /// Convert an IO error into [`Error::Fs`].
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}
