//! External tool detection and availability checking.
//!
//! Locates the interpreter used when none is configured explicitly.

use crate::bundler::error::{Error, Result};
use std::{path::PathBuf, process::Command, sync::LazyLock};

#[cfg(windows)]
const PYTHON_CANDIDATES: &[&str] = &["python"];

#[cfg(not(windows))]
const PYTHON_CANDIDATES: &[&str] = &["python3", "python"];

/// Interpreter found on `PATH`, resolved to the executable it reports.
///
/// Cached result to avoid repeated subprocess calls.
pub static DEFAULT_PYTHON: LazyLock<Option<PathBuf>> = LazyLock::new(|| {
    PYTHON_CANDIDATES.iter().find_map(|candidate| {
        let path = match which::which(candidate) {
            Ok(path) => path,
            Err(e) => {
                log::debug!("{} not found in PATH: {}", candidate, e);
                return None;
            }
        };
        log::debug!("Found {} at: {}", candidate, path.display());

        match Command::new(&path)
            .args(["-c", "import sys; print(sys.executable)"])
            .output()
        {
            Ok(output) if output.status.success() => {
                let reported = String::from_utf8_lossy(&output.stdout).trim().to_string();
                let resolved = if reported.is_empty() {
                    path
                } else {
                    PathBuf::from(reported)
                };
                log::info!("✓ Using interpreter {}", resolved.display());
                Some(resolved)
            }
            Ok(output) => {
                log::warn!(
                    "{} found at {} but failed to report its executable (exit code: {:?}). \
                     Stderr: {}",
                    candidate,
                    path.display(),
                    output.status.code(),
                    String::from_utf8_lossy(&output.stderr)
                );
                None
            }
            Err(e) => {
                log::warn!(
                    "{} found at {} but failed to execute: {}. Check file permissions.",
                    candidate,
                    path.display(),
                    e
                );
                None
            }
        }
    })
});

/// Returns the default interpreter or [`Error::InterpreterNotFound`].
pub fn default_python() -> Result<PathBuf> {
    DEFAULT_PYTHON.clone().ok_or_else(|| {
        Error::InterpreterNotFound(format!(
            "none of {} on PATH",
            PYTHON_CANDIDATES.join(", ")
        ))
    })
}
