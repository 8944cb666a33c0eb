//! External process execution with captured diagnostics.

use crate::bundler::error::{Error, Result};
use std::{ffi::OsStr, path::Path, process::ExitStatus};

/// Outcome of an external command that ran to completion.
#[derive(Debug)]
pub struct ProcessOutput {
    /// Exit status.
    pub status: ExitStatus,
    /// Captured standard output, lossily decoded.
    pub stdout: String,
    /// Captured standard error, lossily decoded.
    pub stderr: String,
}

impl ProcessOutput {
    /// Whether the command exited with status zero.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Human-readable exit status.
    pub fn status_text(&self) -> String {
        match self.status.code() {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        }
    }

    /// Trimmed stderr, falling back to stdout when stderr is empty.
    pub fn diagnostics(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }
}

/// Runs `program` with `args`, waits for it and captures its output.
///
/// A non-zero exit is not an error here; callers decide what failure means.
/// Only a spawn failure yields [`Error::CommandFailed`].
pub async fn run_captured<I, S>(program: &Path, args: I) -> Result<ProcessOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<_> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
    log::debug!(
        "Running {} {}",
        program.display(),
        args.iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    );

    let output = tokio::process::Command::new(program)
        .args(&args)
        .output()
        .await
        .map_err(|error| Error::CommandFailed {
            command: program.display().to_string(),
            error,
        })?;

    let output = ProcessOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if !output.stdout.trim().is_empty() {
        log::debug!("{} stdout:\n{}", program.display(), output.stdout.trim_end());
    }
    if !output.success() {
        log::debug!(
            "{} failed with {}: {}",
            program.display(),
            output.status_text(),
            output.diagnostics()
        );
    }

    Ok(output)
}
