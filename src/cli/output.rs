//! User-facing terminal output.
//!
//! Diagnostics go through `log`; this is only for the summary a user reads
//! after a run.

use console::{Term, style};
use std::io;

/// Styled writer for CLI status lines.
#[derive(Debug, Clone)]
pub struct OutputManager {
    quiet: bool,
    term: Term,
}

impl OutputManager {
    /// Create an output manager writing to stdout.
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            term: Term::stdout(),
        }
    }

    fn line(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(text)
    }

    /// `✓ <message>` in green.
    pub fn success(&self, message: &str) -> io::Result<()> {
        self.line(&format!("{} {}", style("✓").green().bold(), message))
    }

    /// Bold section title preceded by a blank line.
    pub fn section(&self, title: &str) -> io::Result<()> {
        self.line("")?;
        self.line(&style(title).cyan().bold().to_string())
    }

    /// Two-space indented detail line.
    pub fn indent(&self, message: &str) -> io::Result<()> {
        self.line(&format!("  {message}"))
    }
}
