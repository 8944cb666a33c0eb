//! Launcher script templates.
//!
//! Rendered with `\n` line endings; batch output is converted to CRLF after
//! rendering.

/// Primary launcher, `cmd.exe` syntax.
pub const BATCH_LAUNCHER: &str = r#"@echo off
set PYTHONPATH={{vendor_dir}}
{{command}} "{{script}}"
"#;

/// Primary launcher, POSIX shell syntax.
pub const SHELL_LAUNCHER: &str = r#"#!/bin/bash
export PYTHONPATH={{vendor_dir}}
{{command}} "{{script}}"
"#;

/// Extract-and-run launcher, `cmd.exe` syntax.
pub const BATCH_EXTRACT_LAUNCHER: &str = r#"@echo off
powershell -command "Expand-Archive -Path '{{archive}}' -DestinationPath . -Force"
cd "{{root}}"
call "{{launcher}}"
"#;

/// Extract-and-run launcher, POSIX shell syntax.
pub const SHELL_EXTRACT_LAUNCHER: &str = r#"#!/bin/bash
tar -xzf "{{archive}}"
cd "{{root}}"
"./{{launcher}}"
"#;
