//! Launcher script generation.
//!
//! Two launchers exist:
//! - the primary launcher inside the layout, which points the dependency
//!   search path at the vendor directory and runs the embedded interpreter on
//!   the entry script
//! - the extract-and-run launcher beside a single-file archive, which unpacks
//!   the archive and calls the primary launcher

mod template;

use super::{
    error::{Error, Result},
    interpreter::EmbeddedInterpreter,
    layout::{INTERPRETER_DIR, PackageLayout, VENDOR_DIR},
    settings::{LauncherSyntax, Settings, TargetProfile},
    utils::fs,
};
use handlebars::Handlebars;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Renders and writes the primary launcher into the layout.
///
/// Shell launchers are marked executable after writing.
pub async fn create_launcher(
    settings: &Settings,
    layout: &PackageLayout,
    interpreter: &EmbeddedInterpreter,
) -> Result<PathBuf> {
    log::info!("Generating launcher {}", layout.launcher_file_name());

    let target = settings.target();
    let content = render_launcher(target, layout, interpreter)?;
    let path = layout.launcher_path();
    write_launcher(target.launcher, &path, &content).await?;

    Ok(path)
}

/// Renders and writes the extract-and-run launcher beside `archive`.
pub async fn create_extract_launcher(
    settings: &Settings,
    layout: &PackageLayout,
    archive: &Path,
) -> Result<PathBuf> {
    let target = settings.target();
    let archive_name = archive
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::GenericError(format!("invalid archive path {archive:?}")))?;
    let dir = archive.parent().unwrap_or_else(|| Path::new("."));
    let path = dir.join(format!(
        "{}_launcher.{}",
        layout.name(),
        target.launcher.extension()
    ));

    log::info!("Generating extract-and-run launcher {}", path.display());

    let content = render_extract_launcher(target.launcher, layout, archive_name)?;
    write_launcher(target.launcher, &path, &content).await?;

    log::info!("✓ Created launcher: {}", path.display());
    Ok(path)
}

/// Renders the primary launcher text.
pub fn render_launcher(
    target: &TargetProfile,
    layout: &PackageLayout,
    interpreter: &EmbeddedInterpreter,
) -> Result<String> {
    let sep = target.path_separator();
    let command = match &interpreter.windowed {
        Some(windowed) => format!(
            "start \"\" {INTERPRETER_DIR}{sep}{}",
            file_name(windowed)?
        ),
        None => format!("{INTERPRETER_DIR}{sep}{}", file_name(&interpreter.console)?),
    };

    let data = json!({
        "vendor_dir": VENDOR_DIR,
        "command": command,
        "script": layout.script_file_name(),
    });

    let source = match target.launcher {
        LauncherSyntax::Batch => template::BATCH_LAUNCHER,
        LauncherSyntax::Shell => template::SHELL_LAUNCHER,
    };
    render(target.launcher, source, &data)
}

/// Renders the extract-and-run launcher text.
pub fn render_extract_launcher(
    syntax: LauncherSyntax,
    layout: &PackageLayout,
    archive_name: &str,
) -> Result<String> {
    let data = json!({
        "archive": archive_name,
        "root": layout.name(),
        "launcher": layout.launcher_file_name(),
    });

    let source = match syntax {
        LauncherSyntax::Batch => template::BATCH_EXTRACT_LAUNCHER,
        LauncherSyntax::Shell => template::SHELL_EXTRACT_LAUNCHER,
    };
    render(syntax, source, &data)
}

fn render(syntax: LauncherSyntax, source: &str, data: &serde_json::Value) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(true);

    let rendered = handlebars
        .render_template(source, data)
        .map_err(|e| Error::Template(e.to_string()))?;

    Ok(match syntax.line_ending() {
        "\n" => rendered,
        eol => rendered.replace('\n', eol),
    })
}

async fn write_launcher(syntax: LauncherSyntax, path: &Path, content: &str) -> Result<()> {
    fs::write_file(path, content.as_bytes()).await?;
    if syntax.needs_exec_bit() {
        fs::set_executable(path).await?;
    }
    Ok(())
}

fn file_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::GenericError(format!("invalid interpreter path {path:?}")))
}
