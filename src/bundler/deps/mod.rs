//! Dependency discovery and vendoring.
//!
//! Runs `pipreqs` over the entry script's directory to infer the manifest,
//! relocates the manifest into the package, then installs every entry into
//! the vendor directory with `pip install --target`.

mod manifest;

pub use manifest::{DependencyManifest, Requirement};

use crate::bundler::{
    error::{Error, Result},
    layout::{MANIFEST_FILE, PackageLayout},
    settings::Settings,
    utils::{fs, process},
};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

/// Infers, relocates and installs the project's dependencies.
///
/// # Errors
///
/// - [`Error::DependencyScan`] if the scanner exits non-zero
/// - [`Error::ManifestNotFound`] if the scanner wrote no manifest
/// - [`Error::DependencyInstall`] if the installer exits non-zero
pub async fn resolve_dependencies(
    settings: &Settings,
    layout: &PackageLayout,
) -> Result<DependencyManifest> {
    log::info!("Extracting dependencies from {}", settings.script_dir().display());

    scan(settings, layout).await?;

    let generated = settings.script_dir().join(MANIFEST_FILE);
    if !generated.is_file() {
        return Err(Error::ManifestNotFound(generated));
    }
    let manifest_path = layout.manifest_path();
    fs::move_file(&generated, &manifest_path).await?;

    let manifest = DependencyManifest::load(&manifest_path).await?;
    log::info!("Found {} dependencies", manifest.len());
    for requirement in manifest.requirements() {
        log::debug!("  - {}", requirement);
    }

    let vendor_dir = layout.vendor_dir();
    fs::create_dir_all(&vendor_dir).await?;

    if manifest.is_empty() {
        log::info!("No third-party imports found; vendor directory left empty");
        return Ok(manifest);
    }

    install(settings, layout).await?;
    log::info!("✓ Installed dependencies into {}", vendor_dir.display());

    Ok(manifest)
}

async fn scan(settings: &Settings, layout: &PackageLayout) -> Result<()> {
    let mut args: Vec<OsString> = vec![
        "-m".into(),
        "pipreqs.pipreqs".into(),
        "--encoding=utf8".into(),
        "--force".into(),
    ];
    let ignored = ignored_dirs(settings, layout);
    if !ignored.is_empty() {
        args.push("--ignore".into());
        args.push(join_comma(&ignored));
    }
    args.push(settings.script_dir().into());

    let output = process::run_captured(settings.python(), args).await?;

    if !output.success() {
        return Err(Error::DependencyScan {
            status: output.status_text(),
            stderr: output.diagnostics(),
        });
    }
    Ok(())
}

/// Packaging directories inside the scanned tree.
///
/// A previous package's `lib/` would otherwise contribute the imports of
/// every vendored dependency.
fn ignored_dirs(settings: &Settings, layout: &PackageLayout) -> Vec<PathBuf> {
    let script_dir = settings.script_dir();
    [settings.output_dir(), layout.root()]
        .into_iter()
        .filter(|dir| dir.starts_with(script_dir) && *dir != script_dir)
        .map(Path::to_path_buf)
        .collect()
}

fn join_comma(paths: &[PathBuf]) -> OsString {
    let mut joined = OsString::new();
    for (i, path) in paths.iter().enumerate() {
        if i > 0 {
            joined.push(",");
        }
        joined.push(path);
    }
    joined
}

async fn install(settings: &Settings, layout: &PackageLayout) -> Result<()> {
    let args: [OsString; 7] = [
        "-m".into(),
        "pip".into(),
        "install".into(),
        "-r".into(),
        layout.manifest_path().into(),
        "--target".into(),
        layout.vendor_dir().into(),
    ];
    let output = process::run_captured(settings.python(), args).await?;

    if !output.success() {
        return Err(Error::DependencyInstall {
            status: output.status_text(),
            stderr: output.diagnostics(),
        });
    }
    Ok(())
}
