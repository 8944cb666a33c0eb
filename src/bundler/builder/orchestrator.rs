//! Main bundler orchestration and coordination.
//!
//! This module provides the [`Bundler`] orchestrator that runs the packaging
//! stages in order against a staging directory and commits the result.

use super::{
    checksum::calculate_sha256,
    report::{ArchiveArtifact, BundleReport, Stage},
};
use crate::bundler::{
    archive, deps,
    error::{Context, Error, ErrorExt, Result},
    interpreter, launcher,
    layout::{PACKAGE_MARKER, PackageLayout},
    platform,
    settings::Settings,
    utils::fs,
};
use std::{io, path::Path};
use tempfile::TempDir;

/// Main bundler orchestrator.
///
/// Drives dependency resolution, interpreter embedding, launcher generation,
/// optional single-file packaging and the platform step, in that order.
///
/// The layout is assembled in a hidden staging directory beside the output
/// directory. Only after every stage has succeeded is the previous output
/// moved aside and the staging directory renamed into place, so a failed run
/// leaves the previous package untouched.
///
/// An existing output directory is only ever replaced when it is empty or
/// carries the package marker written into every layout.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_script::bundler::{Bundler, SettingsBuilder};
///
/// # async fn example() -> kodegen_bundler_script::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .script("app.py")
///     .output_dir("dist")
///     .onefile(true)
///     .build()?;
///
/// let report = Bundler::new(settings).bundle().await?;
/// println!("Launcher: {}", report.launcher.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Bundler {
    settings: Settings,
}

impl Bundler {
    /// Creates a new bundler with the given settings.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Returns a reference to the bundler settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs every stage and commits the package.
    ///
    /// # Returns
    ///
    /// A [`BundleReport`] whose paths point at the committed output.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSettings`] before any work is done if the output
    /// directory exists and holds something other than a previous package.
    /// Otherwise the first failing stage aborts the run. The staging
    /// directory is removed and any previous output directory is left as it
    /// was.
    pub async fn bundle(&self) -> Result<BundleReport> {
        let settings = &self.settings;
        let output_dir = settings.output_dir();
        let parent = settings.output_parent();

        log::info!(
            "Packaging {} as '{}' for {}",
            settings.script().display(),
            settings.name(),
            settings.target().platform
        );

        ensure_replaceable(output_dir).await?;
        fs::create_dir_all(parent).await?;
        let staging = tempfile::Builder::new()
            .prefix(&format!(".{}-staging-", settings.name()))
            .tempdir_in(parent)
            .fs_context("creating staging directory in", parent)?;
        log::debug!("Staging layout in {}", staging.path().display());

        let layout = PackageLayout::new(staging.path(), settings);
        let mut stages = Vec::new();

        fs::write_file(&layout.marker_path(), format!("{}\n", settings.name()).as_bytes())
            .await?;
        fs::copy_file(settings.script(), &layout.script_path())
            .await
            .context("copying entry script")?;
        stages.push(Stage::CopyScript);

        let manifest = deps::resolve_dependencies(settings, &layout).await?;
        stages.push(Stage::ResolveDependencies);

        let embedded = interpreter::embed_interpreter(settings, &layout).await?;
        stages.push(Stage::EmbedInterpreter);

        let launcher_path = launcher::create_launcher(settings, &layout, &embedded).await?;
        stages.push(Stage::GenerateLauncher);

        let mut archive_artifact = None;
        let mut extract_launcher = None;
        if settings.onefile() {
            let archive_path = archive::create_archive(
                settings.target().archive,
                layout.root(),
                settings.name(),
                parent,
            )
            .await?;
            stages.push(Stage::PackageArchive);

            let size = tokio::fs::metadata(&archive_path)
                .await
                .fs_context("reading archive metadata", &archive_path)?
                .len();
            let sha256 = calculate_sha256(&archive_path).await?;
            log::debug!("Archive is {} bytes, sha256 {}", size, sha256);

            extract_launcher = Some(
                launcher::create_extract_launcher(settings, &layout, &archive_path).await?,
            );
            stages.push(Stage::GenerateExtractLauncher);

            archive_artifact = Some(ArchiveArtifact {
                path: archive_path,
                size,
                sha256,
            });
        }

        let platform_artifact = platform::bundle_platform(settings, &layout).await?;
        stages.push(Stage::PlatformBundle);

        let layout_sha256 = calculate_sha256(layout.root()).await?;

        commit(staging, output_dir, parent).await?;
        stages.push(Stage::Commit);
        log::info!("✓ Package ready in {}", output_dir.display());

        Ok(BundleReport {
            name: settings.name().to_string(),
            platform: settings.target().platform,
            output_dir: output_dir.to_path_buf(),
            launcher: layout.relocate(&launcher_path, output_dir),
            interpreter: layout.relocate(&embedded.console, output_dir),
            dependencies: manifest.requirements().to_vec(),
            archive: archive_artifact,
            extract_launcher,
            platform_artifact: platform_artifact.map(|p| layout.relocate(&p, output_dir)),
            layout_sha256,
            stages,
        })
    }
}

/// Fails unless `output_dir` is absent, empty, or a previous package.
async fn ensure_replaceable(output_dir: &Path) -> Result<()> {
    let metadata = match tokio::fs::metadata(output_dir).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e).fs_context("inspecting output directory", output_dir),
    };
    if !metadata.is_dir() {
        return Err(Error::InvalidSettings(format!(
            "output path {} exists and is not a directory",
            output_dir.display()
        )));
    }
    if output_dir.join(PACKAGE_MARKER).is_file() {
        return Ok(());
    }

    let mut entries = tokio::fs::read_dir(output_dir)
        .await
        .fs_context("reading output directory", output_dir)?;
    let first = entries
        .next_entry()
        .await
        .fs_context("reading output directory", output_dir)?;
    match first {
        None => Ok(()),
        Some(_) => Err(Error::InvalidSettings(format!(
            "output directory {} is not empty and does not contain a previous package; \
             choose another --output-dir or empty it first",
            output_dir.display()
        ))),
    }
}

/// Replaces `output_dir` with the staged layout.
async fn commit(staging: TempDir, output_dir: &Path, parent: &Path) -> Result<()> {
    // tempdirs are created 0700
    fs::set_executable(staging.path()).await?;

    let staged = staging.keep();
    if let Err(e) = swap_into_place(&staged, output_dir, parent).await {
        let _ = fs::remove_dir_all(&staged).await;
        return Err(e);
    }
    Ok(())
}

/// Renames `staged` to `output_dir`.
///
/// A previous output directory is first moved into a temporary sibling and
/// only deleted once the new one is in place; if the rename fails it is
/// moved back.
async fn swap_into_place(staged: &Path, output_dir: &Path, parent: &Path) -> Result<()> {
    let previous = if output_dir.exists() {
        let holder = tempfile::Builder::new()
            .prefix(".kodegen-previous-")
            .tempdir_in(parent)
            .fs_context("creating temporary directory in", parent)?;
        let aside = holder.path().join("package");
        tokio::fs::rename(output_dir, &aside)
            .await
            .fs_context("moving previous package aside from", output_dir)?;
        Some((holder, aside))
    } else {
        None
    };

    if let Err(e) = tokio::fs::rename(staged, output_dir).await {
        if let Some((holder, aside)) = previous
            && let Err(restore) = tokio::fs::rename(&aside, output_dir).await
        {
            log::error!(
                "Could not restore previous package from {}: {}",
                aside.display(),
                restore
            );
            // keep the only remaining copy on disk
            let _ = holder.keep();
        }
        return Err(e).fs_context("moving staged package to", output_dir);
    }

    if let Some((holder, _)) = previous {
        log::info!("Replaced previous package in {}", output_dir.display());
        if let Err(e) = holder.close() {
            log::warn!("Failed to remove previous package: {}", e);
        }
    }
    Ok(())
}
