//! Platform-specific finishing.
//!
//! Runs only when an icon was supplied:
//!
//! - **Windows**: validates the `.ico` icon and records the icon binding
//! - **macOS**: synthesises a `.app` bundle around the shell launcher
//! - **Linux**: no icon convention; the icon is ignored
//!
//! An icon whose extension does not match the target is a warning, never an
//! error: the pipeline completes without the platform artifact. Only an icon
//! that is actually used must exist.

pub mod macos;
pub mod windows;

use super::{
    error::{Error, Result},
    layout::PackageLayout,
    settings::{IconFormat, Platform, Settings},
};
use std::path::{Path, PathBuf};

/// Runs the platform step for the configured target.
///
/// # Returns
///
/// Path of the created platform artifact, or `None` when no icon was given,
/// the icon was rejected, or the platform has nothing to produce.
pub async fn bundle_platform(
    settings: &Settings,
    layout: &PackageLayout,
) -> Result<Option<PathBuf>> {
    let Some(icon) = settings.icon() else {
        return Ok(None);
    };

    let target = settings.target();
    let Some(format) = target.icon else {
        log::info!(
            "Icons are not used for {} packages; ignoring {}",
            target.platform,
            icon.display()
        );
        return Ok(None);
    };

    if !accepts_icon(format, icon) {
        return Ok(None);
    }
    if !icon.is_file() {
        return Err(Error::InvalidSettings(format!(
            "icon {} does not exist",
            icon.display()
        )));
    }

    match target.platform {
        Platform::Windows => windows::associate_icon(layout, icon).await.map(Some),
        Platform::MacOs => macos::bundle_project(layout, icon).await.map(Some),
        Platform::Linux => Ok(None),
    }
}

fn accepts_icon(format: IconFormat, icon: &Path) -> bool {
    if format.matches(icon) {
        return true;
    }
    log::warn!(
        "Icon {} must be a .{} file for this target; skipping icon step",
        icon.display(),
        format.extension()
    );
    false
}
