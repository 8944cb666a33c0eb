//! Windows icon association.
//!
//! The primary launcher on Windows is a batch file, which cannot carry an
//! icon resource. The validated icon is copied next to the launcher as
//! `<name>.ico` so shortcuts and installers built from the package can point
//! at it; no executable resource is edited.

use crate::bundler::{error::Result, layout::PackageLayout, utils::fs};
use std::path::{Path, PathBuf};

/// Copies the icon into the layout as `<name>.ico`.
///
/// # Returns
///
/// Path of the copied icon.
pub async fn associate_icon(layout: &PackageLayout, icon: &Path) -> Result<PathBuf> {
    let dest = layout.root().join(format!("{}.ico", layout.name()));
    fs::copy_file(icon, &dest).await?;

    log::warn!(
        "Embedding icons into batch launchers is not supported; {} was copied for use by shortcuts",
        dest.display()
    );
    Ok(dest)
}
