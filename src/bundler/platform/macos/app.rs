//! `.app` bundle synthesis.
//!
//! Produces the minimal structure Finder recognises as an application:
//!
//! ```text
//! <name>.app/
//!   Contents/
//!     Info.plist            binary plist
//!     MacOS/<name>          copy of the shell launcher
//!     Resources/app_icon.icns
//! ```

use crate::bundler::{
    error::Result,
    layout::PackageLayout,
    utils::fs,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the icon inside `Contents/Resources`.
pub const APP_ICON_FILE: &str = "app_icon.icns";

/// Keys written to `Contents/Info.plist`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct InfoPlist {
    /// Display name.
    #[serde(rename = "CFBundleName")]
    pub bundle_name: String,
    /// Executable inside `Contents/MacOS`.
    #[serde(rename = "CFBundleExecutable")]
    pub executable: String,
    /// Icon inside `Contents/Resources`.
    #[serde(rename = "CFBundleIconFile")]
    pub icon_file: String,
}

/// Builds `<layout>/<name>.app` around the layout's shell launcher.
///
/// Any previous bundle at the same path is replaced.
///
/// # Returns
///
/// Path of the `.app` directory.
pub async fn bundle_project(layout: &PackageLayout, icon: &Path) -> Result<PathBuf> {
    let name = layout.name();
    let app_dir = layout.app_bundle_dir();
    log::info!("Creating macOS app bundle {}", app_dir.display());

    let contents_dir = app_dir.join("Contents");
    let macos_dir = contents_dir.join("MacOS");
    let resources_dir = contents_dir.join("Resources");

    fs::remove_dir_all(&app_dir).await?;
    for dir in [&macos_dir, &resources_dir] {
        fs::create_dir_all(dir).await?;
    }

    fs::copy_file(icon, &resources_dir.join(APP_ICON_FILE)).await?;

    let info = InfoPlist {
        bundle_name: name.to_string(),
        executable: name.to_string(),
        icon_file: APP_ICON_FILE.to_string(),
    };
    plist::to_file_binary(contents_dir.join("Info.plist"), &info)?;

    let executable = macos_dir.join(name);
    fs::copy_file(&layout.launcher_path(), &executable).await?;
    fs::set_executable(&executable).await?;

    log::info!("✓ Created app bundle: {}", app_dir.display());
    Ok(app_dir)
}
