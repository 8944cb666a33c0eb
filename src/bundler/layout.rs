//! Package directory layout.

use super::settings::Settings;
use std::path::{Path, PathBuf};

/// Vendor directory holding installed dependencies.
pub const VENDOR_DIR: &str = "lib";
/// Directory holding the embedded interpreter.
pub const INTERPRETER_DIR: &str = "python";
/// Canonical dependency manifest file name.
pub const MANIFEST_FILE: &str = "requirements.txt";
/// Marker identifying a directory as a package this tool may replace.
pub const PACKAGE_MARKER: &str = ".kodegen-package";

/// The package directory as it is being assembled.
///
/// `root` is the staging directory during the pipeline; every accessor is a
/// pure path computation so stages only rely on what earlier stages created.
#[derive(Clone, Debug)]
pub struct PackageLayout {
    root: PathBuf,
    name: String,
    script_file_name: String,
    launcher_extension: &'static str,
}

impl PackageLayout {
    /// Layout rooted at `root` for the given settings.
    pub fn new(root: impl Into<PathBuf>, settings: &Settings) -> Self {
        Self {
            root: root.into(),
            name: settings.name().to_string(),
            script_file_name: settings.script_file_name().to_string(),
            launcher_extension: settings.target().launcher.extension(),
        }
    }

    /// Layout root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Copied entry script.
    pub fn script_path(&self) -> PathBuf {
        self.root.join(&self.script_file_name)
    }

    /// Entry script file name, as referenced by the launcher.
    pub fn script_file_name(&self) -> &str {
        &self.script_file_name
    }

    /// Vendored dependency directory.
    pub fn vendor_dir(&self) -> PathBuf {
        self.root.join(VENDOR_DIR)
    }

    /// Embedded interpreter directory.
    pub fn interpreter_dir(&self) -> PathBuf {
        self.root.join(INTERPRETER_DIR)
    }

    /// Canonical dependency manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    /// Package marker file.
    pub fn marker_path(&self) -> PathBuf {
        self.root.join(PACKAGE_MARKER)
    }

    /// Launcher file name, e.g. `demo.sh`.
    pub fn launcher_file_name(&self) -> String {
        format!("{}.{}", self.name, self.launcher_extension)
    }

    /// Primary launcher path.
    pub fn launcher_path(&self) -> PathBuf {
        self.root.join(self.launcher_file_name())
    }

    /// macOS application bundle directory.
    pub fn app_bundle_dir(&self) -> PathBuf {
        self.root.join(format!("{}.app", self.name))
    }

    /// Re-roots a path inside this layout onto `new_root`.
    ///
    /// Paths outside the layout are returned unchanged.
    pub fn relocate(&self, path: &Path, new_root: &Path) -> PathBuf {
        match path.strip_prefix(&self.root) {
            Ok(rel) => new_root.join(rel),
            Err(_) => path.to_path_buf(),
        }
    }
}
