//! Core Settings struct and implementations.

use super::TargetProfile;
use std::path::{Path, PathBuf};

/// Immutable packaging configuration.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder), which resolves
/// paths to absolute form and validates the entry script, package name and
/// interpreter.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_script::bundler::SettingsBuilder;
///
/// # fn example() -> kodegen_bundler_script::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .script("app.py")
///     .output_dir("dist")
///     .onefile(true)
///     .build()?;
/// assert_eq!(settings.name(), "app");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Absolute path of the entry script.
    script: PathBuf,

    /// Absolute path of the output directory.
    output_dir: PathBuf,

    /// Compress the layout into a single archive.
    onefile: bool,

    /// Suppress the console window where the target supports it.
    windowed: bool,

    /// Icon for the platform wrapper.
    icon: Option<PathBuf>,

    /// Package name; names the launcher, archive and bundle.
    name: String,

    /// Target platform strategy.
    target: TargetProfile,

    /// Interpreter used to run the dependency tools and embedded in the package.
    python: PathBuf,
}

impl Settings {
    /// Returns the absolute entry script path.
    pub fn script(&self) -> &Path {
        &self.script
    }

    /// Returns the entry script's file name.
    pub fn script_file_name(&self) -> &str {
        // Validated in SettingsBuilder::build
        self.script
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// Returns the directory containing the entry script.
    pub fn script_dir(&self) -> &Path {
        self.script.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Returns the absolute output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns the directory that receives the archive and its launcher.
    pub fn output_parent(&self) -> &Path {
        self.output_dir.parent().unwrap_or(&self.output_dir)
    }

    /// Whether single-file packaging was requested.
    pub fn onefile(&self) -> bool {
        self.onefile
    }

    /// Whether a windowed launcher was requested.
    pub fn windowed(&self) -> bool {
        self.windowed
    }

    /// Returns the icon path, if any.
    pub fn icon(&self) -> Option<&Path> {
        self.icon.as_deref()
    }

    /// Returns the package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the target profile.
    pub fn target(&self) -> &TargetProfile {
        &self.target
    }

    /// Returns the interpreter path.
    pub fn python(&self) -> &Path {
        &self.python
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        script: PathBuf,
        output_dir: PathBuf,
        onefile: bool,
        windowed: bool,
        icon: Option<PathBuf>,
        name: String,
        target: TargetProfile,
        python: PathBuf,
    ) -> Self {
        Self {
            script,
            output_dir,
            onefile,
            windowed,
            icon,
            name,
            target,
            python,
        }
    }
}
