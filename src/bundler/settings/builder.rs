//! Builder for constructing Settings.

use super::{Settings, TargetProfile};
use crate::bundler::{
    builder::default_python,
    error::{Error, Result},
};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// Provides a fluent API for building packaging settings with validation.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_script::bundler::{Platform, SettingsBuilder, TargetProfile};
///
/// # fn example() -> kodegen_bundler_script::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .script("src/app.py")
///     .output_dir("dist")
///     .name("demo")
///     .icon("assets/demo.icns")
///     .target(TargetProfile::for_platform(Platform::MacOs))
///     .python("/usr/bin/python3")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    script: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    onefile: bool,
    windowed: bool,
    icon: Option<PathBuf>,
    name: Option<String>,
    target: Option<TargetProfile>,
    python: Option<PathBuf>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the entry script.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn script<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.script = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the output directory.
    ///
    /// Default: `dist`
    pub fn output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Requests single-file packaging.
    pub fn onefile(mut self, onefile: bool) -> Self {
        self.onefile = onefile;
        self
    }

    /// Requests a console-less launcher.
    pub fn windowed(mut self, windowed: bool) -> Self {
        self.windowed = windowed;
        self
    }

    /// Sets the icon for the platform wrapper.
    pub fn icon<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.icon = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the package name.
    ///
    /// Default: the script's file stem
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the target profile.
    ///
    /// Default: the host platform
    pub fn target(mut self, target: TargetProfile) -> Self {
        self.target = Some(target);
        self
    }

    /// Sets the interpreter.
    ///
    /// Default: `python3` or `python` found on `PATH`
    pub fn python<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.python = Some(path.as_ref().to_path_buf());
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSettings`] if the script is missing, the name is
    ///   unusable or the output directory would contain the script
    /// - [`Error::InvalidScript`] if the script is not a readable file
    /// - [`Error::InterpreterNotFound`] if no interpreter can be located
    pub fn build(self) -> Result<Settings> {
        let script = self
            .script
            .ok_or_else(|| Error::InvalidSettings("script is required".into()))?;
        let script = absolute(&script)?;
        validate_script(&script)?;

        let name = match self.name {
            Some(name) => name,
            None => script
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string(),
        };
        validate_name(&name)?;

        let output_dir = absolute(&self.output_dir.unwrap_or_else(|| PathBuf::from("dist")))?;
        if output_dir.parent().is_none() {
            return Err(Error::InvalidSettings(format!(
                "output directory {} has no parent",
                output_dir.display()
            )));
        }
        if let Some(script_dir) = script.parent()
            && script_dir.starts_with(&output_dir)
        {
            return Err(Error::InvalidSettings(format!(
                "output directory {} must not contain the entry script",
                output_dir.display()
            )));
        }

        // existence is checked by the icon step, which may skip the icon
        let icon = self.icon.as_deref().map(absolute).transpose()?;

        let python = match self.python {
            Some(python) => {
                let python = absolute(&python)?;
                if !python.is_file() {
                    return Err(Error::InterpreterNotFound(python.display().to_string()));
                }
                python
            }
            None => default_python()?,
        };

        Ok(Settings::new(
            script,
            output_dir,
            self.onefile,
            self.windowed,
            icon,
            name,
            self.target.unwrap_or_default(),
            python,
        ))
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(path.absolutize()?.into_owned())
}

fn validate_script(script: &Path) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidScript {
        path: script.to_path_buf(),
        reason: reason.to_string(),
    };

    let metadata = std::fs::metadata(script).map_err(|_| invalid("does not exist"))?;
    if !metadata.is_file() {
        return Err(invalid("is not a regular file"));
    }
    std::fs::File::open(script).map_err(|e| invalid(&format!("is not readable: {e}")))?;
    if script.file_name().and_then(|n| n.to_str()).is_none() {
        return Err(invalid("file name is not valid UTF-8"));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(Error::InvalidSettings(format!(
            "package name {name:?} is not usable"
        )));
    }
    if name.contains(['/', '\\']) {
        return Err(Error::InvalidSettings(format!(
            "package name {name:?} must not contain path separators"
        )));
    }
    Ok(())
}
