//! Command line argument parsing and validation.
//!
//! This module provides comprehensive CLI argument parsing using clap,
//! with proper validation and error handling.

use crate::bundler::{Platform, SettingsBuilder, TargetProfile};
use clap::Parser;
use path_absolutize::Absolutize;
use std::path::PathBuf;

/// Self-contained packages for Python entry scripts
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_script",
    version,
    about = "Self-contained packages for Python entry scripts",
    long_about = "Packages a Python entry script into a directory holding the script, its vendored
dependencies, a copy of the interpreter and a native launcher.

Dependencies are inferred with pipreqs and installed with pip, both run through the
packaging interpreter.

Usage:
  kodegen_bundler_script app.py
  kodegen_bundler_script app.py --output-dir build --name demo --onefile
  kodegen_bundler_script app.py --target macos --icon app.icns

Exit code 0 = package guaranteed to exist in the output directory."
)]
pub struct Args {
    /// Entry script to package
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Directory the package is written to (replaced on success)
    #[arg(short = 'o', long, value_name = "PATH", default_value = "dist")]
    pub output_dir: PathBuf,

    /// Also produce a single archive plus an extract-and-run launcher
    #[arg(long)]
    pub onefile: bool,

    /// Launch without a console window (Windows targets)
    #[arg(long)]
    pub windowed: bool,

    /// Icon file: .ico for Windows, .icns for macOS
    #[arg(short, long, value_name = "PATH")]
    pub icon: Option<PathBuf>,

    /// Package name (defaults to the script's file stem)
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    /// Interpreter used to run the tools and to embed
    #[arg(long, value_name = "PATH", env = "KODEGEN_PYTHON")]
    pub python: Option<PathBuf>,

    /// Target platform profile (defaults to the host)
    #[arg(short, long, value_enum, env = "KODEGEN_BUNDLE_TARGET")]
    pub target: Option<Platform>,

    /// Write a JSON report of the run to this path
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Suppress the summary printed after packaging
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.script.as_os_str().is_empty() {
            return Err("Script path cannot be empty".to_string());
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err("Output directory cannot be empty".to_string());
        }

        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err("Name cannot be empty".to_string());
        }

        if let Some(report) = &self.report {
            let report_abs = report.absolutize().map_err(|e| e.to_string())?;
            let output_abs = self.output_dir.absolutize().map_err(|e| e.to_string())?;
            if report_abs.starts_with(&output_abs) {
                return Err(format!(
                    "Report path {} must not be inside the output directory, which is replaced on every run",
                    report.display()
                ));
            }
        }

        Ok(())
    }

    /// Translates the arguments into an unvalidated settings builder.
    pub fn settings_builder(&self) -> SettingsBuilder {
        let target = self
            .target
            .map(TargetProfile::for_platform)
            .unwrap_or_else(TargetProfile::host);

        let mut builder = SettingsBuilder::new()
            .script(&self.script)
            .output_dir(&self.output_dir)
            .onefile(self.onefile)
            .windowed(self.windowed)
            .target(target);

        if let Some(icon) = &self.icon {
            builder = builder.icon(icon);
        }
        if let Some(name) = &self.name {
            builder = builder.name(name);
        }
        if let Some(python) = &self.python {
            builder = builder.python(python);
        }
        builder
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("kodegen_bundler_script").chain(argv.iter().copied()))
            .unwrap()
    }

    #[test]
    fn defaults() {
        let args = parse(&["app.py"]);
        assert_eq!(args.script, PathBuf::from("app.py"));
        assert_eq!(args.output_dir, PathBuf::from("dist"));
        assert!(!args.onefile && !args.windowed && !args.quiet);
        assert!(args.icon.is_none() && args.name.is_none() && args.report.is_none());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn parses_all_flags() {
        let args = parse(&[
            "app.py",
            "--output-dir",
            "build",
            "--onefile",
            "--windowed",
            "--icon",
            "app.ico",
            "--name",
            "demo",
            "--target",
            "windows",
            "--python",
            "/opt/py/bin/python3",
            "--report",
            "report.json",
        ]);
        assert_eq!(args.output_dir, PathBuf::from("build"));
        assert!(args.onefile && args.windowed);
        assert_eq!(args.icon, Some(PathBuf::from("app.ico")));
        assert_eq!(args.name.as_deref(), Some("demo"));
        assert_eq!(args.target, Some(Platform::Windows));
        assert_eq!(args.python, Some(PathBuf::from("/opt/py/bin/python3")));
        assert_eq!(args.report, Some(PathBuf::from("report.json")));
    }

    #[test]
    fn target_accepts_macos() {
        assert_eq!(parse(&["app.py", "-t", "macos"]).target, Some(Platform::MacOs));
    }

    #[test]
    fn missing_script_is_a_parse_error() {
        assert!(Args::try_parse_from(["kodegen_bundler_script"]).is_err());
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(parse(&["app.py", "--name", "  "]).validate().is_err());
    }

    #[test]
    fn report_inside_output_dir_is_rejected() {
        let args = parse(&["app.py", "--report", "dist/report.json"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn report_location_is_compared_after_normalising() {
        for report in ["./dist/r.json", "dist/./nested/../r.json"] {
            let args = parse(&["app.py", "--output-dir", "./dist/", "--report", report]);
            assert!(args.validate().is_err(), "{report}");
        }
        assert!(parse(&["app.py", "--report", "./dist/r.json"]).validate().is_err());
        let args = parse(&["app.py", "--report", "dist/../report.json"]);
        assert!(args.validate().is_ok());
        let args = parse(&["app.py", "--report", "distribution.json"]);
        assert!(args.validate().is_ok());
    }
}
