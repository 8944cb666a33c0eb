//! Summary of a completed packaging run.

use crate::bundler::{deps::Requirement, settings::Platform};
use serde::Serialize;
use std::{fmt, path::PathBuf};

/// Pipeline stage, recorded in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Entry script copied into the layout.
    CopyScript,
    /// Manifest inferred and dependencies vendored.
    ResolveDependencies,
    /// Interpreter copied into the layout.
    EmbedInterpreter,
    /// Primary launcher written.
    GenerateLauncher,
    /// Single-file archive written.
    PackageArchive,
    /// Extract-and-run launcher written.
    GenerateExtractLauncher,
    /// Icon handled for the target platform.
    PlatformBundle,
    /// Staged layout moved into the output directory.
    Commit,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CopyScript => "copy script",
            Self::ResolveDependencies => "resolve dependencies",
            Self::EmbedInterpreter => "embed interpreter",
            Self::GenerateLauncher => "generate launcher",
            Self::PackageArchive => "package archive",
            Self::GenerateExtractLauncher => "generate extract launcher",
            Self::PlatformBundle => "platform bundle",
            Self::Commit => "commit",
        };
        f.write_str(s)
    }
}

/// The single-file archive produced in onefile mode.
#[derive(Clone, Debug, Serialize)]
pub struct ArchiveArtifact {
    /// Archive path.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Hex SHA-256 of the archive.
    pub sha256: String,
}

/// Everything a run produced. All paths are final locations.
#[derive(Clone, Debug, Serialize)]
pub struct BundleReport {
    /// Package name.
    pub name: String,
    /// Target the package was built for.
    pub platform: Platform,
    /// Committed package directory.
    pub output_dir: PathBuf,
    /// Primary launcher.
    pub launcher: PathBuf,
    /// Embedded console interpreter.
    pub interpreter: PathBuf,
    /// Manifest entries, in file order.
    pub dependencies: Vec<Requirement>,
    /// Single-file archive, in onefile mode.
    pub archive: Option<ArchiveArtifact>,
    /// Extract-and-run launcher beside the archive, in onefile mode.
    pub extract_launcher: Option<PathBuf>,
    /// `.app` bundle or copied `.ico`, when the icon step produced one.
    pub platform_artifact: Option<PathBuf>,
    /// Digest over the layout's structure, permissions and contents.
    pub layout_sha256: String,
    /// Stages that completed.
    pub stages: Vec<Stage>,
}
