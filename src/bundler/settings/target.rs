//! Target platform profiles.

use serde::Serialize;
use std::fmt;

/// Operating system the package is built for.
///
/// Defaults to the host running the packager.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Windows: batch launchers, ZIP archives, `.ico` icons
    Windows,
    /// macOS: shell launchers, gzip tarballs, `.icns` icons and `.app` bundles
    #[value(name = "macos")]
    MacOs,
    /// Linux and other POSIX systems: shell launchers, gzip tarballs
    Linux,
}

impl Platform {
    /// Returns the platform of the running host.
    pub fn host() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Linux
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Windows => "windows",
            Self::MacOs => "macos",
            Self::Linux => "linux",
        })
    }
}

/// Launcher script syntax.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LauncherSyntax {
    /// `cmd.exe` batch file
    Batch,
    /// POSIX shell script
    Shell,
}

impl LauncherSyntax {
    /// File extension for launchers of this syntax.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Batch => "bat",
            Self::Shell => "sh",
        }
    }

    /// Line terminator expected by the interpreting shell.
    pub fn line_ending(self) -> &'static str {
        match self {
            Self::Batch => "\r\n",
            Self::Shell => "\n",
        }
    }

    /// Whether the generated file must carry executable permission bits.
    pub fn needs_exec_bit(self) -> bool {
        matches!(self, Self::Shell)
    }
}

/// Single-file archive format.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveFormat {
    /// Deflate-compressed ZIP
    Zip,
    /// gzip-compressed tar
    TarGz,
}

impl ArchiveFormat {
    /// File extension without leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::TarGz => "tar.gz",
        }
    }
}

/// Icon file format accepted by a platform.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IconFormat {
    /// Windows icon resource
    Ico,
    /// Apple icon image
    Icns,
}

impl IconFormat {
    /// File extension without leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Ico => "ico",
            Self::Icns => "icns",
        }
    }

    /// Case-insensitive extension check.
    pub fn matches(self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(self.extension()))
    }
}

/// Per-platform packaging strategy, selected once at startup.
///
/// Every stage reads its platform-dependent choices from this value instead
/// of branching on the host operating system.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct TargetProfile {
    /// Target operating system.
    pub platform: Platform,
    /// Launcher script syntax.
    pub launcher: LauncherSyntax,
    /// Single-file archive format.
    pub archive: ArchiveFormat,
    /// Icon format, `None` where the platform has no icon convention.
    pub icon: Option<IconFormat>,
}

impl TargetProfile {
    /// Profile for the given platform.
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Windows => Self {
                platform,
                launcher: LauncherSyntax::Batch,
                archive: ArchiveFormat::Zip,
                icon: Some(IconFormat::Ico),
            },
            Platform::MacOs => Self {
                platform,
                launcher: LauncherSyntax::Shell,
                archive: ArchiveFormat::TarGz,
                icon: Some(IconFormat::Icns),
            },
            Platform::Linux => Self {
                platform,
                launcher: LauncherSyntax::Shell,
                archive: ArchiveFormat::TarGz,
                icon: None,
            },
        }
    }

    /// Profile for the running host.
    pub fn host() -> Self {
        Self::for_platform(Platform::host())
    }

    /// File name of the embedded console interpreter.
    pub fn interpreter_file_name(&self) -> &'static str {
        match self.platform {
            Platform::Windows => "python.exe",
            _ => "python",
        }
    }

    /// File name of the windowed (console-less) interpreter, if the platform has one.
    pub fn windowed_interpreter_file_name(&self) -> Option<&'static str> {
        match self.platform {
            Platform::Windows => Some("pythonw.exe"),
            _ => None,
        }
    }

    /// Path separator used inside launcher scripts.
    pub fn path_separator(&self) -> char {
        match self.launcher {
            LauncherSyntax::Batch => '\\',
            LauncherSyntax::Shell => '/',
        }
    }
}

impl Default for TargetProfile {
    fn default() -> Self {
        Self::host()
    }
}
