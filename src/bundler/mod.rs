//! Script packaging pipeline.
//!
//! Turns one entry script into a self-contained directory holding the script,
//! its vendored dependencies, a copy of the interpreter and a launcher, with
//! optional single-file archive and platform icon handling.
//!
//! Start with [`SettingsBuilder`], then run [`Bundler::bundle`].

pub mod archive;
pub mod builder;
pub mod deps;
pub mod error;
pub mod interpreter;
pub mod launcher;
pub mod layout;
pub mod platform;
pub mod settings;
pub mod utils;

pub use builder::{ArchiveArtifact, BundleReport, Bundler, Stage};
pub use deps::{DependencyManifest, Requirement};
pub use error::{Error, Result};
pub use layout::PackageLayout;
pub use settings::{
    ArchiveFormat, IconFormat, LauncherSyntax, Platform, Settings, SettingsBuilder,
    TargetProfile,
};
