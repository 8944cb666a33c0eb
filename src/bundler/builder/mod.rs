//! Bundle orchestration and coordination.
//!
//! This module provides the main [`Bundler`] orchestrator that runs the
//! packaging pipeline for one entry script.
//!
//! # Overview
//!
//! The bundler:
//! 1. Reads configuration from [`Settings`](crate::bundler::Settings)
//! 2. Stages the package layout next to the output directory
//! 3. Vendors dependencies, embeds the interpreter and writes the launcher
//! 4. Optionally packs a single-file archive with its own launcher
//! 5. Applies the platform icon step
//! 6. Commits the layout and returns a [`BundleReport`]
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 checksum calculation for archives and layouts
//! - [`orchestrator`] - Main [`Bundler`] struct and the staged pipeline
//! - [`report`] - Serializable run summary
//! - [`tool_detection`] - Interpreter discovery on `PATH`

mod checksum;
mod orchestrator;
mod report;
mod tool_detection;

pub use checksum::calculate_sha256;
pub use orchestrator::Bundler;
pub use report::{ArchiveArtifact, BundleReport, Stage};
pub use tool_detection::default_python;
