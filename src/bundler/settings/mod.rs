//! Configuration structures for packaging operations.
//!
//! This module provides the immutable [`Settings`] for one invocation, the
//! [`SettingsBuilder`] that validates them, and the [`TargetProfile`]
//! strategy that carries every platform-dependent choice.

mod builder;
mod core;
mod target;

// Re-export all public types
pub use builder::SettingsBuilder;
pub use core::Settings;
pub use target::{ArchiveFormat, IconFormat, LauncherSyntax, Platform, TargetProfile};
