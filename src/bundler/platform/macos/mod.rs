//! macOS application bundle (.app) creation.

mod app;

pub use app::{APP_ICON_FILE, InfoPlist, bundle_project};
