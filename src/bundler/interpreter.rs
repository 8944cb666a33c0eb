//! Interpreter embedding.
//!
//! Copies the interpreter used for packaging into the layout. The binary is
//! copied as-is; whether it runs on the target machine is not checked.

use super::{
    error::Result,
    layout::PackageLayout,
    settings::Settings,
    utils::fs,
};
use std::path::PathBuf;

/// Interpreter executables placed in the layout.
#[derive(Clone, Debug)]
pub struct EmbeddedInterpreter {
    /// Console interpreter, always present.
    pub console: PathBuf,
    /// Console-less interpreter, present only for windowed Windows packages.
    pub windowed: Option<PathBuf>,
}

/// Copies the interpreter into `<layout>/python/`.
///
/// For windowed Windows packages a `pythonw.exe` found next to the
/// interpreter is copied as well.
pub async fn embed_interpreter(
    settings: &Settings,
    layout: &PackageLayout,
) -> Result<EmbeddedInterpreter> {
    log::info!("Copying interpreter {}", settings.python().display());

    let target = settings.target();
    let interpreter_dir = layout.interpreter_dir();
    fs::create_dir_all(&interpreter_dir).await?;

    let console = interpreter_dir.join(target.interpreter_file_name());
    fs::copy_file(settings.python(), &console).await?;
    fs::set_executable(&console).await?;

    let windowed = match (settings.windowed(), target.windowed_interpreter_file_name()) {
        (true, Some(file_name)) => {
            let source = settings
                .python()
                .parent()
                .map(|dir| dir.join(file_name))
                .filter(|p| p.is_file());
            match source {
                Some(source) => {
                    let dest = interpreter_dir.join(file_name);
                    fs::copy_file(&source, &dest).await?;
                    Some(dest)
                }
                None => {
                    log::warn!(
                        "--windowed requested but no {} next to {}; the launcher will open a console",
                        file_name,
                        settings.python().display()
                    );
                    None
                }
            }
        }
        (true, None) => {
            log::debug!(
                "--windowed has no effect for {} shell launchers",
                target.platform
            );
            None
        }
        (false, _) => None,
    };

    Ok(EmbeddedInterpreter { console, windowed })
}
