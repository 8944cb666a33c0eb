//! Command line interface for kodegen bundler.
//!
//! This module parses the arguments, runs the packaging pipeline and reports
//! the outcome to the user.

mod args;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;

use crate::{
    bundler::{BundleReport, Bundler, utils::fs},
    error::{CliError, Result, exit_code},
};
use std::path::Path;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    run_with(Args::parse_args()).await
}

/// Runs the pipeline for already parsed arguments.
pub async fn run_with(args: Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;
    let config = RuntimeConfig::from(&args);

    let settings = args.settings_builder().build()?;
    let report = Bundler::new(settings).bundle().await?;

    print_summary(&config, &report)?;

    if let Some(path) = &args.report {
        write_report(path, &report).await?;
        log::info!("Wrote report to {}", path.display());
    }

    Ok(exit_code::SUCCESS)
}

fn print_summary(config: &RuntimeConfig, report: &BundleReport) -> std::io::Result<()> {
    config.section(&format!("Package '{}' ({})", report.name, report.platform))?;
    config.indent(&format!("output:       {}", report.output_dir.display()))?;
    config.indent(&format!("launcher:     {}", report.launcher.display()))?;
    config.indent(&format!("interpreter:  {}", report.interpreter.display()))?;
    config.indent(&format!("dependencies: {}", report.dependencies.len()))?;

    if let Some(archive) = &report.archive {
        config.indent(&format!(
            "archive:      {} ({} bytes)",
            archive.path.display(),
            archive.size
        ))?;
    }
    if let Some(launcher) = &report.extract_launcher {
        config.indent(&format!("run archive:  {}", launcher.display()))?;
    }
    if let Some(artifact) = &report.platform_artifact {
        config.indent(&format!("platform:     {}", artifact.display()))?;
    }

    config.success(&format!("Packaged {} in {}", report.name, report.output_dir.display()))
}

async fn write_report(path: &Path, report: &BundleReport) -> Result<()> {
    let mut json = serde_json::to_vec_pretty(report)?;
    json.push(b'\n');
    fs::write_file(path, &json).await?;
    Ok(())
}
