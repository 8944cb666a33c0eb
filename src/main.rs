//! Kodegen Bundler Script - self-contained packages for Python entry scripts.
//!
//! This binary copies the entry script, vendors its dependencies, embeds the
//! interpreter and generates the launchers, with a stable exit code per
//! failure class.

use kodegen_bundler_script::cli;
use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            for suggestion in e.recovery_suggestions() {
                eprintln!("  hint: {}", suggestion);
            }
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
