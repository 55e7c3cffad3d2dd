//! Kodegen Bundler Fixup - makes macOS app bundles self-contained.
//!
//! This binary bundles the non-system libraries and Qt plugins of a built
//! application into its `.app`, signs it, and optionally creates a DMG.

use kodegen_bundler_fixup::cli;
use kodegen_bundler_fixup::cli::OutputManager;
use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    match cli::run().await {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            // Create output manager for error display (never quiet for fatal errors)
            let output = OutputManager::new(false, false);

            if let Some(tool_output) = e.tool_output() {
                output.tool_output(tool_output);
            }
            output.error(&format!("Fatal error: {e}"));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                output.error_detail("Recovery suggestions:");
                for suggestion in suggestions {
                    output.error_detail(&format!("  {suggestion}"));
                }
            }

            process::exit(e.exit_code());
        }
    }
}
