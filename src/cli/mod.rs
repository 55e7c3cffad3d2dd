//! Command line interface for the bundle fixup.
//!
//! This module provides the CLI entry point: argument parsing, settings
//! assembly, running the pipeline and reporting what it did.

mod args;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;

use crate::bundler::{Fixup, FixupReport};
use crate::error::Result;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    run_with(&args).await
}

/// Runs the fixup for already parsed arguments.
pub async fn run_with(args: &Args) -> Result<i32> {
    let config = RuntimeConfig::from(args);
    let output = config.output();

    let settings = args.settings_builder()?.build()?;

    output.progress(&format!(
        "Fixing up {}.app in {}",
        settings.product_name(),
        settings.build_dir().display()
    ))?;
    if settings.macos().is_ad_hoc() {
        output.verbose("Using an ad-hoc signature")?;
    }

    let report = Fixup::new(settings).run().await?;
    print_report(output, &report)?;

    Ok(0)
}

fn print_report(output: &OutputManager, report: &FixupReport) -> std::io::Result<()> {
    output.verbose(&format!(
        "Qt {} at {}",
        report.toolkit.major,
        report.toolkit.root.display()
    ))?;

    output.success(&format!(
        "Bundled {} libraries and frameworks",
        report.bundled.len()
    ))?;
    for path in &report.bundled {
        output.verbose(&path.display().to_string())?;
    }

    output.success(&format!("Deployed {} plugins", report.plugins.len()))?;
    for path in &report.plugins {
        output.indent(&path.display().to_string())?;
    }

    if report.bundled.is_empty() {
        output.warn("No libraries needed bundling; was the bundle already fixed up?")?;
    }

    output.success(&format!("Signed {}", report.layout.bundle().display()))?;

    if let Some(dmg) = &report.dmg {
        output.success(&format!("Created {}", dmg.display()))?;
    }

    Ok(())
}
