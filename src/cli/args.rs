//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap, with validation
//! and conversion into [`SettingsBuilder`].

use crate::bundler::{FixupConfig, SettingsBuilder};
use crate::error::{CliError, Result};
use clap::Parser;
use std::path::PathBuf;

/// Makes a CMake-built macOS app bundle self-contained
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_fixup",
    version,
    about = "Makes a CMake-built macOS app bundle self-contained",
    long_about = "Copies every non-system dylib and framework the application links against into \
its bundle, deploys the Qt plugins, rewrites load commands to @rpath, strips and re-signs the \
bundle, and optionally packs it into a DMG.

The Qt installation is read from CMakeCache.txt in the build directory.

Usage:
  kodegen_bundler_fixup build
  kodegen_bundler_fixup --dmg build
  kodegen_bundler_fixup --product-name MyApp --fallback-rpath /opt/homebrew/lib build

Exit code 0 = the bundle runs without the build machine's libraries."
)]
pub struct Args {
    /// CMake build directory containing <PRODUCT>.app and CMakeCache.txt
    #[arg(value_name = "BUILD_DIR")]
    pub build_dir: PathBuf,

    /// Also create <BUILD_DIR>/<PRODUCT>.dmg
    #[arg(long)]
    pub dmg: bool,

    /// Name of the bundle, its executable and the DMG volume [default: melonDS]
    #[arg(long, value_name = "NAME", env = "FIXUP_PRODUCT_NAME")]
    pub product_name: Option<String>,

    /// Qt plugin to deploy, relative to the plugin directory (repeatable)
    ///
    /// Replaces the default list: styles/libqmacstyle.dylib,
    /// platforms/libqcocoa.dylib, imageformats/libqsvg.dylib
    #[arg(long = "plugin", value_name = "CATEGORY/FILE")]
    pub plugins: Vec<String>,

    /// Extra directory searched for @rpath libraries (repeatable)
    ///
    /// Searched after /usr/local/lib and /opt/local/lib, before the Qt lib directory.
    #[arg(long = "fallback-rpath", value_name = "DIR")]
    pub fallback_rpaths: Vec<PathBuf>,

    /// codesign identity, "-" for an ad-hoc signature [default: -]
    #[arg(long, value_name = "IDENTITY", env = "FIXUP_SIGNING_IDENTITY")]
    pub signing_identity: Option<String>,

    /// TOML file with defaults for the options above
    #[arg(long, value_name = "FILE", env = "FIXUP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show per-step details
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(name) = &self.product_name
            && name.trim().is_empty()
        {
            return Err("Product name cannot be empty".to_string());
        }

        if let Some(plugin) = self
            .plugins
            .iter()
            .find(|plugin| PathBuf::from(plugin).components().count() != 2)
        {
            return Err(format!(
                "Invalid plugin: {}. Plugins are given as <category>/<file>",
                plugin
            ));
        }

        Ok(())
    }

    /// Builds a [`SettingsBuilder`] from the arguments, layering the config
    /// file underneath if one was given.
    pub fn settings_builder(&self) -> Result<SettingsBuilder> {
        self.validate()
            .map_err(|reason| CliError::InvalidArguments { reason })?;

        let mut builder = SettingsBuilder::new()
            .build_dir(&self.build_dir)
            .dmg(self.dmg)
            .plugins(self.plugins.clone())
            .extra_fallback_rpaths(self.fallback_rpaths.clone());

        if let Some(path) = &self.config {
            builder = builder.config(FixupConfig::load(path)?);
        }
        if let Some(name) = &self.product_name {
            builder = builder.product_name(name);
        }
        if let Some(identity) = &self.signing_identity {
            builder = builder.signing_identity(identity);
        }

        Ok(builder)
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }
}
