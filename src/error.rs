//! Comprehensive error types for fixup operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use crate::bundler::Error as BundleError;
use thiserror::Error;

/// Result type alias for fixup operations
pub type Result<T> = std::result::Result<T, FixupError>;

/// Main error type for all fixup operations
#[derive(Error, Debug)]
pub enum FixupError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bundle fixup errors
    #[error("{0}")]
    Bundler(#[from] BundleError),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl FixupError {
    /// Process exit code for this error.
    ///
    /// A failed external tool passes its own status through; everything
    /// else is 1.
    pub fn exit_code(&self) -> i32 {
        match self.bundler_root() {
            Some(BundleError::ToolFailed { status, .. }) if *status != 0 => *status,
            _ => 1,
        }
    }

    /// Output of the failed external tool, if that is what went wrong.
    pub fn tool_output(&self) -> Option<&str> {
        match self.bundler_root() {
            Some(BundleError::ToolFailed { output, .. }) if !output.trim().is_empty() => {
                Some(output.as_str())
            }
            _ => None,
        }
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        let Some(root) = self.bundler_root() else {
            return match self {
                Self::Cli(_) => vec!["Run with --help to see the accepted options".to_string()],
                _ => vec!["Check the error message above for specific details".to_string()],
            };
        };

        match root {
            BundleError::InvalidBuildDirectory { .. } => vec![
                "Pass the CMake build directory that contains the .app bundle".to_string(),
                "Build the project first so CMakeCache.txt and the bundle exist".to_string(),
                "Use --product-name if the bundle is not named melonDS.app".to_string(),
            ],
            BundleError::TomlError(_) => vec![
                "Check the config file against the documented keys".to_string(),
            ],
            BundleError::ToolkitNotFound(_) => vec![
                "Configure the build against Qt so the cache records Qt<N>_DIR".to_string(),
            ],
            BundleError::PluginsNotFound { .. } => vec![
                "Check that the Qt installation recorded in CMakeCache.txt still exists"
                    .to_string(),
            ],
            BundleError::MissingTool(_) | BundleError::CommandFailed { .. } => vec![
                "Install the Xcode command-line tools: xcode-select --install".to_string(),
            ],
            BundleError::UnresolvedReference { .. } => vec![
                "Install the missing library or add its directory with --fallback-rpath"
                    .to_string(),
            ],
            BundleError::ToolFailed { .. } | BundleError::RpathNormalization { .. } => vec![
                "Rebuild into a clean build directory and run the fixup again".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    fn bundler_root(&self) -> Option<&BundleError> {
        match self {
            Self::Bundler(e) => Some(e.root()),
            _ => None,
        }
    }
}
