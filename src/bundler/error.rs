//! Error types for bundle fixup operations.
//!
//! Provides contextual error chaining, filesystem-specific errors with the
//! offending path attached, and dedicated variants for every precondition the
//! fixup pipeline checks.
//!
//! # Features
//!
//! - **Context trait**: Add context to errors similar to anyhow
//! - **ErrorExt trait**: Filesystem operations with automatic path context
//! - **bail! macro**: Early return with formatted error messages
//!
//! # Example
//!
//! ```no_run
//! use kodegen_bundler_fixup::bundler::{Context, ErrorExt, Result};
//! use std::path::Path;
//!
//! fn read_cache(path: &Path) -> Result<String> {
//!     let contents = std::fs::read_to_string(path)
//!         .fs_context("reading build cache", path)?;
//!
//!     contents
//!         .lines()
//!         .find(|line| line.starts_with("Qt6_DIR"))
//!         .map(str::to_string)
//!         .context("no Qt6_DIR entry")
//! }
//! ```

use std::{
    fmt::Display,
    io,
    path::{self, PathBuf},
};
use thiserror::Error as DeriveError;

/// Errors returned by the bundler.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// Error with context. Created by the [`Context`] trait.
    #[error("{0}: {1}")]
    Context(String, Box<Self>),

    /// File system error with path context.
    ///
    /// Created by the [`ErrorExt`] trait's `fs_context` method.
    #[error("{context} {path}: {error}")]
    Fs {
        /// Context describing the operation (e.g., "copying dylib")
        context: &'static str,
        /// Path that was being accessed
        path: PathBuf,
        /// The underlying I/O error
        error: io::Error,
    },

    /// An external command could not be spawned at all.
    #[error("failed to run command {command}: {error}")]
    CommandFailed {
        /// Command that failed to execute
        command: String,
        /// The underlying error
        error: io::Error,
    },

    /// An external command ran and exited unsuccessfully.
    ///
    /// `status` is the tool's own exit code and becomes the process exit code.
    #[error("{tool} exited with status {status}")]
    ToolFailed {
        /// Command line that was run
        tool: String,
        /// Exit status reported by the tool
        status: i32,
        /// Combined stdout and stderr of the tool
        output: String,
    },

    /// A required command-line tool is not on `PATH`.
    #[error("required tool `{0}` was not found in PATH")]
    MissingTool(&'static str),

    /// Generic I/O error.
    #[error("{0}")]
    IoError(#[from] io::Error),

    /// Error walking a directory tree.
    #[error("{0}")]
    WalkdirError(#[from] walkdir::Error),

    /// Path prefix stripping error.
    #[error("{0}")]
    StripError(#[from] path::StripPrefixError),

    /// Invalid glob pattern.
    #[error("{0}")]
    GlobPattern(#[from] glob::PatternError),

    /// Glob iteration error.
    #[error("{0}")]
    Glob(#[from] glob::GlobError),

    /// Regular expression error.
    #[error("{0}")]
    RegexError(#[from] regex::Error),

    /// Config file parsing error.
    #[error("{0}")]
    TomlError(#[from] toml::de::Error),

    /// Mach-O parsing error.
    #[error("binary parse error: {0}")]
    BinaryParseError(#[from] goblin::error::Error),

    /// The build directory is missing or is not a finished build.
    #[error("{reason}")]
    InvalidBuildDirectory {
        /// Build directory that was given
        path: PathBuf,
        /// Human readable reason
        reason: String,
    },

    /// The build cache has no `Qt<N>_DIR:PATH=` entry.
    #[error("no Qt<N>_DIR:PATH entry found in {0}")]
    ToolkitNotFound(PathBuf),

    /// None of the Qt plugin directory candidates exist.
    #[error("couldn't find Qt plugins, tried looking for: {}", format_candidates(.tried))]
    PluginsNotFound {
        /// Every candidate that was checked, in order
        tried: Vec<PathBuf>,
    },

    /// The walker was asked to process a binary that is not on disk.
    #[error("cannot fix up {0}: file does not exist")]
    MissingBinary(PathBuf),

    /// A load command could not be resolved to an existing file.
    #[error("cannot resolve `{reference}` referenced by {}", .binary.display())]
    UnresolvedReference {
        /// Reference as recorded in the binary
        reference: String,
        /// Binary whose context was used for resolution
        binary: PathBuf,
    },

    /// The executable's search paths did not converge to the canonical entry.
    #[error("search paths of {} are {found:?} after normalization", .binary.display())]
    RpathNormalization {
        /// Executable that was normalized
        binary: PathBuf,
        /// Entries read back after normalization
        found: Vec<String>,
    },

    /// Generic error with custom message.
    #[error("{0}")]
    GenericError(String),
}

fn format_candidates(tried: &[PathBuf]) -> String {
    tried
        .iter()
        .map(|p| format!("\n - {}", p.display()))
        .collect()
}

/// Convenient type alias for Result.
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for adding context to errors.
///
/// Similar to `anyhow::Context` but integrated with the bundler's Error type.
/// Works with both `Result<T, E>` and `Option<T>`.
pub trait Context<T> {
    /// Add context to an error.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Add context to an error using a closure (lazy evaluation).
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context(context.to_string(), Box::new(e)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::Context(f().to_string(), Box::new(e)))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

/// Extension trait for filesystem operations with automatic path context.
pub trait ErrorExt<T> {
    /// Add filesystem context to an I/O error.
    ///
    /// The `context` should be a present-tense verb phrase describing the operation,
    /// e.g., "reading file", "creating directory", "copying dylib".
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

impl Error {
    /// Returns the innermost error, looking through [`Error::Context`] wrappers.
    pub fn root(&self) -> &Self {
        match self {
            Self::Context(_, inner) => inner.root(),
            other => other,
        }
    }
}

/// Macro for early return with error.
///
/// Converts the message into a [`Error::GenericError`] and returns immediately.
///
/// ```ignore
/// bail!("operation failed");
/// bail!("invalid value: {}", value);
/// ```
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::bundler::error::Error::GenericError($msg.into()))
    };
    ($err:expr $(,)?) => {
        return Err($crate::bundler::error::Error::GenericError($err.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::bundler::error::Error::GenericError(format!($fmt, $($arg)*)))
    };
}
