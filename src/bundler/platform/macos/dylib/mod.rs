//! Dynamic library dependency discovery and bundling for macOS .app bundles.
//!
//! Starting from a binary, every non-system library it links against is
//! resolved the way dyld would resolve it, copied into `Contents/Frameworks`
//! and referenced through `@rpath`. Copies are processed the same way until
//! the closure is complete.
//!
//! - [`reference`]: classifying and resolving load-command strings
//! - [`tools`]: reading and rewriting Mach-O load commands
//! - [`walker`]: the recursive walk itself

pub mod reference;
pub mod tools;
pub mod walker;

pub use reference::{
    FrameworkPath, ReferenceKind, Resolution, ResolveContext, ResolvedDependency,
    is_system_library,
};
pub use tools::{BinaryTools, LinkedLibraries, XcodeTools};
pub use walker::DylibWalker;
