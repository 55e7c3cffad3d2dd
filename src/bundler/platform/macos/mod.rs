//! macOS `.app` bundle fixup.
//!
//! The pipeline steps, in the order [`Fixup`](crate::bundler::Fixup) runs
//! them:
//!
//! 1. [`layout`] - locate the bundle in the build directory
//! 2. [`dylib`] - bundle the executable's library closure
//! 3. [`plugins`] - deploy and fix up the Qt plugins
//! 4. [`rpath`] - normalize the executable's search paths
//! 5. [`sign`] - drop framework headers and sign
//! 6. [`dmg`] - optionally build a disk image

pub mod dmg;
pub mod dylib;
pub mod layout;
pub mod plugins;
pub mod rpath;
pub mod sign;
