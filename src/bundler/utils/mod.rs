//! Shared helpers for filesystem work and external commands.

pub mod fs;
pub mod process;
