//! External command execution.

use crate::bundler::error::{Error, Result};
use std::ffi::OsStr;
use std::process::Output;
use tokio::process::Command;

/// Captured result of a finished command.
#[derive(Debug)]
pub struct ToolOutput {
    /// Command line, for messages.
    pub command: String,
    /// Exit code, `None` if killed by a signal.
    pub status: Option<i32>,
    /// stdout followed by stderr.
    pub output: String,
}

impl ToolOutput {
    /// Whether the command exited with status 0.
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Converts a failed run into [`Error::ToolFailed`].
    pub fn into_result(self) -> Result<String> {
        if self.success() {
            return Ok(self.output);
        }
        Err(Error::ToolFailed {
            tool: self.command,
            status: self.status.unwrap_or(1),
            output: self.output,
        })
    }
}

/// Runs a command to completion and captures its output whatever the status.
///
/// Only a failure to spawn is an error.
pub async fn capture<I, S>(program: &str, args: I) -> Result<ToolOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<S> = args.into_iter().collect();
    let command = describe(program, &args);
    log::debug!("Running {}", command);

    let output = Command::new(program)
        .args(&args)
        .output()
        .await
        .map_err(|error| Error::CommandFailed {
            command: command.clone(),
            error,
        })?;

    Ok(ToolOutput {
        command,
        status: output.status.code(),
        output: combined_output(&output),
    })
}

/// Runs a command and fails with [`Error::ToolFailed`] on a non-zero exit.
pub async fn run<I, S>(program: &str, args: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    capture(program, args).await?.into_result()
}

fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

fn describe<S: AsRef<OsStr>>(program: &str, args: &[S]) -> String {
    let mut command = program.to_string();
    for arg in args {
        command.push(' ');
        command.push_str(&arg.as_ref().to_string_lossy());
    }
    command
}
