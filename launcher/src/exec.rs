//! External command execution for the launcher.
//!
//! This module provides the [`CommandExecutor`] abstraction used by
//! prerequisite probes, the installer, the build stage, and the final
//! launch. Tests substitute a stub executor so no real processes run.

use crate::error::{LauncherError, Result};
use std::process::{Command, ExitStatus, Output, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Abstraction for running external commands.
pub trait CommandExecutor {
    /// Runs a command with arguments and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the
    /// command.
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output>;

    /// Runs a command with inherited stdio and waits for it to terminate.
    ///
    /// Used for the build system and the launched application, where the
    /// child's own output should reach the user directly.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or waiting.
    fn status(&self, cmd: &str, args: &[&str]) -> Result<ExitStatus>;

    /// Runs a command with inherited stdio, killing it if `timeout` elapses.
    ///
    /// Used for vendor installers, whose runtime must be bounded. Returns
    /// `None` when the deadline passed and the child was killed.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or waiting.
    fn status_bounded(
        &self,
        cmd: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Option<ExitStatus>>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        Command::new(cmd)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(LauncherError::from)
    }

    fn status(&self, cmd: &str, args: &[&str]) -> Result<ExitStatus> {
        Command::new(cmd)
            .args(args)
            .status()
            .map_err(LauncherError::from)
    }

    fn status_bounded(
        &self,
        cmd: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Option<ExitStatus>> {
        let mut child = Command::new(cmd).args(args).spawn()?;

        match child.wait_timeout(timeout)? {
            Some(status) => Ok(Some(status)),
            None => {
                child.kill()?;
                child.wait()?;
                Ok(None)
            }
        }
    }
}

/// Returns true if the given command executes successfully.
#[must_use]
pub fn command_succeeds(executor: &dyn CommandExecutor, cmd: &str, args: &[&str]) -> bool {
    executor.run(cmd, args).is_ok_and(|o| o.status.success())
}

/// Extracts a trimmed stderr message from a captured output.
///
/// Falls back to a generic message when stderr is empty.
#[must_use]
pub fn stderr_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        "unknown error".to_owned()
    } else {
        trimmed.to_owned()
    }
}
