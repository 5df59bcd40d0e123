//! Shared test utilities for the launcher crate.
//!
//! Provides a scripted [`StubExecutor`] so tests can verify command
//! execution without side effects, plus in-memory fakes for the
//! environment and directory abstractions.

use crate::dirs::BaseDirs;
use crate::error::Result;
use crate::exec::CommandExecutor;
use crate::path_registry::EnvPaths;
use camino::Utf8PathBuf;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::process::{ExitStatus, Output};
use std::sync::{Mutex, MutexGuard, OnceLock};
use std::time::Duration;

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// Creates a successful command `Output` with empty stdout and stderr.
#[must_use]
pub fn success_output() -> Output {
    output_with_code(0)
}

/// Creates a command `Output` exiting with the given code.
#[must_use]
pub fn output_with_code(code: i32) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
#[must_use]
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Serialises tests that change the process working directory.
///
/// # Panics
///
/// Never panics; a poisoned lock from a failed test is recovered.
pub fn cwd_lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(Mutex::default)
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Represents an expected command invocation for testing.
#[derive(Debug)]
pub struct ExpectedCall {
    /// The command to execute (e.g. "cargo").
    pub cmd: String,
    /// The arguments to pass to the command.
    pub args: Vec<String>,
    /// The result to return when this command is invoked.
    pub result: Result<Output>,
}

impl ExpectedCall {
    /// Creates an expected call from string slices.
    #[must_use]
    pub fn new(cmd: &str, args: &[&str], result: Result<Output>) -> Self {
        Self {
            cmd: cmd.to_owned(),
            args: args.iter().map(|&a| a.to_owned()).collect(),
            result,
        }
    }
}

/// A scripted implementation of `CommandExecutor` for testing.
///
/// Records expected command invocations and returns predefined results,
/// allowing tests to verify command execution without side effects. The
/// `status` and `status_bounded` methods derive their result from the
/// scripted output's exit status.
#[derive(Debug, Default)]
pub struct StubExecutor {
    expected: RefCell<VecDeque<ExpectedCall>>,
}

impl StubExecutor {
    /// Creates a new `StubExecutor` with the given expected calls.
    #[must_use]
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: RefCell::new(expected.into()),
        }
    }

    /// Asserts that all expected command invocations have been consumed.
    ///
    /// # Panics
    ///
    /// Panics if there are remaining expected calls that were not invoked.
    pub fn assert_finished(&self) {
        assert!(
            self.expected.borrow().is_empty(),
            "expected no further command invocations"
        );
    }

    fn pop(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        let mut expected = self.expected.borrow_mut();
        let call = expected.pop_front().expect("unexpected command invocation");

        assert_eq!(call.cmd, cmd);
        assert_eq!(call.args, args);

        call.result
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        self.pop(cmd, args)
    }

    fn status(&self, cmd: &str, args: &[&str]) -> Result<ExitStatus> {
        self.pop(cmd, args).map(|o| o.status)
    }

    fn status_bounded(
        &self,
        cmd: &str,
        args: &[&str],
        _timeout: Duration,
    ) -> Result<Option<ExitStatus>> {
        self.pop(cmd, args).map(|o| Some(o.status))
    }
}

/// In-memory environment path state for exercising registry behaviour.
#[derive(Debug, Default)]
pub struct FakeEnvPaths {
    session: RefCell<String>,
    persisted: RefCell<String>,
}

impl FakeEnvPaths {
    /// Creates empty fake path state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates fake path state with an initial session path.
    #[must_use]
    pub fn with_session(session: &str) -> Self {
        Self {
            session: RefCell::new(session.to_owned()),
            persisted: RefCell::new(String::new()),
        }
    }
}

impl EnvPaths for FakeEnvPaths {
    fn session_path(&self) -> String {
        self.session.borrow().clone()
    }

    fn set_session_path(&self, value: &str) -> Result<()> {
        *self.session.borrow_mut() = value.to_owned();
        Ok(())
    }

    fn persisted_user_path(&self) -> Result<String> {
        Ok(self.persisted.borrow().clone())
    }

    fn set_persisted_user_path(&self, value: &str) -> Result<()> {
        *self.persisted.borrow_mut() = value.to_owned();
        Ok(())
    }
}

/// Directory resolution rooted in a temporary directory.
#[derive(Debug, Clone)]
pub struct FakeDirs {
    /// Value returned for the cargo bin directory.
    pub cargo_bin: Utf8PathBuf,
    /// Value returned for the tools directory.
    pub tools: Utf8PathBuf,
    /// Value returned for the download cache directory.
    pub download: Utf8PathBuf,
}

impl FakeDirs {
    /// Creates fake directories under `root` (typically a temp dir).
    #[must_use]
    pub fn under(root: &camino::Utf8Path) -> Self {
        Self {
            cargo_bin: root.join("cargo").join("bin"),
            tools: root.join("tools"),
            download: root.join("downloads"),
        }
    }
}

impl BaseDirs for FakeDirs {
    fn cargo_bin_dir(&self) -> Option<Utf8PathBuf> {
        Some(self.cargo_bin.clone())
    }

    fn tools_dir(&self) -> Option<Utf8PathBuf> {
        Some(self.tools.clone())
    }

    fn download_dir(&self) -> Utf8PathBuf {
        self.download.clone()
    }
}
