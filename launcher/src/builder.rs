//! Build invocation for the application under management.
//!
//! This module invokes the build system for a selected profile from the
//! application root and surfaces its outcome. A non-zero build exit is
//! fatal and its code is preserved verbatim so the pipeline can forward
//! it unchanged.

use crate::error::{LauncherError, Result};
use crate::exec::CommandExecutor;
use crate::workdir::ScopedWorkdir;
use camino::Utf8Path;
use std::fmt;

/// A build configuration affecting optimisation and output location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Unoptimised build with debug assertions.
    Debug,
    /// Optimised build.
    Release,
}

impl Profile {
    /// Name of the profile's output subdirectory under `target/`.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Runs the build system for `profile` from `app_root`.
///
/// The working directory is changed for the duration of the build and
/// restored on every exit path via [`ScopedWorkdir`]. Build output is
/// streamed to the user's terminal unmodified.
///
/// # Errors
///
/// Returns [`LauncherError::BuildFailed`] carrying the build system's own
/// exit code when it exits non-zero, or an I/O error when the build
/// system cannot be spawned.
pub fn build(profile: Profile, app_root: &Utf8Path, executor: &dyn CommandExecutor) -> Result<()> {
    let _workdir = ScopedWorkdir::enter(app_root)?;

    let mut args = vec!["build"];
    if profile == Profile::Release {
        args.push("--release");
    }

    log::debug!("running cargo {args:?} in {app_root}");
    let status = executor.status("cargo", &args)?;

    if status.success() {
        Ok(())
    } else {
        Err(LauncherError::BuildFailed {
            code: status.code().unwrap_or(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ExpectedCall, StubExecutor, exit_status, success_output};
    use camino::Utf8PathBuf;
    use rstest::rstest;

    fn temp_app_root() -> (tempfile::TempDir, Utf8PathBuf) {
        let temp = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_owned()).expect("utf-8 path");
        (temp, root)
    }

    #[rstest]
    #[case::debug(Profile::Debug, &["build"])]
    #[case::release(Profile::Release, &["build", "--release"])]
    fn build_passes_profile_flags(#[case] profile: Profile, #[case] expected: &[&str]) {
        let _cwd = crate::test_utils::cwd_lock();
        let (_temp, root) = temp_app_root();
        let executor = StubExecutor::new(vec![ExpectedCall::new(
            "cargo",
            expected,
            Ok(success_output()),
        )]);

        build(profile, &root, &executor).expect("build should succeed");
        executor.assert_finished();
    }

    #[test]
    fn build_propagates_exit_code_verbatim() {
        let _cwd = crate::test_utils::cwd_lock();
        let (_temp, root) = temp_app_root();
        let executor = StubExecutor::new(vec![ExpectedCall::new(
            "cargo",
            &["build"],
            Ok(std::process::Output {
                status: exit_status(2),
                stdout: Vec::new(),
                stderr: Vec::new(),
            }),
        )]);

        let err = build(Profile::Debug, &root, &executor).expect_err("build should fail");
        assert!(matches!(err, LauncherError::BuildFailed { code: 2 }));
        executor.assert_finished();
    }

    #[test]
    fn build_restores_working_directory_on_failure() {
        let _cwd = crate::test_utils::cwd_lock();
        let before = std::env::current_dir().expect("current dir");
        let (_temp, root) = temp_app_root();
        let executor = StubExecutor::new(vec![ExpectedCall::new(
            "cargo",
            &["build"],
            Err(LauncherError::Io(std::io::Error::other("spawn failed"))),
        )]);

        let _ = build(Profile::Debug, &root, &executor);

        assert_eq!(std::env::current_dir().expect("current dir"), before);
    }
}
