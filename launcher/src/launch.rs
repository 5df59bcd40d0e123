//! Launching the resolved application binary.
//!
//! Composes the final argument vector, starts the binary, waits for it to
//! terminate, and forwards its exit code unchanged so shell scripts and
//! CI can detect application failures through the launcher.

use crate::cli::RunConfig;
use crate::error::{LauncherError, Result};
use crate::exec::CommandExecutor;
use camino::Utf8Path;

/// Fixed subcommand the application is always started with.
pub const LAUNCH_SUBCOMMAND: &str = "tray";

/// Verbosity token injected ahead of the subcommand when requested.
pub const VERBOSE_FLAG: &str = "--verbose";

/// Composes the argument vector for the launched application.
///
/// The vector is the fixed subcommand token, prefixed with the verbosity
/// token when `config.verbose` is set.
#[must_use]
pub fn launch_args(config: &RunConfig) -> Vec<&'static str> {
    if config.verbose {
        vec![VERBOSE_FLAG, LAUNCH_SUBCOMMAND]
    } else {
        vec![LAUNCH_SUBCOMMAND]
    }
}

/// Starts `binary` with the composed arguments and waits for it to exit.
///
/// Returns the application's exit code unchanged. An exit without a code
/// (killed by a signal) is reported as 1.
///
/// # Errors
///
/// Returns [`LauncherError::LaunchFailed`] when the binary exists but
/// cannot be started, e.g. because of missing execute permissions.
pub fn launch(binary: &Utf8Path, config: &RunConfig, executor: &dyn CommandExecutor) -> Result<i32> {
    let args = launch_args(config);
    log::debug!("launching {binary} with args {args:?}");

    let status = executor
        .status(binary.as_str(), &args)
        .map_err(|e| LauncherError::LaunchFailed {
            path: binary.to_owned(),
            reason: e.to_string(),
        })?;

    Ok(status.code().unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ExpectedCall, StubExecutor, output_with_code};
    use rstest::rstest;

    const fn config(verbose: bool) -> RunConfig {
        RunConfig {
            release: false,
            skip_build: false,
            verbose,
        }
    }

    #[rstest]
    #[case::verbose(true, vec![VERBOSE_FLAG, LAUNCH_SUBCOMMAND])]
    #[case::normal(false, vec![LAUNCH_SUBCOMMAND])]
    fn argument_vector_composition(#[case] verbose: bool, #[case] expected: Vec<&'static str>) {
        assert_eq!(launch_args(&config(verbose)), expected);
    }

    #[rstest]
    #[case::success(0)]
    #[case::failure(3)]
    fn exit_code_is_forwarded_unchanged(#[case] code: i32) {
        let executor = StubExecutor::new(vec![ExpectedCall::new(
            "/opt/meterbar/target/debug/meterbar",
            &[LAUNCH_SUBCOMMAND],
            Ok(output_with_code(code)),
        )]);

        let exit = launch(
            Utf8Path::new("/opt/meterbar/target/debug/meterbar"),
            &config(false),
            &executor,
        )
        .expect("launch");

        assert_eq!(exit, code);
        executor.assert_finished();
    }

    #[test]
    fn spawn_failure_becomes_launch_failed() {
        let executor = StubExecutor::new(vec![ExpectedCall::new(
            "/opt/meterbar/target/debug/meterbar",
            &[LAUNCH_SUBCOMMAND],
            Err(LauncherError::Io(std::io::Error::other(
                "permission denied",
            ))),
        )]);

        let err = launch(
            Utf8Path::new("/opt/meterbar/target/debug/meterbar"),
            &config(false),
            &executor,
        )
        .expect_err("launch must fail");

        let LauncherError::LaunchFailed { path, reason } = err else {
            panic!("expected LaunchFailed, got {err}");
        };
        assert_eq!(path, Utf8Path::new("/opt/meterbar/target/debug/meterbar"));
        assert!(reason.contains("permission denied"));
        executor.assert_finished();
    }
}
