//! Prerequisite detection for required build tools.
//!
//! Each required tool is represented by a [`Prober`] implementation that
//! knows how to check whether the tool resolves on the current session
//! path. A missing tool is a normal outcome, never an error, and probing
//! has no side effects, so the check is safe to repeat before and after
//! installation.

use crate::exec::{CommandExecutor, command_succeeds};

/// Capability probe for one required tool.
pub trait Prober {
    /// Name of the tool this probe covers.
    fn tool(&self) -> &'static str;

    /// Returns true when the tool resolves on the current session path.
    fn is_resolvable(&self, executor: &dyn CommandExecutor) -> bool;
}

/// Probes the Rust build frontend.
#[derive(Debug, Clone, Copy, Default)]
pub struct CargoProber;

impl Prober for CargoProber {
    fn tool(&self) -> &'static str {
        "cargo"
    }

    fn is_resolvable(&self, executor: &dyn CommandExecutor) -> bool {
        command_succeeds(executor, "cargo", &["--version"])
    }
}

/// Probes the C toolchain used for linker support.
#[derive(Debug, Clone, Copy, Default)]
pub struct GccProber;

impl Prober for GccProber {
    fn tool(&self) -> &'static str {
        "gcc"
    }

    fn is_resolvable(&self, executor: &dyn CommandExecutor) -> bool {
        command_succeeds(executor, "gcc", &["--version"])
    }
}

/// Returns the fixed set of probes for tools meterbar needs, in the order
/// they are installed (toolchain frontend before linker support).
#[must_use]
pub fn default_probers() -> Vec<Box<dyn Prober>> {
    vec![Box::new(CargoProber), Box::new(GccProber)]
}

/// Resolvability of each required tool at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrerequisiteStatus {
    entries: Vec<(&'static str, bool)>,
}

impl PrerequisiteStatus {
    /// Returns true when every required tool is resolvable.
    #[must_use]
    pub fn all_resolvable(&self) -> bool {
        self.entries.iter().all(|(_, ok)| *ok)
    }

    /// Names of the tools that are currently missing, in install order.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|(_, ok)| !*ok)
            .map(|(tool, _)| *tool)
            .collect()
    }

    /// Number of required tools covered by this status.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no tools are covered (empty requirement list).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Probes each requirement against the current session path.
///
/// Never fails for a missing tool and performs no side effects of its
/// own, so callers may invoke it both before and after installation.
#[must_use]
pub fn check(probers: &[Box<dyn Prober>], executor: &dyn CommandExecutor) -> PrerequisiteStatus {
    let entries = probers
        .iter()
        .map(|p| (p.tool(), p.is_resolvable(executor)))
        .collect();
    PrerequisiteStatus { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ExpectedCall, StubExecutor, failure_output, success_output};
    use rstest::rstest;

    fn probe_call(cmd: &str, ok: bool) -> ExpectedCall {
        ExpectedCall::new(
            cmd,
            &["--version"],
            Ok(if ok {
                success_output()
            } else {
                failure_output("not found")
            }),
        )
    }

    #[rstest]
    #[case::both_present(true, true, vec![])]
    #[case::cargo_missing(false, true, vec!["cargo"])]
    #[case::gcc_missing(true, false, vec!["gcc"])]
    #[case::both_missing(false, false, vec!["cargo", "gcc"])]
    fn check_reports_missing_tools(
        #[case] cargo_ok: bool,
        #[case] gcc_ok: bool,
        #[case] expected_missing: Vec<&'static str>,
    ) {
        let executor = StubExecutor::new(vec![
            probe_call("cargo", cargo_ok),
            probe_call("gcc", gcc_ok),
        ]);

        let status = check(&default_probers(), &executor);

        assert_eq!(status.missing(), expected_missing);
        assert_eq!(status.all_resolvable(), expected_missing.is_empty());
        executor.assert_finished();
    }

    #[test]
    fn probe_failure_to_spawn_counts_as_missing() {
        let executor = StubExecutor::new(vec![
            ExpectedCall::new(
                "cargo",
                &["--version"],
                Err(crate::error::LauncherError::Io(std::io::Error::other(
                    "no such file",
                ))),
            ),
            probe_call("gcc", true),
        ]);

        let status = check(&default_probers(), &executor);

        assert_eq!(status.missing(), vec!["cargo"]);
        executor.assert_finished();
    }

    #[test]
    fn check_is_repeatable() {
        let executor = StubExecutor::new(vec![
            probe_call("cargo", false),
            probe_call("gcc", true),
            probe_call("cargo", true),
            probe_call("gcc", true),
        ]);
        let probers = default_probers();

        let before = check(&probers, &executor);
        let after = check(&probers, &executor);

        assert_eq!(before.missing(), vec!["cargo"]);
        assert!(after.all_resolvable());
        executor.assert_finished();
    }
}
