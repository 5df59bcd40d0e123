//! CLI argument definitions for the meterbar launcher.
//!
//! This module defines the command-line interface using clap. It is
//! separated from the main entrypoint to keep the binary small and
//! focused on orchestration.

use crate::builder::Profile;
use camino::Utf8PathBuf;
use clap::Parser;

/// Bootstrap and launch the meterbar desktop client.
#[derive(Parser, Debug, Clone)]
#[command(name = "meterbar-launcher")]
#[command(version, about)]
#[command(long_about = concat!(
    "Bootstrap and launch the meterbar desktop client.\n\n",
    "The launcher verifies that the build tools meterbar needs are available, ",
    "installs any that are missing, builds the application in the selected ",
    "profile, locates the resulting binary, and starts it. The launcher's own ",
    "exit code equals the launched application's exit code, so failures can ",
    "be detected from shell scripts and CI.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Build a debug binary and launch it:\n",
    "    $ meterbar-launcher\n\n",
    "  Build and launch the release profile:\n",
    "    $ meterbar-launcher --release\n\n",
    "  Launch an existing binary without rebuilding:\n",
    "    $ meterbar-launcher --skip-build\n",
))]
pub struct Cli {
    /// Build and launch the release profile (default: debug).
    #[arg(long)]
    pub release: bool,

    /// Skip the build stage and launch an existing binary.
    #[arg(long)]
    pub skip_build: bool,

    /// Pass a verbosity flag through to the launched application.
    #[arg(long)]
    pub verbose: bool,

    /// Suppress progress output (errors still shown).
    #[arg(short, long)]
    pub quiet: bool,

    /// Fail immediately when a required tool is missing instead of
    /// installing it.
    #[arg(long)]
    pub skip_install: bool,

    /// Application root directory [default: current directory].
    #[arg(long, value_name = "DIR")]
    pub app_dir: Option<Utf8PathBuf>,
}

/// Immutable per-invocation configuration derived from CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Whether the release profile is selected.
    pub release: bool,
    /// Whether the build stage is skipped entirely.
    pub skip_build: bool,
    /// Whether a verbosity flag is injected into the launch arguments.
    pub verbose: bool,
}

impl RunConfig {
    /// Returns the build profile selected by this configuration.
    #[must_use]
    pub const fn profile(&self) -> Profile {
        if self.release {
            Profile::Release
        } else {
            Profile::Debug
        }
    }
}

impl Cli {
    /// Derives the immutable run configuration from the parsed flags.
    #[must_use]
    pub const fn run_config(&self) -> RunConfig {
        RunConfig {
            release: self.release,
            skip_build: self.skip_build,
            verbose: self.verbose,
        }
    }
}

impl Default for Cli {
    /// Creates a `Cli` instance with all flags disabled.
    ///
    /// Useful for testing and programmatic construction where only
    /// specific fields need to be set.
    fn default() -> Self {
        Self {
            release: false,
            skip_build: false,
            verbose: false,
            quiet: false,
            skip_install: false,
            app_dir: None,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
