//! The bootstrap-and-launch pipeline.
//!
//! Sequences the stages as a chain of fallible steps: prerequisite
//! check, installation of anything missing, re-verification, build,
//! artefact resolution, launch. The first failure aborts the chain, and
//! a successful run's result is the launched application's exit code.

use crate::builder;
use crate::cli::RunConfig;
use crate::dirs::BaseDirs;
use crate::error::{LauncherError, Result};
use crate::exec::CommandExecutor;
use crate::install::download::ArtefactDownloader;
use crate::install::extraction::ArchiveExtractor;
use crate::install::{self, InstallContext};
use crate::launch;
use crate::output::{tools_ready_message, write_stderr_line};
use crate::path_registry::{EnvPaths, PathRegistry};
use crate::prereq;
use crate::resolver;
use camino::Utf8Path;
use std::io::Write;

/// Everything one pipeline run needs, injected so tests can substitute
/// fakes for every effectful collaborator.
pub struct PipelineContext<'a> {
    /// Flags derived from the command line.
    pub config: RunConfig,
    /// Root directory of the application source tree.
    pub app_root: &'a Utf8Path,
    /// Runs probes, the build system, and the application.
    pub executor: &'a dyn CommandExecutor,
    /// Fetches installation artefacts.
    pub downloader: &'a dyn ArtefactDownloader,
    /// Unpacks archive artefacts.
    pub extractor: &'a dyn ArchiveExtractor,
    /// Platform directory layout.
    pub dirs: &'a dyn BaseDirs,
    /// Session and persisted path state.
    pub env: &'a dyn EnvPaths,
    /// Fail on missing tools instead of installing them.
    pub skip_install: bool,
    /// Suppress progress output.
    pub quiet: bool,
}

/// Runs the pipeline to completion and returns the application's exit
/// code.
///
/// # Errors
///
/// Returns the first stage failure: [`LauncherError::MissingPrerequisite`]
/// when a tool is unavailable and cannot (or may not) be installed,
/// [`LauncherError::BuildFailed`] carrying the build system's exit code,
/// [`LauncherError::BinaryNotFound`] when no artefact exists, or
/// [`LauncherError::LaunchFailed`] when the binary cannot be started.
pub fn run(ctx: &PipelineContext<'_>, stderr: &mut dyn Write) -> Result<i32> {
    let probers = prereq::default_probers();
    let status = prereq::check(&probers, ctx.executor);

    if !status.all_resolvable() {
        let missing = status.missing();
        if ctx.skip_install {
            return Err(missing_error(&missing));
        }
        if !ctx.quiet {
            write_stderr_line(stderr, format!("Missing tools: {}", missing.join(", ")));
        }

        let install_ctx = InstallContext {
            executor: ctx.executor,
            downloader: ctx.downloader,
            extractor: ctx.extractor,
            dirs: ctx.dirs,
        };
        let registry = PathRegistry::new(ctx.env);
        let steps = install::default_steps();
        install::run_install(&missing, &steps, &install_ctx, &registry, stderr, ctx.quiet)?;

        // Re-probe on the updated session path. Installation reporting
        // success is not enough; the tools must actually resolve.
        let after = prereq::check(&probers, ctx.executor);
        if !after.all_resolvable() {
            return Err(missing_error(&after.missing()));
        }
    }

    if !ctx.quiet {
        write_stderr_line(stderr, tools_ready_message(status.len()));
    }

    if ctx.config.skip_build {
        log::debug!("build stage skipped by request");
    } else {
        builder::build(ctx.config.profile(), ctx.app_root, ctx.executor)?;
    }

    let binary = resolver::resolve(ctx.app_root, ctx.config.profile())?;
    launch::launch(&binary, &ctx.config, ctx.executor)
}

fn missing_error(missing: &[&str]) -> LauncherError {
    LauncherError::MissingPrerequisite {
        tools: missing.iter().map(|&t| t.to_owned()).collect(),
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
