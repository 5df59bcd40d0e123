//! Installation of missing prerequisite tools.
//!
//! Brings together the downloader, the extractor, and the per-tool
//! [`steps::InstallStep`] implementations. Installation is idempotent:
//! each step checks its marker file before acting, so re-running after a
//! partial failure resumes rather than duplicating work.

pub mod download;
pub mod extraction;
pub mod steps;

use crate::dirs::BaseDirs;
use crate::error::Result;
use crate::exec::CommandExecutor;
use crate::output::write_stderr_line;
use crate::path_registry::PathRegistry;
use self::download::ArtefactDownloader;
use self::extraction::ArchiveExtractor;
use self::steps::InstallStep;
use std::io::Write;

/// Shared collaborators handed to every installation step.
pub struct InstallContext<'a> {
    /// Runs vendor installers.
    pub executor: &'a dyn CommandExecutor,
    /// Fetches installer and archive artefacts.
    pub downloader: &'a dyn ArtefactDownloader,
    /// Unpacks archive artefacts.
    pub extractor: &'a dyn ArchiveExtractor,
    /// Platform directory layout.
    pub dirs: &'a dyn BaseDirs,
}

/// Returns the installation steps in dependency order.
///
/// The Rust toolchain comes first: its installer is self-contained, while
/// a subsequent build needs both tools present.
#[must_use]
pub fn default_steps() -> Vec<Box<dyn InstallStep>> {
    vec![Box::new(steps::RustupStep), Box::new(steps::GccStep)]
}

/// Installs every step whose tool appears in `missing`, then registers
/// each installed tool's directory on the session and durable paths.
///
/// Steps already satisfied by their marker file are skipped with a log
/// line. Path registration happens even for skipped steps: the tool may
/// be installed but unreachable, and registration is itself idempotent.
///
/// # Errors
///
/// Returns the first step failure; later steps are not attempted.
pub fn run_install(
    missing: &[&str],
    steps: &[Box<dyn InstallStep>],
    ctx: &InstallContext<'_>,
    registry: &PathRegistry<'_>,
    stderr: &mut dyn Write,
    quiet: bool,
) -> Result<()> {
    for step in steps {
        if !missing.contains(&step.tool()) {
            continue;
        }

        if step.is_satisfied(ctx) {
            log::debug!("{} already installed; registering path only", step.tool());
        } else {
            if !quiet {
                write_stderr_line(stderr, format!("Installing {}...", step.tool()));
            }
            step.perform(ctx, stderr, quiet)?;
        }

        let bin_dir = step.bin_dir(ctx.dirs)?;
        registry.persist_to_user_path(&bin_dir)?;
    }
    Ok(())
}
