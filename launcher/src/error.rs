//! Error types for the meterbar launcher CLI.
//!
//! This module defines semantic error variants that provide actionable
//! guidance when bootstrapping or launching fails. Each error includes a
//! recovery hint where one exists.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::install::extraction::ExtractionError;

/// Errors that can occur while bootstrapping and launching the application.
#[derive(Debug, Error)]
pub enum LauncherError {
    /// Required tools are still unresolvable after installation ran.
    #[error(
        "required {} not available: {}; \
         restart your terminal so the updated PATH is picked up, then re-run",
        if .tools.len() == 1 { "tool" } else { "tools" },
        .tools.join(", ")
    )]
    MissingPrerequisite {
        /// Names of the tools that could not be resolved.
        tools: Vec<String>,
    },

    /// An artefact download failed.
    #[error("download failed for {url}: {reason}; check connectivity and re-run")]
    Download {
        /// The URL that was requested.
        url: String,
        /// Description of the failure.
        reason: String,
    },

    /// The requested artefact does not exist at the fetch target (HTTP 404).
    #[error("artefact not found: {url}")]
    ArtefactNotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// Extracting a downloaded archive failed.
    #[error("extraction of {archive} failed")]
    Extraction {
        /// Path to the archive that could not be extracted.
        archive: Utf8PathBuf,
        /// The underlying extraction failure.
        #[source]
        source: ExtractionError,
    },

    /// A vendor installer ran but did not complete successfully.
    #[error("{tool} installer failed: {message}")]
    InstallerRun {
        /// Name of the tool whose installer failed.
        tool: &'static str,
        /// Description of the failure.
        message: String,
    },

    /// The build system exited with a non-zero status.
    ///
    /// The code is preserved verbatim so callers can script against it.
    #[error("build failed with exit code {code}")]
    BuildFailed {
        /// Exit code reported by the build system.
        code: i32,
    },

    /// No build artefact exists at any candidate location.
    #[error(
        "application binary not found; searched: {}; \
         run again without --skip-build to produce one",
        .searched.iter().map(|p| p.as_str()).collect::<Vec<_>>().join(", ")
    )]
    BinaryNotFound {
        /// Every candidate path that was checked, in precedence order.
        searched: Vec<Utf8PathBuf>,
    },

    /// The resolved binary exists but could not be started.
    #[error("failed to launch {path}: {reason}")]
    LaunchFailed {
        /// Path to the binary that could not be started.
        path: Utf8PathBuf,
        /// Description of the failure, e.g. a permissions problem.
        reason: String,
    },

    /// A platform directory needed for installation could not be determined.
    #[error("could not determine the {what} directory")]
    DirectoryUnavailable {
        /// Which directory was being resolved.
        what: &'static str,
    },

    /// Reading or writing the persisted user path list failed.
    #[error("failed to {operation} the persisted user path: {message}")]
    PathPersistence {
        /// The operation that failed (read, write).
        operation: &'static str,
        /// Description of the failure.
        message: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`LauncherError`].
pub type Result<T> = std::result::Result<T, LauncherError>;
