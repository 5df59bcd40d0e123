//! Meterbar launcher library.
//!
//! This crate bootstraps and launches the meterbar desktop client: it
//! verifies the required build tools, installs any that are missing,
//! builds the application, locates the resulting binary, and starts it.
//! It is used by the `meterbar-launcher` CLI binary and can be consumed
//! programmatically for testing or custom bootstrap workflows.
//!
//! # Modules
//!
//! - [`builder`] - Build invocation for the application
//! - [`cli`] - Command-line argument definitions
//! - [`dirs`] - Directory resolution abstraction for platform-specific paths
//! - [`error`] - Semantic error types with recovery hints
//! - [`exec`] - External command execution
//! - [`install`] - Idempotent installation of missing tools
//! - [`launch`] - Launching the resolved binary and forwarding its exit code
//! - [`output`] - Progress output helpers
//! - [`path_registry`] - Session and persisted path management
//! - [`pipeline`] - Bootstrap-and-launch pipeline orchestration
//! - [`prereq`] - Prerequisite detection for required tools
//! - [`resolver`] - Build artefact resolution across candidate locations
//! - [`workdir`] - Scoped working-directory changes

pub mod builder;
pub mod cli;
pub mod dirs;
pub mod error;
pub mod exec;
pub mod install;
pub mod launch;
pub mod output;
pub mod path_registry;
pub mod pipeline;
pub mod prereq;
pub mod resolver;
pub mod workdir;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
