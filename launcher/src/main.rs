//! Meterbar launcher CLI entrypoint.
//!
//! This binary bootstraps the build tools meterbar needs, builds the
//! application, and launches it. Its exit code equals the launched
//! application's exit code so shell scripts and CI can script against
//! it; a failed build likewise propagates the build system's exit code.

use camino::Utf8PathBuf;
use clap::Parser;
use meterbar_launcher::cli::Cli;
use meterbar_launcher::dirs::SystemBaseDirs;
use meterbar_launcher::error::{LauncherError, Result};
use meterbar_launcher::exec::SystemCommandExecutor;
use meterbar_launcher::install::download::HttpDownloader;
use meterbar_launcher::install::extraction::FormatExtractor;
use meterbar_launcher::output::write_stderr_line;
use meterbar_launcher::path_registry::SystemEnvPaths;
use meterbar_launcher::pipeline::{self, PipelineContext};

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let exit_code = match run(&cli, &mut stderr) {
        Ok(code) => code,
        Err(err) => exit_code_for_error(&err, &mut stderr),
    };
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stderr: &mut dyn std::io::Write) -> Result<i32> {
    let app_root = resolve_app_root(cli)?;

    let executor = SystemCommandExecutor;
    let downloader = HttpDownloader;
    let extractor = FormatExtractor;
    let dirs = SystemBaseDirs;
    let env = SystemEnvPaths::new(&SystemBaseDirs::state_dir());

    let ctx = PipelineContext {
        config: cli.run_config(),
        app_root: &app_root,
        executor: &executor,
        downloader: &downloader,
        extractor: &extractor,
        dirs: &dirs,
        env: &env,
        skip_install: cli.skip_install,
        quiet: cli.quiet,
    };

    pipeline::run(&ctx, stderr)
}

/// Resolves the application root from the CLI flag or the current
/// directory.
fn resolve_app_root(cli: &Cli) -> Result<Utf8PathBuf> {
    match &cli.app_dir {
        Some(dir) => Ok(dir.clone()),
        None => {
            let cwd = std::env::current_dir()?;
            Utf8PathBuf::from_path_buf(cwd).map_err(|_| LauncherError::DirectoryUnavailable {
                what: "application root",
            })
        }
    }
}

/// Maps a pipeline error to the process exit code, reporting it first.
///
/// A failed build keeps the build system's own exit code; every other
/// failure exits 1.
fn exit_code_for_error(err: &LauncherError, stderr: &mut dyn std::io::Write) -> i32 {
    write_stderr_line(stderr, err);
    match err {
        LauncherError::BuildFailed { code } => *code,
        _ => 1,
    }
}
