//! Idempotent installation steps for the required tools.
//!
//! Each step has a marker-file precondition and an effect. Re-running a
//! step after partial success never duplicates downloads or extracts:
//! the precondition is checked first, cached downloads are reused, and a
//! partially extracted tree is detected by probing for the tool's actual
//! executable rather than for the directory.

use crate::dirs::BaseDirs;
use crate::error::{LauncherError, Result};
use crate::install::InstallContext;
use crate::output::write_stderr_line;
use camino::{Utf8Path, Utf8PathBuf};
use std::io::Write;
use std::time::Duration;

/// Upper bound on a vendor installer run.
const INSTALLER_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Fetch target for the toolchain installer executable.
#[cfg(windows)]
pub const RUSTUP_INSTALLER_URL: &str =
    "https://static.rust-lang.org/rustup/dist/x86_64-pc-windows-msvc/rustup-init.exe";
/// Fetch target for the toolchain installer executable.
#[cfg(not(windows))]
pub const RUSTUP_INSTALLER_URL: &str =
    "https://static.rust-lang.org/rustup/dist/x86_64-unknown-linux-gnu/rustup-init";

/// Fetch target for the compiler toolchain archive.
#[cfg(windows)]
pub const GCC_ARCHIVE_URL: &str = "https://github.com/brechtsanders/winlibs_mingw/releases/download/14.2.0posix-19.1.1-12.0.0-msvcrt-r2/winlibs-x86_64-posix-seh-gcc-14.2.0-mingw-w64msvcrt-12.0.0-r2.zip";
/// Fetch target for the compiler toolchain archive.
#[cfg(not(windows))]
pub const GCC_ARCHIVE_URL: &str =
    "https://github.com/meterbar/toolchains/releases/download/gcc-14.2.0/gcc-14.2.0-x86_64-unknown-linux-gnu.tar.zst";

/// Directory inside the extracted archive that holds tool executables.
#[cfg(windows)]
const GCC_BIN_SUBDIRS: [&str; 2] = ["mingw64", "bin"];
#[cfg(not(windows))]
const GCC_BIN_SUBDIRS: [&str; 2] = ["gcc", "bin"];

/// One named idempotent installation action.
pub trait InstallStep {
    /// Name of the tool this step provisions.
    fn tool(&self) -> &'static str;

    /// Returns true when the step's marker file already exists, making
    /// the effect a no-op.
    fn is_satisfied(&self, ctx: &InstallContext<'_>) -> bool;

    /// Performs the step's effect: download, run installer or extract,
    /// verify the marker, clean up the artefact.
    ///
    /// # Errors
    ///
    /// Returns an error naming the tool when any part of the effect
    /// fails; the caller aborts installation immediately.
    fn perform(&self, ctx: &InstallContext<'_>, stderr: &mut dyn Write, quiet: bool)
    -> Result<()>;

    /// Directory that must be on the command-resolution path for the
    /// tool to resolve.
    ///
    /// # Errors
    ///
    /// Returns an error when the platform directory cannot be
    /// determined.
    fn bin_dir(&self, dirs: &dyn BaseDirs) -> Result<Utf8PathBuf>;
}

/// Appends the platform executable suffix to a tool name.
fn executable(name: &str) -> String {
    format!("{name}{}", std::env::consts::EXE_SUFFIX)
}

/// Removes a downloaded artefact, tolerating it already being absent.
fn remove_artefact(path: &Utf8Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Marks a downloaded installer as executable.
#[cfg(unix)]
fn make_executable(path: &Utf8Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms)?;
    Ok(())
}

/// Installs the Rust toolchain by downloading and running the vendor
/// installer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustupStep;

impl RustupStep {
    fn marker(dirs: &dyn BaseDirs) -> Option<Utf8PathBuf> {
        Some(dirs.cargo_bin_dir()?.join(executable("cargo")))
    }

    /// File name of the cached installer in the download directory.
    fn installer_filename() -> String {
        executable("rustup-init")
    }
}

impl InstallStep for RustupStep {
    fn tool(&self) -> &'static str {
        "cargo"
    }

    fn is_satisfied(&self, ctx: &InstallContext<'_>) -> bool {
        Self::marker(ctx.dirs).is_some_and(|m| m.is_file())
    }

    fn perform(
        &self,
        ctx: &InstallContext<'_>,
        stderr: &mut dyn Write,
        quiet: bool,
    ) -> Result<()> {
        let installer = ctx.dirs.download_dir().join(Self::installer_filename());

        if installer.is_file() {
            log::debug!("reusing cached installer at {installer}");
        } else {
            if !quiet {
                write_stderr_line(stderr, format!("Downloading {RUSTUP_INSTALLER_URL}..."));
            }
            ctx.downloader
                .download(RUSTUP_INSTALLER_URL, &installer)
                .map_err(LauncherError::from)?;
        }

        #[cfg(unix)]
        make_executable(&installer)?;

        if !quiet {
            write_stderr_line(stderr, "Running the Rust toolchain installer...");
        }
        // --no-modify-path: path registration is this launcher's job.
        let args = ["-y", "--default-toolchain", "stable", "--no-modify-path"];
        let status = ctx
            .executor
            .status_bounded(installer.as_str(), &args, INSTALLER_TIMEOUT)?;

        match status {
            None => {
                // The cached installer may be the reason it hung;
                // discard it so the next run fetches a fresh copy.
                let _ = remove_artefact(&installer);
                return Err(LauncherError::InstallerRun {
                    tool: "rustup",
                    message: format!(
                        "installer did not finish within {}s",
                        INSTALLER_TIMEOUT.as_secs()
                    ),
                });
            }
            Some(s) if !s.success() => {
                let _ = remove_artefact(&installer);
                return Err(LauncherError::InstallerRun {
                    tool: "rustup",
                    message: format!("installer exited with {s}"),
                });
            }
            Some(_) => {}
        }

        if !self.is_satisfied(ctx) {
            return Err(LauncherError::InstallerRun {
                tool: "rustup",
                message: "cargo executable missing after installer run".to_owned(),
            });
        }

        remove_artefact(&installer)
    }

    fn bin_dir(&self, dirs: &dyn BaseDirs) -> Result<Utf8PathBuf> {
        dirs.cargo_bin_dir()
            .ok_or(LauncherError::DirectoryUnavailable { what: "cargo bin" })
    }
}

/// Installs the C toolchain by downloading and extracting the compiler
/// archive.
#[derive(Debug, Clone, Copy, Default)]
pub struct GccStep;

impl GccStep {
    fn marker(dirs: &dyn BaseDirs) -> Option<Utf8PathBuf> {
        let mut path = dirs.tools_dir()?;
        for part in GCC_BIN_SUBDIRS {
            path = path.join(part);
        }
        Some(path.join(executable("gcc")))
    }

    /// File name of the cached archive, taken from the fetch URL.
    fn archive_filename() -> &'static str {
        GCC_ARCHIVE_URL
            .rsplit('/')
            .next()
            .unwrap_or("toolchain-archive")
    }
}

impl InstallStep for GccStep {
    fn tool(&self) -> &'static str {
        "gcc"
    }

    fn is_satisfied(&self, ctx: &InstallContext<'_>) -> bool {
        // Probe the executable itself: a partially extracted tree from a
        // failed run must not count as installed.
        Self::marker(ctx.dirs).is_some_and(|m| m.is_file())
    }

    fn perform(
        &self,
        ctx: &InstallContext<'_>,
        stderr: &mut dyn Write,
        quiet: bool,
    ) -> Result<()> {
        let tools_dir = ctx
            .dirs
            .tools_dir()
            .ok_or(LauncherError::DirectoryUnavailable { what: "tools" })?;
        std::fs::create_dir_all(&tools_dir)?;

        let archive = ctx.dirs.download_dir().join(Self::archive_filename());
        if archive.is_file() {
            log::debug!("reusing cached archive at {archive}");
        } else {
            if !quiet {
                write_stderr_line(stderr, format!("Downloading {GCC_ARCHIVE_URL}..."));
            }
            ctx.downloader
                .download(GCC_ARCHIVE_URL, &archive)
                .map_err(LauncherError::from)?;
        }

        if !quiet {
            write_stderr_line(stderr, format!("Extracting to {tools_dir}..."));
        }
        if let Err(source) = ctx.extractor.extract(&archive, &tools_dir) {
            // An archive that fails extraction is poison; discard it so
            // the next run re-fetches instead of failing forever.
            let _ = remove_artefact(&archive);
            return Err(LauncherError::Extraction { archive, source });
        }

        if !self.is_satisfied(ctx) {
            return Err(LauncherError::InstallerRun {
                tool: "gcc",
                message: "gcc executable missing after extraction".to_owned(),
            });
        }

        remove_artefact(&archive)
    }

    fn bin_dir(&self, dirs: &dyn BaseDirs) -> Result<Utf8PathBuf> {
        GccStep::marker(dirs)
            .and_then(|m| m.parent().map(Utf8Path::to_owned))
            .ok_or(LauncherError::DirectoryUnavailable { what: "tools" })
    }
}

#[cfg(test)]
#[path = "steps_tests.rs"]
mod tests;
