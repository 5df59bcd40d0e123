//! Session and persisted command-resolution path management.
//!
//! The launcher must make newly installed tool directories resolvable both
//! in the current process (so the re-verification probe and the build can
//! find them) and in future sessions (so the bootstrap is a one-off). The
//! [`EnvPaths`] trait models both path lists as injectable state, keeping
//! real environment mutation out of tests.
//!
//! Known limitation: a persisted addition is durable, but sibling
//! processes that captured their environment before this run will not see
//! it until they restart. The [`crate::error::LauncherError`] recovery
//! hints tell users to restart their terminal for that reason.

use crate::error::Result;
use camino::Utf8Path;

/// Separator between entries in a path list.
pub const PATH_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

/// Access to the session and persisted command-resolution path lists.
#[cfg_attr(test, mockall::automock)]
pub trait EnvPaths {
    /// Returns the current process's path list.
    fn session_path(&self) -> String;

    /// Replaces the current process's path list.
    ///
    /// # Errors
    ///
    /// Returns an error when the host environment rejects the update.
    fn set_session_path(&self, value: &str) -> Result<()>;

    /// Returns the durable user-level path list. An empty string means no
    /// entries are persisted yet.
    ///
    /// # Errors
    ///
    /// Returns an error when the persisted list cannot be read.
    fn persisted_user_path(&self) -> Result<String>;

    /// Replaces the durable user-level path list.
    ///
    /// # Errors
    ///
    /// Returns an error when the persisted list cannot be written.
    fn set_persisted_user_path(&self, value: &str) -> Result<()>;
}

/// Maintains the no-duplicate invariant over both path lists.
pub struct PathRegistry<'a> {
    env: &'a dyn EnvPaths,
}

impl<'a> PathRegistry<'a> {
    /// Creates a registry over the given environment.
    #[must_use]
    pub const fn new(env: &'a dyn EnvPaths) -> Self {
        Self { env }
    }

    /// Prepends `dir` to the session path unless it is already an entry.
    ///
    /// The containment check compares whole entries, never substrings, so
    /// `/opt/tool` does not mask `/opt/toolchain`. Returns `true` when an
    /// entry was added.
    ///
    /// # Errors
    ///
    /// Returns an error when the session path cannot be updated.
    pub fn ensure_on_session_path(&self, dir: &Utf8Path) -> Result<bool> {
        let current = self.env.session_path();
        if contains_entry(&current, dir) {
            return Ok(false);
        }

        let updated = if current.is_empty() {
            dir.to_string()
        } else {
            format!("{dir}{PATH_SEPARATOR}{current}")
        };
        self.env.set_session_path(&updated)?;
        Ok(true)
    }

    /// Appends `dir` to the durable user path list unless already present,
    /// and also adds it to the session path so the current run benefits
    /// without a restart. Returns `true` when the durable list changed.
    ///
    /// # Errors
    ///
    /// Returns an error when either path list cannot be updated.
    pub fn persist_to_user_path(&self, dir: &Utf8Path) -> Result<bool> {
        let persisted = self.env.persisted_user_path()?;
        let changed = if contains_entry(&persisted, dir) {
            false
        } else {
            // The durable list is append-only; existing entries are never
            // reordered or removed.
            let updated = if persisted.is_empty() {
                dir.to_string()
            } else {
                format!("{persisted}{PATH_SEPARATOR}{dir}")
            };
            self.env.set_persisted_user_path(&updated)?;
            true
        };

        self.ensure_on_session_path(dir)?;
        Ok(changed)
    }
}

/// Returns true when `list` contains `dir` as a whole entry.
fn contains_entry(list: &str, dir: &Utf8Path) -> bool {
    list.split(PATH_SEPARATOR)
        .any(|entry| !entry.is_empty() && Utf8Path::new(entry) == dir)
}

/// Session path access backed by the process environment, with the
/// durable list stored platform-appropriately.
///
/// On Windows the durable list lives in the user's registry environment
/// (written through `setx`); elsewhere it is a managed snippet file that
/// shell profiles source.
pub struct SystemEnvPaths {
    #[cfg(not(windows))]
    persist_file: camino::Utf8PathBuf,
}

impl SystemEnvPaths {
    /// Creates system-backed path access.
    ///
    /// `state_dir` holds the managed persisted-path file on non-Windows
    /// platforms; it is unused on Windows.
    #[must_use]
    pub fn new(state_dir: &Utf8Path) -> Self {
        #[cfg(not(windows))]
        {
            Self {
                persist_file: state_dir.join("user-path"),
            }
        }
        #[cfg(windows)]
        {
            let _ = state_dir;
            Self {}
        }
    }
}

impl EnvPaths for SystemEnvPaths {
    fn session_path(&self) -> String {
        std::env::var("PATH").unwrap_or_default()
    }

    fn set_session_path(&self, value: &str) -> Result<()> {
        // SAFETY: the launcher is single-threaded; nothing reads the
        // environment concurrently with this mutation.
        unsafe {
            std::env::set_var("PATH", value);
        }
        Ok(())
    }

    #[cfg(not(windows))]
    fn persisted_user_path(&self) -> Result<String> {
        match std::fs::read_to_string(&self.persist_file) {
            Ok(contents) => Ok(contents.trim().to_owned()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(crate::error::LauncherError::PathPersistence {
                operation: "read",
                message: e.to_string(),
            }),
        }
    }

    #[cfg(not(windows))]
    fn set_persisted_user_path(&self, value: &str) -> Result<()> {
        if let Some(parent) = self.persist_file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.persist_file, format!("{value}\n")).map_err(|e| {
            crate::error::LauncherError::PathPersistence {
                operation: "write",
                message: e.to_string(),
            }
        })
    }

    #[cfg(windows)]
    fn persisted_user_path(&self) -> Result<String> {
        read_user_path_from_registry()
    }

    #[cfg(windows)]
    fn set_persisted_user_path(&self, value: &str) -> Result<()> {
        write_user_path_with_setx(value)
    }
}

/// Reads the user-scope `Path` value via `reg query`.
#[cfg(windows)]
fn read_user_path_from_registry() -> Result<String> {
    use crate::error::LauncherError;

    let output = std::process::Command::new("reg")
        .args(["query", r"HKCU\Environment", "/v", "Path"])
        .output()
        .map_err(|e| LauncherError::PathPersistence {
            operation: "read",
            message: e.to_string(),
        })?;

    if !output.status.success() {
        // No user Path value exists yet; treat as an empty list.
        return Ok(String::new());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("Path") {
            for marker in ["REG_EXPAND_SZ", "REG_SZ"] {
                if let Some(value) = rest.trim_start().strip_prefix(marker) {
                    return Ok(value.trim().to_owned());
                }
            }
        }
    }
    Ok(String::new())
}

/// Writes the user-scope `Path` value via `setx`.
#[cfg(windows)]
fn write_user_path_with_setx(value: &str) -> Result<()> {
    use crate::error::LauncherError;

    let output = std::process::Command::new("setx")
        .args(["Path", value])
        .output()
        .map_err(|e| LauncherError::PathPersistence {
            operation: "write",
            message: e.to_string(),
        })?;

    if output.status.success() {
        Ok(())
    } else {
        Err(LauncherError::PathPersistence {
            operation: "write",
            message: crate::exec::stderr_message(&output),
        })
    }
}
