//! Directory resolution abstraction for platform-specific paths.
//!
//! The launcher needs three per-user locations: the cargo bin directory
//! (where the toolchain installer places `cargo`), a tools directory for
//! extracted compiler archives, and a temporary directory for cached
//! downloads. The [`BaseDirs`] trait keeps these injectable so tests can
//! point them at temporary directories.

use camino::Utf8PathBuf;

/// Resolves per-user base directories.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// Directory where the toolchain installer places executables
    /// (`~/.cargo/bin`), or `None` when the home directory is unknown.
    fn cargo_bin_dir(&self) -> Option<Utf8PathBuf>;

    /// Per-user directory for extracted compiler toolchains, or `None`
    /// when the platform data directory is unknown.
    fn tools_dir(&self) -> Option<Utf8PathBuf>;

    /// Directory for cached artefact downloads.
    fn download_dir(&self) -> Utf8PathBuf;
}

/// Resolves directories from the host environment via `directories-next`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBaseDirs;

impl SystemBaseDirs {
    /// Per-user state directory for the launcher's own files, such as
    /// the persisted path list.
    #[must_use]
    pub fn state_dir() -> Utf8PathBuf {
        directories_next::ProjectDirs::from("", "", "meterbar")
            .and_then(|p| Utf8PathBuf::from_path_buf(p.data_local_dir().to_owned()).ok())
            .unwrap_or_else(|| Utf8PathBuf::from("."))
    }
}

impl BaseDirs for SystemBaseDirs {
    fn cargo_bin_dir(&self) -> Option<Utf8PathBuf> {
        let base = directories_next::BaseDirs::new()?;
        let home = Utf8PathBuf::from_path_buf(base.home_dir().to_owned()).ok()?;
        Some(home.join(".cargo").join("bin"))
    }

    fn tools_dir(&self) -> Option<Utf8PathBuf> {
        let project = directories_next::ProjectDirs::from("", "", "meterbar")?;
        let data = Utf8PathBuf::from_path_buf(project.data_local_dir().to_owned()).ok()?;
        Some(data.join("tools"))
    }

    fn download_dir(&self) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(std::env::temp_dir())
            .unwrap_or_else(|_| Utf8PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cargo_bin_dir_ends_with_cargo_bin() {
        let dirs = SystemBaseDirs;
        if let Some(dir) = dirs.cargo_bin_dir() {
            assert!(dir.as_str().ends_with("bin"));
            assert!(dir.as_str().contains(".cargo"));
        }
    }

    #[test]
    fn download_dir_is_not_empty() {
        let dirs = SystemBaseDirs;
        assert!(!dirs.download_dir().as_str().is_empty());
    }
}
