//! Scoped working-directory changes.
//!
//! The build stage must run from the application root and leave the
//! process where it found it on every exit path, including errors and
//! panics. [`ScopedWorkdir`] models that as resource acquisition: the
//! change happens in `enter` and the restore happens in `Drop`.

use crate::error::Result;
use camino::Utf8Path;
use std::path::PathBuf;

/// Working-directory change that restores the previous directory on drop.
#[derive(Debug)]
pub struct ScopedWorkdir {
    previous: PathBuf,
}

impl ScopedWorkdir {
    /// Changes the process working directory to `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error when the current directory cannot be read or the
    /// change fails (e.g. `dir` does not exist).
    pub fn enter(dir: &Utf8Path) -> Result<Self> {
        let previous = std::env::current_dir()?;
        std::env::set_current_dir(dir)?;
        Ok(Self { previous })
    }
}

impl Drop for ScopedWorkdir {
    fn drop(&mut self) {
        // Restore is best-effort: the previous directory may have been
        // removed while the guard was held.
        let _ = std::env::set_current_dir(&self.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn enter_changes_and_drop_restores() {
        let _cwd = crate::test_utils::cwd_lock();
        let before = std::env::current_dir().expect("current dir");
        let temp = tempfile::tempdir().expect("temp dir");
        let target = Utf8PathBuf::from_path_buf(
            temp.path().canonicalize().expect("canonicalise"),
        )
        .expect("utf-8 temp dir");

        {
            let _guard = ScopedWorkdir::enter(&target).expect("enter");
            let inside = std::env::current_dir().expect("current dir");
            assert_eq!(inside, target.as_std_path());
        }

        let after = std::env::current_dir().expect("current dir");
        assert_eq!(after, before);
    }

    #[test]
    fn enter_fails_for_missing_directory() {
        let result = ScopedWorkdir::enter(Utf8Path::new("/definitely/not/a/real/dir"));
        assert!(result.is_err());
    }
}
