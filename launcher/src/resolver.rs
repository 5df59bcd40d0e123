//! Build artefact resolution across candidate output locations.
//!
//! Depending on how the toolchain is configured, the application binary
//! may land in the default profile output directory or in a
//! target-triple-qualified one. Candidates are tried in a fixed
//! precedence order and the first existing match wins; a stale binary
//! from a different profile is never used as a fallback.

use crate::builder::Profile;
use crate::error::{LauncherError, Result};
use camino::{Utf8Path, Utf8PathBuf};

/// File stem of the application binary.
pub const APP_BINARY: &str = "meterbar";

/// Target triples whose qualified output directories are searched after
/// the default location, in precedence order.
#[cfg(windows)]
const QUALIFIED_TRIPLES: &[&str] = &["x86_64-pc-windows-gnu", "x86_64-pc-windows-msvc"];
#[cfg(target_os = "macos")]
const QUALIFIED_TRIPLES: &[&str] = &["aarch64-apple-darwin", "x86_64-apple-darwin"];
#[cfg(not(any(windows, target_os = "macos")))]
const QUALIFIED_TRIPLES: &[&str] = &["x86_64-unknown-linux-gnu"];

/// Name of the application binary including the platform suffix.
#[must_use]
pub fn binary_filename() -> String {
    format!("{APP_BINARY}{}", std::env::consts::EXE_SUFFIX)
}

/// Ordered candidate paths for the artefact of `profile` under
/// `app_root`. The default output directory takes precedence over
/// triple-qualified ones.
#[must_use]
pub fn candidate_paths(app_root: &Utf8Path, profile: Profile) -> Vec<Utf8PathBuf> {
    let filename = binary_filename();
    let target = app_root.join("target");

    let mut candidates = vec![target.join(profile.dir_name()).join(&filename)];
    for triple in QUALIFIED_TRIPLES {
        candidates.push(target.join(triple).join(profile.dir_name()).join(&filename));
    }
    candidates
}

/// Returns the first existing candidate artefact for `profile`.
///
/// # Errors
///
/// Returns [`LauncherError::BinaryNotFound`] listing every searched path
/// when no candidate exists.
pub fn resolve(app_root: &Utf8Path, profile: Profile) -> Result<Utf8PathBuf> {
    let candidates = candidate_paths(app_root, profile);

    for candidate in &candidates {
        if candidate.is_file() {
            log::debug!("resolved artefact at {candidate}");
            return Ok(candidate.clone());
        }
    }

    Err(LauncherError::BinaryNotFound {
        searched: candidates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
        let temp = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_owned()).expect("utf-8 path");
        (temp, root)
    }

    fn place_binary(path: &Utf8Path) {
        std::fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
        std::fs::write(path, b"binary").expect("write binary");
    }

    #[test]
    fn first_candidate_wins_when_both_exist() {
        let (_temp, root) = temp_root();
        let candidates = candidate_paths(&root, Profile::Debug);
        place_binary(&candidates[0]);
        place_binary(&candidates[1]);

        let resolved = resolve(&root, Profile::Debug).expect("resolve");
        assert_eq!(resolved, candidates[0]);
    }

    #[test]
    fn later_candidate_found_when_first_absent() {
        let (_temp, root) = temp_root();
        let candidates = candidate_paths(&root, Profile::Debug);
        place_binary(&candidates[1]);

        let resolved = resolve(&root, Profile::Debug).expect("resolve");
        assert_eq!(resolved, candidates[1]);
    }

    #[test]
    fn missing_artefact_error_lists_every_candidate() {
        let (_temp, root) = temp_root();
        let candidates = candidate_paths(&root, Profile::Release);

        let err = resolve(&root, Profile::Release).expect_err("must fail");
        let LauncherError::BinaryNotFound { searched } = err else {
            panic!("expected BinaryNotFound, got {err}");
        };
        assert_eq!(searched, candidates);
    }

    #[test]
    fn profiles_do_not_fall_back_to_each_other() {
        let (_temp, root) = temp_root();
        let debug_candidates = candidate_paths(&root, Profile::Debug);
        place_binary(&debug_candidates[0]);

        let err = resolve(&root, Profile::Release).expect_err("release must not see debug");
        assert!(matches!(err, LauncherError::BinaryNotFound { .. }));
    }

    #[test]
    fn default_output_directory_precedes_qualified_ones() {
        let (_temp, root) = temp_root();
        let candidates = candidate_paths(&root, Profile::Release);

        assert!(candidates[0].as_str().contains("target"));
        assert!(candidates[0].as_str().contains("release"));
        assert!(candidates.len() > 1);
        for qualified in &candidates[1..] {
            assert!(
                QUALIFIED_TRIPLES
                    .iter()
                    .any(|t| qualified.as_str().contains(t))
            );
        }
    }
}
