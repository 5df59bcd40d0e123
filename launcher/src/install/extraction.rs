//! Archive extraction for compiler toolchain artefacts.
//!
//! Toolchain archives ship in several formats; the extractor dispatches
//! on the file name (`.zip`, `.tar.gz`, `.tar.zst`) and validates every
//! entry path to prevent zip-slip attacks.

use camino::Utf8Path;
use std::path::{Component, Path};

/// Trait for extracting artefact archives, enabling test mocking.
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor {
    /// Extract the archive at `archive_path` into `dest_dir`.
    ///
    /// Returns the list of file names that were extracted.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::PathTraversal`] if any entry attempts
    /// to escape the destination directory,
    /// [`ExtractionError::EmptyArchive`] if no files are found,
    /// [`ExtractionError::UnsupportedFormat`] for unknown extensions, and
    /// [`ExtractionError::Io`] on I/O failures (corrupt archive,
    /// insufficient disk space, permission denied).
    fn extract(
        &self,
        archive_path: &Utf8Path,
        dest_dir: &Utf8Path,
    ) -> Result<Vec<String>, ExtractionError>;
}

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// I/O error during extraction.
    #[error("extraction I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A path in the archive attempts to traverse outside the destination.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending path from the archive entry.
        path: String,
    },

    /// The archive contains no files.
    #[error("archive contains no files")]
    EmptyArchive,

    /// The archive format is not recognised from the file name.
    #[error("unsupported archive format: {path}")]
    UnsupportedFormat {
        /// The archive path whose extension was not recognised.
        path: String,
    },
}

/// Default extractor dispatching on the archive file name.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatExtractor;

impl ArchiveExtractor for FormatExtractor {
    fn extract(
        &self,
        archive_path: &Utf8Path,
        dest_dir: &Utf8Path,
    ) -> Result<Vec<String>, ExtractionError> {
        let name = archive_path.as_str();
        if name.ends_with(".zip") {
            extract_zip(archive_path, dest_dir)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            let file = std::fs::File::open(archive_path)?;
            extract_tar(flate2::read::GzDecoder::new(file), dest_dir)
        } else if name.ends_with(".tar.zst") {
            let file = std::fs::File::open(archive_path)?;
            extract_tar(zstd::Decoder::new(file)?, dest_dir)
        } else {
            Err(ExtractionError::UnsupportedFormat {
                path: name.to_owned(),
            })
        }
    }
}

/// Extract a zip archive, validating each entry name.
fn extract_zip(archive_path: &Utf8Path, dest_dir: &Utf8Path) -> Result<Vec<String>, ExtractionError> {
    let file = std::fs::File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(zip_error_to_io)?;
    let mut extracted = Vec::new();

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(zip_error_to_io)?;
        let Some(entry_path) = entry.enclosed_name() else {
            return Err(ExtractionError::PathTraversal {
                path: entry.name().to_owned(),
            });
        };

        let dest_path = dest_dir.as_std_path().join(&entry_path);
        if entry.is_dir() {
            std::fs::create_dir_all(&dest_path)?;
            continue;
        }
        if let Some(parent) = dest_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = std::fs::File::create(&dest_path)?;
        std::io::copy(&mut entry, &mut out)?;

        // Zip archives carry unix modes in the entry metadata; without
        // restoring them an extracted tool would not be executable.
        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;

            std::fs::set_permissions(&dest_path, std::fs::Permissions::from_mode(mode))?;
        }

        if let Some(name) = entry_path.file_name() {
            extracted.push(name.to_string_lossy().into_owned());
        }
    }

    if extracted.is_empty() {
        return Err(ExtractionError::EmptyArchive);
    }
    Ok(extracted)
}

/// Extract a tar stream, validating each entry path.
fn extract_tar<R: std::io::Read>(
    reader: R,
    dest_dir: &Utf8Path,
) -> Result<Vec<String>, ExtractionError> {
    let mut archive = tar::Archive::new(reader);
    let mut extracted = Vec::new();

    for entry_result in archive.entries()? {
        let mut entry = entry_result?;
        let entry_path = entry.path()?.into_owned();

        validate_entry_path(&entry_path)?;

        let dest_path = dest_dir.as_std_path().join(&entry_path);
        if let Some(parent) = dest_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        entry.unpack(&dest_path)?;

        if entry.header().entry_type().is_file() {
            if let Some(name) = entry_path.file_name() {
                extracted.push(name.to_string_lossy().into_owned());
            }
        }
    }

    if extracted.is_empty() {
        return Err(ExtractionError::EmptyArchive);
    }
    Ok(extracted)
}

/// Validate that a tar entry path does not escape the destination
/// directory via `..` components or absolute paths.
fn validate_entry_path(path: &Path) -> Result<(), ExtractionError> {
    if path.is_absolute() {
        return Err(ExtractionError::PathTraversal {
            path: path.display().to_string(),
        });
    }
    for component in path.components() {
        if matches!(component, Component::ParentDir) {
            return Err(ExtractionError::PathTraversal {
                path: path.display().to_string(),
            });
        }
    }
    Ok(())
}

/// Zip errors carry their own enum; fold them into I/O for the caller.
fn zip_error_to_io(err: zip::result::ZipError) -> ExtractionError {
    match err {
        zip::result::ZipError::Io(source) => ExtractionError::Io(source),
        other => ExtractionError::Io(std::io::Error::other(other)),
    }
}
