//! Artefact download logic for tool provisioning.
//!
//! Provides a trait-based abstraction for fetching the toolchain
//! installer and the compiler archive over HTTPS, enabling dependency
//! injection for testing. Downloads are cached at a known location and
//! reused on re-runs; the body is staged to a `.part` file and renamed
//! into place on success, so the cache never holds a truncated artefact.

use camino::{Utf8Path, Utf8PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

/// Network timeout for artefact downloads.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Trait for downloading artefact files.
#[cfg_attr(test, mockall::automock)]
pub trait ArtefactDownloader {
    /// Download `url` into the file at `dest`, overwriting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the artefact does not
    /// exist, or the file cannot be written.
    fn download(&self, url: &str, dest: &Utf8Path) -> Result<(), DownloadError>;
}

/// Errors arising from artefact download operations.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("download failed for {url}: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested artefact was not found (HTTP 404).
    #[error("artefact not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// I/O error writing the downloaded file.
    #[error("I/O error writing download: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP-based downloader using `ureq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpDownloader;

impl ArtefactDownloader for HttpDownloader {
    fn download(&self, url: &str, dest: &Utf8Path) -> Result<(), DownloadError> {
        log::debug!("downloading {url} to {dest}");
        let response = http_agent()
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        persist_body(response.into_body().as_reader(), dest)
    }
}

/// Name of the staging file a download is written to before the rename.
fn partial_path(dest: &Utf8Path) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{dest}.part"))
}

/// Streams `body` into a staging file, then renames it to `dest`.
///
/// An interrupted stream leaves neither `dest` nor the staging file
/// behind, so `dest` existing always means a complete download.
fn persist_body<R: std::io::Read>(mut body: R, dest: &Utf8Path) -> Result<(), DownloadError> {
    let part = partial_path(dest);

    let written = std::fs::File::create(&part)
        .and_then(|mut file| std::io::copy(&mut body, &mut file));
    match written {
        Ok(_) => {
            std::fs::rename(&part, dest)?;
            Ok(())
        }
        Err(e) => {
            let _ = std::fs::remove_file(&part);
            Err(DownloadError::Io(e))
        }
    }
}

/// Shared `ureq` agent with request timeout configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(DOWNLOAD_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        other => DownloadError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

impl From<DownloadError> for crate::error::LauncherError {
    fn from(err: DownloadError) -> Self {
        match err {
            DownloadError::NotFound { url } => Self::ArtefactNotFound { url },
            DownloadError::HttpError { url, reason } => Self::Download { url, reason },
            DownloadError::Io(source) => Self::Io(source),
        }
    }
}
