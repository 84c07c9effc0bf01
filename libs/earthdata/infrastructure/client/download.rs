//! Authenticated granule downloads
//!
//! Earthdata data hosts answer an anonymous request with a redirect to
//! Earthdata Login, which authenticates with HTTP Basic and redirects back
//! with a session cookie. Redirects are followed by hand so the
//! `Authorization` header is only ever sent to the URS host.

use crate::domain::{DataLink, DownloadOutcome, DownloadReport, FailedDownload};
use crate::infrastructure::auth::{Credentials, URS_HOST};
use futures::{stream, StreamExt};
use parking_lot::Mutex;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{Client, Response, StatusCode, Url};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid URL {0}")]
    InvalidUrl(String),

    #[error("Redirect from {0} has no Location header")]
    MissingLocation(String),

    #[error("Too many redirects fetching {0}")]
    TooManyRedirects(String),

    #[error("Failed to fetch file from url: {url} (HTTP {status})")]
    HttpStatus { url: String, status: u16 },

    #[error("File I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Download of {0} cancelled")]
    Cancelled(String),

    #[error("{url} would overwrite {} from an earlier link", .path.display())]
    DuplicateTarget { url: String, path: PathBuf },
}

pub type Result<T> = std::result::Result<T, DownloadError>;

/// Tunables for [`EarthdataSession`]
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Host that receives Basic credentials
    pub urs_host: String,
    pub max_redirects: usize,
    pub connect_timeout: Duration,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            urs_host: URS_HOST.to_string(),
            max_redirects: 10,
            connect_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Default)]
struct Progress {
    finished: usize,
    bytes: u64,
}

/// HTTP session holding Earthdata Login credentials and cookies
pub struct EarthdataSession {
    client: Client,
    credentials: Credentials,
    options: DownloadOptions,
    running: Arc<AtomicBool>,
}

impl EarthdataSession {
    pub fn new(credentials: Credentials, options: DownloadOptions) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .connect_timeout(options.connect_timeout)
            .build()?;

        Ok(Self {
            client,
            credentials,
            options,
            running: Arc::new(AtomicBool::new(true)),
        })
    }

    /// Share a running flag (see `ShutdownManager::flag`); clearing it
    /// cancels in-flight downloads at the next chunk
    pub fn with_shutdown_flag(mut self, running: Arc<AtomicBool>) -> Self {
        self.running = running;
        self
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// GET `url`, following redirects and authenticating against URS
    pub async fn get(&self, url: &str) -> Result<Response> {
        let mut current = Url::parse(url).map_err(|_| DownloadError::InvalidUrl(url.to_string()))?;

        for hop in 0..=self.options.max_redirects {
            let mut request = self.client.get(current.clone());
            if current.host_str() == Some(self.options.urs_host.as_str()) {
                request = request.basic_auth(
                    &self.credentials.username,
                    Some(&self.credentials.password),
                );
            }

            let response = request.send().await?;
            if !response.status().is_redirection() {
                return Ok(response);
            }

            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| DownloadError::MissingLocation(current.to_string()))?;

            let next = current
                .join(location)
                .map_err(|_| DownloadError::InvalidUrl(location.to_string()))?;

            debug!(hop = hop, from = %current, to = %next, "Following redirect");
            current = next;
        }

        Err(DownloadError::TooManyRedirects(url.to_string()))
    }

    /// Stream `url` into `dir/<file name>`
    ///
    /// Data is written to a `.part` file which is renamed once complete and
    /// removed on failure.
    pub async fn download_file(&self, url: &str, dir: &Path) -> Result<DownloadOutcome> {
        let link = DataLink::new(url);
        let file_name = link.file_name();
        if file_name.is_empty() {
            return Err(DownloadError::InvalidUrl(url.to_string()));
        }

        let response = self.get(url).await?;
        if response.status() != StatusCode::OK {
            warn!("Failed to fetch file from url: {}", url);
            return Err(DownloadError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        tokio::fs::create_dir_all(dir).await?;
        let target = Self::target_path(url, dir);
        let partial = dir.join(format!("{}.part", file_name));

        match self.stream_to_file(url, response, &partial, &target).await {
            Ok((bytes, chunks, sha256)) => {
                tokio::fs::rename(&partial, &target).await?;
                Ok(DownloadOutcome {
                    url: url.to_string(),
                    path: target,
                    bytes,
                    chunks,
                    sha256,
                })
            }
            Err(e) => {
                if let Err(rm) = tokio::fs::remove_file(&partial).await {
                    debug!("Could not remove {}: {}", partial.display(), rm);
                }
                Err(e)
            }
        }
    }

    async fn stream_to_file(
        &self,
        url: &str,
        mut response: Response,
        partial: &Path,
        target: &Path,
    ) -> Result<(u64, usize, String)> {
        let mut file = tokio::fs::File::create(partial).await?;
        let mut hasher = Sha256::new();
        let mut bytes = 0u64;
        let mut chunks = 0usize;

        while let Some(chunk) = response.chunk().await? {
            if !self.is_running() {
                return Err(DownloadError::Cancelled(url.to_string()));
            }
            debug!("Writing chunk {} for {}", chunks, target.display());
            file.write_all(&chunk).await?;
            hasher.update(&chunk);
            bytes += chunk.len() as u64;
            chunks += 1;
        }

        file.flush().await?;
        Ok((bytes, chunks, hex::encode(hasher.finalize())))
    }

    /// Download every URL into `dir`, at most `concurrency` at a time
    ///
    /// Failures are collected in the report instead of aborting the batch.
    /// A URL whose file name was already claimed by an earlier one fails
    /// with [`DownloadError::DuplicateTarget`].
    pub async fn download_all(
        &self,
        urls: &[String],
        dir: &Path,
        concurrency: usize,
    ) -> DownloadReport {
        let total = urls.len();
        let progress = Mutex::new(Progress::default());

        let mut claimed = HashSet::new();
        let duplicate: Vec<bool> = urls
            .iter()
            .map(|url| !claimed.insert(Self::target_path(url, dir)))
            .collect();

        let mut results: Vec<(usize, &String, Option<Result<DownloadOutcome>>)> =
            stream::iter(urls.iter().enumerate())
                .map(|(idx, url)| {
                    let progress = &progress;
                    let duplicate = &duplicate;
                    async move {
                        if !self.is_running() {
                            return (idx, url, None);
                        }
                        let result = if duplicate[idx] {
                            Err(DownloadError::DuplicateTarget {
                                url: url.clone(),
                                path: Self::target_path(url, dir),
                            })
                        } else {
                            self.download_file(url, dir).await
                        };
                        let mut p = progress.lock();
                        p.finished += 1;
                        match &result {
                            Ok(outcome) => {
                                p.bytes += outcome.bytes;
                                info!(
                                    "[{}/{}] Downloaded {} ({} bytes)",
                                    p.finished,
                                    total,
                                    outcome.path.display(),
                                    outcome.bytes
                                );
                            }
                            Err(e) => warn!("[{}/{}] {}", p.finished, total, e),
                        }
                        (idx, url, Some(result))
                    }
                })
                .buffer_unordered(concurrency.max(1))
                .collect()
                .await;

        results.sort_by_key(|(idx, _, _)| *idx);

        let mut report = DownloadReport::default();
        for (_, url, result) in results {
            match result {
                Some(Ok(outcome)) => report.succeeded.push(outcome),
                Some(Err(e)) => report.failed.push(FailedDownload {
                    url: url.clone(),
                    reason: e.to_string(),
                }),
                None => report.skipped.push(url.clone()),
            }
        }

        let p = progress.lock();
        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            skipped = report.skipped.len(),
            bytes = p.bytes,
            "Download batch finished"
        );
        report
    }

    /// Local path a URL downloads to
    pub fn target_path(url: &str, dir: &Path) -> PathBuf {
        dir.join(DataLink::new(url).file_name())
    }
}
