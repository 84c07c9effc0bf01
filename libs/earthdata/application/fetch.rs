//! Search CMR and download the matching granules

use crate::domain::{DataLink, DownloadReport, GranuleQuery};
use crate::infrastructure::auth::{load_credentials, Credentials};
use crate::infrastructure::client::cmr::GranuleCatalog;
use crate::infrastructure::client::download::{DownloadOptions, EarthdataSession};
use crate::infrastructure::config::FetchConfig;
use anyhow::Context;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

/// Where download credentials come from
#[derive(Debug, Clone)]
pub enum CredentialSource {
    Explicit(Credentials),
    Netrc { path: PathBuf, host: String },
}

impl CredentialSource {
    pub fn resolve(&self) -> anyhow::Result<Credentials> {
        match self {
            CredentialSource::Explicit(credentials) => Ok(credentials.clone()),
            CredentialSource::Netrc { path, host } => load_credentials(path, host).with_context(|| {
                "Failed to authenticate. Run the earthdata_login binary first to generate credentials"
            }),
        }
    }
}

/// Everything the download phase needs
#[derive(Debug, Clone)]
pub struct FetchPlan {
    pub output_dir: PathBuf,
    /// Download at most this many files
    pub limit: Option<usize>,
    pub concurrency: usize,
    pub download: DownloadOptions,
    pub credentials: CredentialSource,
}

impl FetchPlan {
    /// Build a plan from configuration, reading credentials from the netrc
    /// file at `netrc_path` unless the environment supplied them
    pub fn from_config(config: &FetchConfig, netrc_path: PathBuf) -> Self {
        let credentials = match &config.credentials {
            Some(credentials) => CredentialSource::Explicit(credentials.clone()),
            None => CredentialSource::Netrc {
                path: netrc_path,
                host: config.urs_host.clone(),
            },
        };

        Self {
            output_dir: config.output_dir.clone(),
            limit: config.download_limit(),
            concurrency: config.download_concurrency,
            download: DownloadOptions {
                urs_host: config.urs_host.clone(),
                ..Default::default()
            },
            credentials,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FetchSummary {
    pub links_found: usize,
    pub report: DownloadReport,
    pub manifest: Option<PathBuf>,
}

/// Fetch use case: granule search followed by authenticated downloads
pub struct FetchService<C> {
    catalog: C,
    running: Arc<AtomicBool>,
}

impl<C: GranuleCatalog> FetchService<C> {
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Share the shutdown flag with download tasks
    pub fn with_shutdown_flag(mut self, running: Arc<AtomicBool>) -> Self {
        self.running = running;
        self
    }

    /// Data links for the query
    pub async fn find_links(&self, query: &GranuleQuery) -> anyhow::Result<Vec<DataLink>> {
        let links = self
            .catalog
            .data_links(query)
            .await
            .with_context(|| format!("granule search for {:?} failed", query.collections))?;

        info!("Number of files to download: {}", links.len());
        Ok(links)
    }

    /// Search, then download up to `plan.limit` files into `plan.output_dir`
    ///
    /// Credentials are resolved before any download starts.
    pub async fn run(&self, query: &GranuleQuery, plan: &FetchPlan) -> anyhow::Result<FetchSummary> {
        let links = self.find_links(query).await?;
        let credentials = plan.credentials.resolve()?;

        let urls: Vec<String> = links
            .iter()
            .take(plan.limit.unwrap_or(usize::MAX))
            .map(|link| link.href.clone())
            .collect();

        if urls.len() < links.len() {
            info!("Limiting download to the first {} of {} files", urls.len(), links.len());
        }

        let session = EarthdataSession::new(credentials, plan.download.clone())?
            .with_shutdown_flag(Arc::clone(&self.running));

        let report = session
            .download_all(&urls, &plan.output_dir, plan.concurrency)
            .await;

        for failed in &report.failed {
            warn!(url = %failed.url, reason = %failed.reason, "Download failed");
        }
        if !report.is_complete() {
            warn!(
                "{} of {} downloads did not complete",
                report.failed.len() + report.skipped.len(),
                urls.len()
            );
        }

        let manifest = if report.succeeded.is_empty() {
            None
        } else {
            let path = report
                .write_manifest(&plan.output_dir)
                .context("failed to write download manifest")?;
            info!("Wrote manifest {}", path.display());
            Some(path)
        };

        Ok(FetchSummary {
            links_found: links.len(),
            report,
            manifest,
        })
    }
}
