use anyhow::{Context, Result};
use earthdata::{
    init_tracing_with_level, netrc_path, CmrClient, FetchConfig, FetchPlan, FetchService,
    GranuleQuery, ShutdownManager,
};
use earthdata_viirs::bin_common::{load_config_from_env, BinaryRunner, ConfigType, RunConfig};
use tracing::{info, warn};

struct FetchApp {
    run_config: RunConfig,
    service: FetchService<CmrClient>,
    query: GranuleQuery,
    plan: FetchPlan,
}

impl FetchApp {
    fn new(config: &FetchConfig, shutdown: &ShutdownManager) -> Result<Self> {
        let catalog = CmrClient::new(&config.cmr_url)
            .with_max_concurrent_pages(config.page_concurrency);
        let netrc = netrc_path().context("cannot locate netrc file")?;

        Ok(Self {
            run_config: RunConfig::new("Granule fetcher").interruptible(),
            service: FetchService::new(catalog).with_shutdown_flag(shutdown.flag()),
            query: config.granule_query()?,
            plan: FetchPlan::from_config(config, netrc),
        })
    }
}

impl BinaryRunner for FetchApp {
    async fn run(&mut self) -> Result<String> {
        let summary = self.service.run(&self.query, &self.plan).await?;
        let report = &summary.report;

        if let Some(manifest) = &summary.manifest {
            info!("Manifest: {}", manifest.display());
        }

        Ok(format!(
            "Found {} files | downloaded {} ({} bytes) | failed {} | skipped {}",
            summary.links_found,
            report.succeeded.len(),
            report.total_bytes(),
            report.failed.len(),
            report.skipped.len()
        ))
    }

    fn config(&self) -> &RunConfig {
        &self.run_config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load config first (before logging is initialized)
    let config_path = load_config_from_env(ConfigType::Fetch);
    let config = FetchConfig::load(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    // Initialize logging with configured level
    init_tracing_with_level(&config.log_level);
    config.log();

    let shutdown = ShutdownManager::new();
    shutdown.spawn_signal_handler();

    let mut app = FetchApp::new(&config, &shutdown)?;
    let result = app.execute().await;
    if !shutdown.is_running() {
        warn!("Stopped by Ctrl+C; partial files were removed");
    }
    result
}
