//! Binary runner utilities
//!
//! Provides a standardized way to run binaries with
//! banners, logging and graceful shutdown.

use tracing::info;

/// Configuration for running a binary application
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Name of the binary (for logging)
    pub name: String,
    /// Whether Ctrl+C stops the run early
    pub interruptible: bool,
}

impl RunConfig {
    /// Create a new run configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interruptible: false,
        }
    }

    /// Mark the run as stoppable with Ctrl+C
    pub fn interruptible(mut self) -> Self {
        self.interruptible = true;
        self
    }
}

/// Trait for binary applications
///
/// Implement this trait to get the standard banner, summary
/// and shutdown messages around a single run.
#[allow(async_fn_in_trait)]
pub trait BinaryRunner {
    /// Run the application, returning a one-line summary
    async fn run(&mut self) -> anyhow::Result<String>;

    /// Get the run configuration
    fn config(&self) -> &RunConfig;

    /// Print startup banner
    fn print_banner(&self) {
        let config = self.config();
        info!("");
        info!("========================================");
        info!("Starting {}", config.name);
        if config.interruptible {
            info!("Press Ctrl+C to stop");
        }
        info!("========================================");
        info!("");
    }

    /// Print shutdown banner
    fn print_shutdown(&self, stats: Option<&str>) {
        let config = self.config();
        info!("");
        info!("========================================");
        info!("{} finished", config.name);
        if let Some(stats) = stats {
            info!("{}", stats);
        }
        info!("========================================");
    }

    /// Execute the binary with banners around the run
    async fn execute(&mut self) -> anyhow::Result<()> {
        self.print_banner();
        let result = self.run().await;
        match &result {
            Ok(summary) => self.print_shutdown(Some(summary.as_str())),
            Err(_) => self.print_shutdown(None),
        }
        result.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_config_builder() {
        let config = RunConfig::new("test-binary").interruptible();

        assert_eq!(config.name, "test-binary");
        assert!(config.interruptible);
    }

    #[test]
    fn test_default_config() {
        let config = RunConfig::new("default");
        assert!(!config.interruptible);
    }

    struct Fixed {
        config: RunConfig,
        fail: bool,
    }

    impl BinaryRunner for Fixed {
        async fn run(&mut self) -> anyhow::Result<String> {
            if self.fail {
                anyhow::bail!("boom");
            }
            Ok("done".to_string())
        }

        fn config(&self) -> &RunConfig {
            &self.config
        }
    }

    #[tokio::test]
    async fn test_execute_propagates_result() {
        let mut ok = Fixed {
            config: RunConfig::new("ok"),
            fail: false,
        };
        assert!(ok.execute().await.is_ok());

        let mut failing = Fixed {
            config: RunConfig::new("failing"),
            fail: true,
        };
        assert!(failing.execute().await.is_err());
    }
}
