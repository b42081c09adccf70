//! CLI subcommand implementations for the `uafcalc` binary.

pub mod attendance_cmd;
pub mod output;
pub mod result_cmd;
pub mod serve;

use crate::config::{PortalConfig, StrategyKind};
use crate::renderer::chromium::{ChromiumRenderer, LaunchOptions};
use crate::renderer::Renderer;
use crate::service::ResultService;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

/// Command-line overrides layered on top of the environment config.
#[derive(Debug, Clone, Default)]
pub struct PortalOverrides {
    pub strategy: Option<StrategyKind>,
    pub retries: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
}

impl PortalOverrides {
    /// Environment config with these overrides applied.
    pub fn resolve(&self) -> PortalConfig {
        let mut cfg = PortalConfig::from_env();
        if let Some(strategy) = self.strategy {
            cfg.strategy = strategy;
        }
        if let Some(retries) = self.retries {
            cfg.max_attempts = retries.max(1);
        }
        if let Some(ms) = self.retry_delay_ms {
            cfg.retry_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = self.timeout_ms {
            cfg.timeout = Duration::from_millis(ms);
        }
        cfg
    }
}

/// Build the service, launching Chromium when the browser strategy is chosen.
pub async fn build_service(cfg: &PortalConfig) -> Result<ResultService> {
    let renderer: Option<Arc<dyn Renderer>> = match cfg.strategy {
        StrategyKind::Http => None,
        StrategyKind::Browser => {
            let renderer = ChromiumRenderer::new(LaunchOptions {
                user_agent: crate::config::BROWSER_USER_AGENT.to_string(),
                ignore_certificate_errors: cfg.accept_invalid_certs,
            })
            .await
            .context("browser strategy requested but Chromium failed to start")?;
            tracing::info!("Chromium renderer initialized");
            let renderer: Arc<dyn Renderer> = Arc::new(renderer);
            Some(renderer)
        }
    };

    ResultService::from_config(cfg, renderer).context("failed to build HTTP clients")
}
