//! Result acquisition: strategy attempt, structural checks, parse, retry.

use super::browser::BrowserStrategy;
use super::retry::RetryPolicy;
use super::strategy::{FetchStrategy, HttpStrategy};
use crate::config::{PortalConfig, StrategyKind};
use crate::error::{ScrapeError, ScrapeResult};
use crate::extraction::parse_result_page;
use crate::renderer::{NoopRenderer, Renderer};
use std::sync::Arc;
use uafcalc_grades::{RegistrationNumber, ResultDataset};

/// Build the strategy named by the config.
///
/// The browser strategy uses `renderer` when given; without one every
/// browser attempt fails.
pub fn build_strategy(
    cfg: &PortalConfig,
    renderer: Option<Arc<dyn Renderer>>,
) -> ScrapeResult<Arc<dyn FetchStrategy>> {
    let strategy: Arc<dyn FetchStrategy> = match cfg.strategy {
        StrategyKind::Http => Arc::new(HttpStrategy::new(cfg)?),
        StrategyKind::Browser => {
            let renderer = renderer.unwrap_or_else(|| Arc::new(NoopRenderer) as Arc<dyn Renderer>);
            Arc::new(BrowserStrategy::new(renderer, cfg))
        }
    };
    Ok(strategy)
}

/// Fetches and parses a student's result page.
///
/// An attempt only counts as successful once the page has passed the
/// structural checks and parsed into a non-empty dataset; anything short of
/// that is retried.
#[derive(Clone)]
pub struct ResultFetcher {
    strategy: Arc<dyn FetchStrategy>,
    policy: RetryPolicy,
    min_html_length: usize,
    marker: String,
}

impl ResultFetcher {
    pub fn new(strategy: Arc<dyn FetchStrategy>, cfg: &PortalConfig) -> Self {
        Self {
            strategy,
            policy: RetryPolicy::from_config(cfg),
            min_html_length: cfg.min_html_length,
            marker: cfg.result_marker.clone(),
        }
    }

    pub fn from_config(
        cfg: &PortalConfig,
        renderer: Option<Arc<dyn Renderer>>,
    ) -> ScrapeResult<Self> {
        Ok(Self::new(build_strategy(cfg, renderer)?, cfg))
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub async fn fetch(&self, registration: &RegistrationNumber) -> ScrapeResult<ResultDataset> {
        tracing::info!(%registration, strategy = self.strategy.name(), "fetching result");
        let dataset = self
            .policy
            .run("result", |attempt| async move {
                tracing::debug!(
                    strategy = self.strategy.name(),
                    attempt,
                    "result attempt starting"
                );
                let html = self.strategy.attempt(registration).await?;
                self.validate(&html)?;
                parse_result_page(&html)
            })
            .await?;

        tracing::info!(
            %registration,
            courses = dataset.result_table.rows.len(),
            "result fetched"
        );
        Ok(dataset)
    }

    /// Reject pages that are too short or lack the result table marker.
    pub fn validate(&self, html: &str) -> ScrapeResult<()> {
        if html.len() < self.min_html_length {
            return Err(ScrapeError::StructuralValidation(format!(
                "response too short ({} bytes)",
                html.len()
            )));
        }
        if !html.contains(&self.marker) {
            return Err(ScrapeError::StructuralValidation(
                "response missing result table".to_string(),
            ));
        }
        Ok(())
    }
}
