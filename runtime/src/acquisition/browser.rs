//! Browser-driven result attempts.

use super::strategy::FetchStrategy;
use crate::config::PortalConfig;
use crate::error::{ScrapeError, ScrapeResult};
use crate::renderer::{RenderContext, Renderer};
use async_trait::async_trait;
use std::sync::Arc;
use uafcalc_grades::RegistrationNumber;

/// Registration input selectors, most specific first.
pub const REGISTRATION_INPUT_SELECTORS: [&str; 3] =
    ["input#REG[name='Register']", "input[name='Register']", "#REG"];

/// Submit control selectors, most specific first.
pub const SUBMIT_SELECTORS: [&str; 3] = [
    "input[type='submit'][value='Result']",
    "button[type='submit']",
    "input[type='submit']",
];

/// Fills and submits the login form in a headless browser tab.
///
/// Each attempt opens a fresh context and always closes it.
pub struct BrowserStrategy {
    renderer: Arc<dyn Renderer>,
    login_url: String,
    timeout_ms: u64,
}

impl BrowserStrategy {
    pub fn new(renderer: Arc<dyn Renderer>, cfg: &PortalConfig) -> Self {
        Self {
            renderer,
            login_url: cfg.login_url.clone(),
            timeout_ms: cfg.timeout.as_millis() as u64,
        }
    }

    async fn drive(
        &self,
        ctx: &mut dyn RenderContext,
        registration: &RegistrationNumber,
    ) -> anyhow::Result<String> {
        ctx.navigate(&self.login_url, self.timeout_ms).await?;

        let input = first_present(ctx, &REGISTRATION_INPUT_SELECTORS)
            .await?
            .ok_or_else(|| anyhow::anyhow!("registration input not found"))?;
        ctx.type_into(input, registration.as_str()).await?;

        let submit = first_present(ctx, &SUBMIT_SELECTORS)
            .await?
            .ok_or_else(|| anyhow::anyhow!("submit control not found"))?;
        ctx.click(submit).await?;
        ctx.wait_for_navigation(self.timeout_ms).await?;

        ctx.get_html().await
    }
}

async fn first_present(
    ctx: &dyn RenderContext,
    candidates: &[&'static str],
) -> anyhow::Result<Option<&'static str>> {
    for selector in candidates {
        if ctx.has_element(selector).await? {
            return Ok(Some(*selector));
        }
    }
    Ok(None)
}

#[async_trait]
impl FetchStrategy for BrowserStrategy {
    fn name(&self) -> &'static str {
        "browser"
    }

    async fn attempt(&self, registration: &RegistrationNumber) -> ScrapeResult<String> {
        let mut ctx = self
            .renderer
            .new_context()
            .await
            .map_err(|e| ScrapeError::Browser(format!("{e:#}")))?;

        let outcome = self.drive(ctx.as_mut(), registration).await;
        if let Err(e) = ctx.close().await {
            tracing::debug!("closing browser context failed: {e:#}");
        }

        outcome.map_err(|e| ScrapeError::Browser(format!("{e:#}")))
    }
}
