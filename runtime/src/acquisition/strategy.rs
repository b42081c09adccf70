//! How one attempt at the results portal is made.
//!
//! A strategy turns a registration number into raw result-page HTML. It does
//! not validate or parse the page and does not retry; [`ResultFetcher`]
//! wraps a strategy with both.
//!
//! [`ResultFetcher`]: super::result_fetcher::ResultFetcher

use super::http_client::{CookieJar, ExpectStatus, HtmlFormClient};
use crate::config::PortalConfig;
use crate::error::{ScrapeError, ScrapeResult};
use async_trait::async_trait;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;
use uafcalc_grades::RegistrationNumber;

static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"document\.getElementById\(['"]token['"]\)\.value\s*=\s*['"]([^'"]+)['"]"#)
        .expect("valid regex")
});

/// One way of obtaining the result page.
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Make a single attempt and return the response body.
    async fn attempt(&self, registration: &RegistrationNumber) -> ScrapeResult<String>;
}

/// Pull the anti-forgery token out of the login page's inline script.
pub fn extract_token(html: &str) -> ScrapeResult<String> {
    TOKEN_PATTERN
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(ScrapeError::TokenExtraction)
}

/// The login URL up to (not including) its last `/`.
fn origin_of(login_url: &str) -> &str {
    login_url
        .rfind('/')
        .map(|i| &login_url[..i])
        .unwrap_or(login_url)
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    FetchForm,
    ExtractToken,
    Submit,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::FetchForm => "fetch_form",
            Stage::ExtractToken => "extract_token",
            Stage::Submit => "submit",
        })
    }
}

/// Replays the login form over plain HTTP.
///
/// Each attempt starts a fresh cookie session: GET the login page, read the
/// token, POST `{Register, token}` to the result URL.
pub struct HttpStrategy {
    client: HtmlFormClient,
    login_url: String,
    result_url: String,
}

impl HttpStrategy {
    pub fn new(cfg: &PortalConfig) -> ScrapeResult<Self> {
        Ok(Self {
            client: HtmlFormClient::redirecting(cfg)?,
            login_url: cfg.login_url.clone(),
            result_url: cfg.result_url.clone(),
        })
    }
}

#[async_trait]
impl FetchStrategy for HttpStrategy {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn attempt(&self, registration: &RegistrationNumber) -> ScrapeResult<String> {
        let mut jar = CookieJar::new();

        debug!(stage = %Stage::FetchForm, url = %self.login_url, "result attempt");
        let form = self.client.fetch(&self.login_url, &[], &jar).await?;
        let cookies = jar.absorb(&form);

        debug!(stage = %Stage::ExtractToken, cookies, "result attempt");
        let token = extract_token(&form.body)?;

        debug!(stage = %Stage::Submit, url = %self.result_url, "result attempt");
        let headers = vec![
            ("Origin".to_string(), origin_of(&self.login_url).to_string()),
            ("Referer".to_string(), self.login_url.clone()),
            ("Upgrade-Insecure-Requests".to_string(), "1".to_string()),
        ];
        let fields = vec![
            ("Register".to_string(), registration.to_string()),
            ("token".to_string(), token),
        ];
        let page = self
            .client
            .submit_expecting(
                &self.result_url,
                &fields,
                &jar,
                &headers,
                ExpectStatus::Exactly(200),
            )
            .await?;

        Ok(page.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token_both_quote_styles() {
        let html = r#"<script>document.getElementById('token').value = "abc123XYZ";</script>"#;
        assert_eq!(extract_token(html).unwrap(), "abc123XYZ");
        let html = r#"document.getElementById("token").value='t0k'"#;
        assert_eq!(extract_token(html).unwrap(), "t0k");
    }

    #[test]
    fn test_extract_token_missing() {
        assert!(matches!(
            extract_token("<html><body>maintenance</body></html>"),
            Err(ScrapeError::TokenExtraction)
        ));
    }

    #[test]
    fn test_origin_of() {
        assert_eq!(
            origin_of("https://lms.uaf.edu.pk/login/index.php"),
            "https://lms.uaf.edu.pk/login"
        );
    }
}
