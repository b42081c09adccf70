//! Async form client wrapping reqwest.
//!
//! Not a browser: only GETs and url-encoded POSTs with a caller-owned cookie
//! jar. No retries happen here; the fetchers own the retry policy. Any status
//! other than the one the caller expects surfaces as a transport error.

use crate::config::{PortalConfig, BROWSER_USER_AGENT};
use crate::error::{ScrapeError, ScrapeResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CACHE_CONTROL, COOKIE, PRAGMA};
use std::time::Duration;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,\
                           image/avif,image/webp,image/apng,*/*;q=0.8";

/// Response from a GET or POST, body included.
#[derive(Debug, Clone)]
pub struct RawPage {
    /// Requested URL.
    pub url: String,
    /// Final URL after redirects.
    pub final_url: String,
    /// HTTP status code.
    pub status: u16,
    /// All response headers except `set-cookie`.
    pub headers: Vec<(String, String)>,
    /// Raw `Set-Cookie` header values, in order.
    pub set_cookies: Vec<String>,
    /// Response body as text.
    pub body: String,
}

impl RawPage {
    /// Look up a response header by (lowercase) name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Name/value cookies carried across the calls of one logical session.
///
/// Insertion order is kept; a cookie set again replaces its earlier value.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: Vec<(String, String)>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store every cookie a response set. Returns how many were stored.
    pub fn absorb(&mut self, page: &RawPage) -> usize {
        page.set_cookies
            .iter()
            .filter_map(|raw| parse_set_cookie(raw))
            .map(|(name, value)| self.set(name, value))
            .count()
    }

    pub fn set(&mut self, name: String, value: String) {
        match self.cookies.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.cookies.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Render as a `Cookie` request header value, if any cookie is held.
    pub fn header_value(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(n, v)| format!("{n}={v}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// Extract `name=value` from a `Set-Cookie` header, dropping attributes.
fn parse_set_cookie(raw: &str) -> Option<(String, String)> {
    let pair = raw.split(';').next()?.trim();
    let (name, value) = pair.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), value.trim().to_string()))
}

/// Which response statuses count as success for a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectStatus {
    /// Any 2xx.
    Success,
    /// Exactly this status and nothing else.
    Exactly(u16),
}

impl ExpectStatus {
    fn accepts(self, status: u16) -> bool {
        match self {
            ExpectStatus::Success => (200..300).contains(&status),
            ExpectStatus::Exactly(code) => status == code,
        }
    }
}

/// Construction options for [`HtmlFormClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout: Duration,
    /// Follow up to 5 redirects, or none at all.
    pub follow_redirects: bool,
    pub accept_invalid_certs: bool,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            follow_redirects: true,
            accept_invalid_certs: false,
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }
}

/// HTTP client that replays server-rendered HTML forms.
#[derive(Clone)]
pub struct HtmlFormClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HtmlFormClient {
    /// Create a client with browser-like default headers.
    pub fn new(options: ClientOptions) -> ScrapeResult<Self> {
        let mut defaults = HeaderMap::new();
        defaults.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        defaults.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        defaults.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        let redirect = if options.follow_redirects {
            reqwest::redirect::Policy::limited(5)
        } else {
            reqwest::redirect::Policy::none()
        };

        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .redirect(redirect)
            .user_agent(options.user_agent)
            .default_headers(defaults)
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            timeout: options.timeout,
        })
    }

    /// Client that follows up to 5 redirects. Used for page loads.
    pub fn redirecting(cfg: &PortalConfig) -> ScrapeResult<Self> {
        Self::new(ClientOptions {
            timeout: cfg.timeout,
            follow_redirects: true,
            accept_invalid_certs: cfg.accept_invalid_certs,
            ..ClientOptions::default()
        })
    }

    /// Client that never follows redirects, for the attendance search POST
    /// whose `302` must be observed.
    pub fn non_redirecting(cfg: &PortalConfig) -> ScrapeResult<Self> {
        Self::new(ClientOptions {
            timeout: cfg.timeout,
            follow_redirects: false,
            accept_invalid_certs: cfg.accept_invalid_certs,
            ..ClientOptions::default()
        })
    }

    /// GET a page, sending the jar's cookies. Non-2xx is an error.
    pub async fn fetch(
        &self,
        url: &str,
        headers: &[(String, String)],
        jar: &CookieJar,
    ) -> ScrapeResult<RawPage> {
        let builder = self.client.get(url);
        self.send(builder, url, headers, jar, ExpectStatus::Success)
            .await
    }

    /// POST url-encoded form fields, sending the jar's cookies. Non-2xx is an error.
    pub async fn submit(
        &self,
        url: &str,
        fields: &[(String, String)],
        jar: &CookieJar,
        headers: &[(String, String)],
    ) -> ScrapeResult<RawPage> {
        self.submit_expecting(url, fields, jar, headers, ExpectStatus::Success)
            .await
    }

    /// POST url-encoded form fields and require a specific status.
    pub async fn submit_expecting(
        &self,
        url: &str,
        fields: &[(String, String)],
        jar: &CookieJar,
        headers: &[(String, String)],
        expect: ExpectStatus,
    ) -> ScrapeResult<RawPage> {
        let builder = self.client.post(url).form(fields);
        self.send(builder, url, headers, jar, expect).await
    }

    async fn send(
        &self,
        mut builder: reqwest::RequestBuilder,
        url: &str,
        headers: &[(String, String)],
        jar: &CookieJar,
        expect: ExpectStatus,
    ) -> ScrapeResult<RawPage> {
        builder = builder.timeout(self.timeout);
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(cookie) = jar.header_value() {
            builder = builder.header(COOKIE, cookie);
        }

        let r = builder.send().await?;
        let status = r.status().as_u16();
        let final_url = r.url().to_string();

        if !expect.accepts(status) {
            return Err(ScrapeError::Transport(format!(
                "{url} responded with status {status}"
            )));
        }

        let set_cookies: Vec<String> = r
            .headers()
            .get_all(reqwest::header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .collect();

        let headers: Vec<(String, String)> = r
            .headers()
            .iter()
            .filter(|(k, _)| k.as_str() != "set-cookie")
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        let body = r.text().await?;

        Ok(RawPage {
            url: url.to_string(),
            final_url,
            status,
            headers,
            set_cookies,
            body,
        })
    }
}
