//! Portal configuration and resolution from the environment.
//!
//! Defaults point at the production portals. Each field can be overridden
//! with a `UAFCALC_*` environment variable; values that fail to parse are
//! ignored with a warning and the default is kept.

use std::str::FromStr;
use std::time::Duration;

/// Attempts per fetch, shared by the result and attendance fetchers.
pub const MAX_ATTEMPTS: u32 = 3;

/// Fixed pause between attempts.
pub const RETRY_DELAY_MS: u64 = 1000;

/// Per-request timeout. The portals are slow.
pub const REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Result pages shorter than this are rejected without parsing.
pub const MIN_HTML_LENGTH: usize = 100;

/// Markup that every genuine result page contains.
pub const RESULT_TABLE_MARKER: &str = r#"table class="table tab-content""#;

/// Identity string sent to both portals.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                                      AppleWebKit/537.36 (KHTML, like Gecko) \
                                      Chrome/139.0.0.0 Safari/537.36";

const ENV_PREFIX: &str = "UAFCALC_";

/// How the results portal is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    /// Replay the login form over plain HTTP.
    #[default]
    Http,
    /// Drive a headless Chromium through the form.
    Browser,
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" | "raw" => Ok(StrategyKind::Http),
            "browser" | "chromium" => Ok(StrategyKind::Browser),
            other => Err(format!("unknown strategy '{other}' (expected http or browser)")),
        }
    }
}

/// Addresses and tuning for both upstream portals.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub login_url: String,
    pub result_url: String,
    pub attendance_url: String,
    pub attendance_default_url: String,
    pub attendance_detail_url: String,
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub timeout: Duration,
    pub min_html_length: usize,
    pub result_marker: String,
    pub strategy: StrategyKind,
    /// The results portal's certificate chain does not validate.
    pub accept_invalid_certs: bool,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            login_url: "https://lms.uaf.edu.pk/login/index.php".to_string(),
            result_url: "https://lms.uaf.edu.pk/course/uaf_student_result.php".to_string(),
            attendance_url: "http://121.52.152.24/".to_string(),
            attendance_default_url: "http://121.52.152.24/default.aspx".to_string(),
            attendance_detail_url: "http://121.52.152.24/StudentDetail.aspx".to_string(),
            max_attempts: MAX_ATTEMPTS,
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
            timeout: Duration::from_millis(REQUEST_TIMEOUT_MS),
            min_html_length: MIN_HTML_LENGTH,
            result_marker: RESULT_TABLE_MARKER.to_string(),
            strategy: StrategyKind::Http,
            accept_invalid_certs: true,
        }
    }
}

impl PortalConfig {
    /// Defaults overlaid with any `UAFCALC_*` environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        env_url("LOGIN_URL", &mut cfg.login_url);
        env_url("RESULT_URL", &mut cfg.result_url);
        env_url("ATTENDANCE_URL", &mut cfg.attendance_url);
        env_url("ATTENDANCE_DEFAULT_URL", &mut cfg.attendance_default_url);
        env_url("ATTENDANCE_DETAIL_URL", &mut cfg.attendance_detail_url);
        env_into("MAX_ATTEMPTS", &mut cfg.max_attempts);
        env_into("MIN_HTML_LENGTH", &mut cfg.min_html_length);
        env_into("RESULT_MARKER", &mut cfg.result_marker);
        env_into("STRATEGY", &mut cfg.strategy);
        env_into("ACCEPT_INVALID_CERTS", &mut cfg.accept_invalid_certs);

        let mut retry_ms = cfg.retry_delay.as_millis() as u64;
        env_into("RETRY_DELAY_MS", &mut retry_ms);
        cfg.retry_delay = Duration::from_millis(retry_ms);

        let mut timeout_ms = cfg.timeout.as_millis() as u64;
        env_into("TIMEOUT_MS", &mut timeout_ms);
        cfg.timeout = Duration::from_millis(timeout_ms);

        cfg.max_attempts = cfg.max_attempts.max(1);
        cfg
    }

    /// Point both portals at one base URL. Used against mock servers.
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            login_url: format!("{base}/login/index.php"),
            result_url: format!("{base}/course/uaf_student_result.php"),
            attendance_url: format!("{base}/"),
            attendance_default_url: format!("{base}/default.aspx"),
            attendance_detail_url: format!("{base}/StudentDetail.aspx"),
            ..Self::default()
        }
    }
}

/// Settings for the REST boundary.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Shared secret for request signatures; `None` disables verification.
    pub secret_key: Option<String>,
    /// Origins allowed by CORS. Empty means [`DEFAULT_ALLOWED_ORIGINS`].
    pub allowed_origins: Vec<String>,
}

/// Origins allowed by CORS when none are configured.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "http://localhost:3000",
    "https://uafcalculator.live",
    "https://www.uafcalculator.live",
];

pub fn default_allowed_origins() -> Vec<String> {
    DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect()
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let secret_key = env_var("SECRET_KEY").filter(|s| !s.trim().is_empty());
        let allowed_origins: Vec<String> = env_var("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        let allowed_origins = if allowed_origins.is_empty() {
            default_allowed_origins()
        } else {
            allowed_origins
        };
        Self {
            secret_key,
            allowed_origins,
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{name}")).ok()
}

fn env_into<T: FromStr>(name: &str, slot: &mut T) {
    let Some(raw) = env_var(name) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(v) => *slot = v,
        Err(_) => tracing::warn!("ignoring unparsable {ENV_PREFIX}{name}={raw:?}"),
    }
}

/// Like [`env_into`], but the value must be an absolute http(s) URL.
fn env_url(name: &str, slot: &mut String) {
    let Some(raw) = env_var(name) else {
        return;
    };
    match url::Url::parse(raw.trim()) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => *slot = u.to_string(),
        _ => tracing::warn!("ignoring invalid URL in {ENV_PREFIX}{name}={raw:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_portals() {
        let cfg = PortalConfig::default();
        assert_eq!(cfg.max_attempts, 3);
        assert_eq!(cfg.retry_delay, Duration::from_secs(1));
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert!(cfg.result_url.ends_with("uaf_student_result.php"));
        assert_eq!(cfg.strategy, StrategyKind::Http);
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("HTTP".parse::<StrategyKind>(), Ok(StrategyKind::Http));
        assert_eq!("chromium".parse::<StrategyKind>(), Ok(StrategyKind::Browser));
        assert!("curl".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn test_with_base_url() {
        let cfg = PortalConfig::with_base_url("http://127.0.0.1:9999/");
        assert_eq!(cfg.login_url, "http://127.0.0.1:9999/login/index.php");
        assert_eq!(cfg.attendance_url, "http://127.0.0.1:9999/");
        assert_eq!(cfg.attendance_detail_url, "http://127.0.0.1:9999/StudentDetail.aspx");
    }
}
