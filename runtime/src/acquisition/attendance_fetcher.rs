//! Attendance acquisition against the ASP.NET student portal.
//!
//! One attempt walks a fixed sequence of stages with a fresh cookie jar:
//!
//! 1. `LoadForm`: GET the search page and read its hidden state fields.
//! 2. `Search`: POST the registration number; the portal answers `302` and
//!    sets the session cookie. This redirect is not followed; the two page
//!    loads follow redirects as a browser would.
//! 3. `Detail`: GET the student detail page with that cookie and parse it.

use super::http_client::{CookieJar, ExpectStatus, HtmlFormClient};
use super::retry::RetryPolicy;
use crate::config::PortalConfig;
use crate::error::{ScrapeError, ScrapeResult};
use crate::extraction::attendance_page::{extract_form_state, parse_attendance_page};
use std::fmt;
use tracing::debug;
use uafcalc_grades::{AttendanceRecord, RegistrationNumber};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    LoadForm,
    Search,
    Detail,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::LoadForm => "load_form",
            Stage::Search => "search",
            Stage::Detail => "detail",
        })
    }
}

/// Fetches a student's current-semester attendance records.
#[derive(Clone)]
pub struct AttendanceFetcher {
    pages: HtmlFormClient,
    search: HtmlFormClient,
    policy: RetryPolicy,
    form_url: String,
    search_url: String,
    detail_url: String,
}

impl AttendanceFetcher {
    pub fn new(cfg: &PortalConfig) -> ScrapeResult<Self> {
        Ok(Self {
            pages: HtmlFormClient::redirecting(cfg)?,
            search: HtmlFormClient::non_redirecting(cfg)?,
            policy: RetryPolicy::from_config(cfg),
            form_url: cfg.attendance_url.clone(),
            search_url: cfg.attendance_default_url.clone(),
            detail_url: cfg.attendance_detail_url.clone(),
        })
    }

    pub async fn fetch(
        &self,
        registration: &RegistrationNumber,
    ) -> ScrapeResult<Vec<AttendanceRecord>> {
        tracing::info!(%registration, "fetching attendance");
        let records = self
            .policy
            .run("attendance", |_| self.attempt(registration))
            .await?;

        tracing::info!(%registration, courses = records.len(), "attendance fetched");
        Ok(records)
    }

    async fn attempt(
        &self,
        registration: &RegistrationNumber,
    ) -> ScrapeResult<Vec<AttendanceRecord>> {
        let mut jar = CookieJar::new();

        debug!(stage = %Stage::LoadForm, url = %self.form_url, "attendance attempt");
        let form = self.pages.fetch(&self.form_url, &[], &jar).await?;
        jar.absorb(&form);
        let state = extract_form_state(&form.body)?;

        debug!(stage = %Stage::Search, url = %self.search_url, "attendance attempt");
        let headers = vec![
            ("Origin".to_string(), self.form_url.clone()),
            ("Referer".to_string(), self.form_url.clone()),
            ("Upgrade-Insecure-Requests".to_string(), "1".to_string()),
        ];
        let search = self
            .search
            .submit_expecting(
                &self.search_url,
                &state.search_fields(registration.as_str()),
                &jar,
                &headers,
                ExpectStatus::Exactly(302),
            )
            .await?;
        if jar.absorb(&search) == 0 {
            return Err(ScrapeError::SessionCookieMissing);
        }

        debug!(
            stage = %Stage::Detail,
            url = %self.detail_url,
            cookies = jar.len(),
            "attendance attempt"
        );
        let headers = vec![
            ("Referer".to_string(), self.search_url.clone()),
            ("Upgrade-Insecure-Requests".to_string(), "1".to_string()),
        ];
        let detail = self.pages.fetch(&self.detail_url, &headers, &jar).await?;

        parse_attendance_page(&detail.body)
    }
}
