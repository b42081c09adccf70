//! Boundary service: validation, fetching, and the response envelope.
//!
//! Callers never see scraper internals. A bad registration number gets a
//! format message; every terminal fetch failure collapses to one generic
//! message while the detailed error goes to the log.

use crate::acquisition::{AttendanceFetcher, ResultFetcher};
use crate::config::PortalConfig;
use crate::error::ScrapeResult;
use crate::renderer::Renderer;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uafcalc_grades::{
    summarize, AttendanceRecord, RegistrationNumber, ResultDataset, TranscriptSummary,
};

pub const INVALID_REGISTRATION_MESSAGE: &str = "Invalid registration number format";
pub const NOT_FOUND_MESSAGE: &str =
    "No results found for this registration number. Please check the number and try again.";
pub const ATTENDANCE_UNAVAILABLE_MESSAGE: &str =
    "Failed to fetch attendance data. Please try again later.";

/// `{"status":"success","data":…}` or `{"status":"error","message":…}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApiResponse<T> {
    Success { data: T },
    Error { message: String },
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse::Success { data }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ApiResponse::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success { .. })
    }
}

impl<T> From<Result<T, ServiceError>> for ApiResponse<T> {
    fn from(r: Result<T, ServiceError>) -> Self {
        match r {
            Ok(data) => ApiResponse::success(data),
            Err(e) => ApiResponse::error(e.to_string()),
        }
    }
}

/// Caller-facing failure. The display text is the message callers see.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{}", INVALID_REGISTRATION_MESSAGE)]
    InvalidRegistration,
    #[error("{}", NOT_FOUND_MESSAGE)]
    ResultUnavailable,
    #[error("{}", ATTENDANCE_UNAVAILABLE_MESSAGE)]
    AttendanceUnavailable,
}

/// A fetched result together with its computed grade summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultReport {
    #[serde(flatten)]
    pub dataset: ResultDataset,
    pub summary: TranscriptSummary,
}

impl ResultReport {
    pub fn new(dataset: ResultDataset) -> Self {
        let summary = summarize(&dataset.result_table.rows);
        Self { dataset, summary }
    }
}

/// Holds both fetchers for the lifetime of a process.
#[derive(Clone)]
pub struct ResultService {
    results: ResultFetcher,
    attendance: AttendanceFetcher,
}

impl ResultService {
    pub fn new(results: ResultFetcher, attendance: AttendanceFetcher) -> Self {
        Self {
            results,
            attendance,
        }
    }

    pub fn from_config(
        cfg: &PortalConfig,
        renderer: Option<Arc<dyn Renderer>>,
    ) -> ScrapeResult<Self> {
        Ok(Self::new(
            ResultFetcher::from_config(cfg, renderer)?,
            AttendanceFetcher::new(cfg)?,
        ))
    }

    /// Validate, fetch, and summarize a student's results.
    pub async fn lookup_result(&self, raw: &str) -> Result<ResultReport, ServiceError> {
        let registration = parse_registration(raw)?;
        match self.results.fetch(&registration).await {
            Ok(dataset) => Ok(ResultReport::new(dataset)),
            Err(e) => {
                tracing::error!(%registration, kind = e.kind(), "result fetch failed: {e}");
                Err(ServiceError::ResultUnavailable)
            }
        }
    }

    /// Validate and fetch a student's attendance records.
    pub async fn lookup_attendance(
        &self,
        raw: &str,
    ) -> Result<Vec<AttendanceRecord>, ServiceError> {
        let registration = parse_registration(raw)?;
        self.attendance.fetch(&registration).await.map_err(|e| {
            tracing::error!(%registration, kind = e.kind(), "attendance fetch failed: {e}");
            ServiceError::AttendanceUnavailable
        })
    }

    pub async fn fetch_result(&self, raw: &str) -> ApiResponse<ResultReport> {
        self.lookup_result(raw).await.into()
    }

    pub async fn fetch_attendance(&self, raw: &str) -> ApiResponse<Vec<AttendanceRecord>> {
        self.lookup_attendance(raw).await.into()
    }
}

fn parse_registration(raw: &str) -> Result<RegistrationNumber, ServiceError> {
    RegistrationNumber::parse(raw).map_err(|_| {
        tracing::debug!(raw, "rejecting malformed registration number");
        ServiceError::InvalidRegistration
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_shape() {
        let ok: ApiResponse<Vec<u32>> = ApiResponse::success(vec![1, 2]);
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"status": "success", "data": [1, 2]})
        );
        let err: ApiResponse<()> = Err::<(), _>(ServiceError::InvalidRegistration).into();
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"status": "error", "message": "Invalid registration number format"})
        );
    }

    #[test]
    fn test_envelope_roundtrip_from_json() {
        let parsed: ApiResponse<Vec<String>> =
            serde_json::from_value(json!({"status": "error", "message": "nope"})).unwrap();
        assert_eq!(parsed, ApiResponse::error("nope"));
        assert!(!parsed.is_success());
    }

    #[tokio::test]
    async fn test_invalid_registration_short_circuits() {
        let cfg = PortalConfig::with_base_url("http://127.0.0.1:9");
        let service = ResultService::from_config(&cfg, None).unwrap();
        let response = service.fetch_result("not-a-number").await;
        assert_eq!(response, ApiResponse::error(INVALID_REGISTRATION_MESSAGE));
        let response = service.fetch_attendance("2022-xx-1").await;
        assert_eq!(response, ApiResponse::error(INVALID_REGISTRATION_MESSAGE));
    }
}
