//! Error taxonomy for portal acquisition and page extraction.

use uafcalc_grades::GradeError;

/// All errors that can occur while fetching or extracting portal data.
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    /// DNS failure, connection reset, timeout, or an unexpected HTTP status.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The page is too short or lacks the expected structural marker.
    #[error("Structural validation failed: {0}")]
    StructuralValidation(String),

    #[error("Failed to extract authentication token from login page")]
    TokenExtraction,

    #[error("Hidden form field missing: {0}")]
    HiddenFieldMissing(&'static str),

    #[error("No session cookie found in response")]
    SessionCookieMissing,

    #[error("Required student information missing: {0}")]
    RequiredFieldMissing(&'static str),

    #[error("No result data found")]
    EmptyResult,

    /// Browser automation failed (launch, navigation, selector lookup).
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Invalid registration number: {0}")]
    InvalidRegistration(String),
}

impl ScrapeError {
    /// Short machine-readable tag, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ScrapeError::Transport(_) => "transport",
            ScrapeError::StructuralValidation(_) => "structural_validation",
            ScrapeError::TokenExtraction => "token_extraction",
            ScrapeError::HiddenFieldMissing(_) => "hidden_field_missing",
            ScrapeError::SessionCookieMissing => "session_cookie_missing",
            ScrapeError::RequiredFieldMissing(_) => "required_field_missing",
            ScrapeError::EmptyResult => "empty_result",
            ScrapeError::Browser(_) => "browser",
            ScrapeError::InvalidRegistration(_) => "invalid_registration",
        }
    }

    /// Whether another attempt could plausibly succeed.
    ///
    /// Everything that depends on the upstream is retryable; a malformed
    /// registration number is not.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ScrapeError::InvalidRegistration(_))
    }
}

impl From<reqwest::Error> for ScrapeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ScrapeError::Transport(format!("request timed out: {e}"))
        } else {
            ScrapeError::Transport(e.to_string())
        }
    }
}

impl From<GradeError> for ScrapeError {
    fn from(e: GradeError) -> Self {
        match e {
            GradeError::InvalidRegistration(raw) => ScrapeError::InvalidRegistration(raw),
        }
    }
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_registration_not_retryable() {
        assert!(!ScrapeError::InvalidRegistration("x".into()).is_retryable());
        assert!(ScrapeError::EmptyResult.is_retryable());
        assert!(ScrapeError::Transport("reset".into()).is_retryable());
    }

    #[test]
    fn test_grade_error_converts() {
        let err: ScrapeError = GradeError::InvalidRegistration("abc".into()).into();
        assert_eq!(err.kind(), "invalid_registration");
    }
}
