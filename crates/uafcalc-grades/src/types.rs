//! Core data types for scraped course results and student records.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Marker appended to the teacher name of a course whose reported marks come
/// from a later attempt than the one it is filed under.
pub const IMPROVED_MARKER: &str = "(Improved)";

/// Credit hours assumed for attendance courses when the caller gives none.
pub const DEFAULT_ATTENDANCE_CREDIT_HOURS: &str = "3";

static REGISTRATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\d{4}-ag-\d{1,6}$").expect("valid regex"));

/// One course attempt as reported by the results portal.
///
/// Every field is kept as the portal rendered it. Numeric interpretation
/// happens in the grading functions, which tolerate malformed values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub sr: String,
    pub semester: String,
    pub teacher_name: String,
    pub course_code: String,
    pub course_title: String,
    /// `"N"` or `"N(x-y)"`; only the leading integer matters.
    pub credit_hours: String,
    pub mid: String,
    pub assignment: String,
    #[serde(rename = "final")]
    pub final_marks: String,
    pub practical: String,
    pub total: String,
    pub grade: String,
}

impl CourseRecord {
    /// Whether this record carries the improvement marker.
    pub fn is_improved(&self) -> bool {
        self.teacher_name.trim_end().ends_with(IMPROVED_MARKER)
    }

    /// Copy of this record tagged as an improvement.
    ///
    /// Already-tagged records are returned unchanged.
    pub fn marked_improved(&self) -> Self {
        if self.is_improved() {
            return self.clone();
        }
        let teacher_name = if self.teacher_name.trim().is_empty() {
            IMPROVED_MARKER.to_string()
        } else {
            format!("{} {IMPROVED_MARKER}", self.teacher_name.trim_end())
        };
        Self {
            teacher_name,
            ..self.clone()
        }
    }

    /// Copy of this record filed under another semester.
    pub fn in_semester(&self, semester: &str) -> Self {
        Self {
            semester: semester.to_string(),
            ..self.clone()
        }
    }
}

/// Student identity scraped from the label/value table of the results page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentInfo {
    pub student_full_name: String,
    pub registration_number: String,
    /// Remaining label/value pairs, keyed by the normalized label.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

/// Page-level metadata of a results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultMetadata {
    pub title: String,
    pub header_image: String,
}

impl Default for ResultMetadata {
    fn default() -> Self {
        Self {
            title: "Result Award List".to_string(),
            header_image: "lms-head.png".to_string(),
        }
    }
}

/// The course table with the header order it was discovered in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTable {
    pub headers: Vec<String>,
    pub rows: Vec<CourseRecord>,
}

/// Everything one successful results fetch produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultDataset {
    pub metadata: ResultMetadata,
    pub student_info: StudentInfo,
    pub result_table: ResultTable,
}

/// A course row from the attendance portal.
///
/// Same shape as [`CourseRecord`] but the attendance portal has no credit
/// hours column, so `credit_hours` is always empty until a caller supplies it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttendanceRecord {
    pub course: CourseRecord,
}

impl AttendanceRecord {
    pub fn new(course: CourseRecord) -> Self {
        Self {
            course: CourseRecord {
                credit_hours: String::new(),
                ..course
            },
        }
    }

    /// Convert into a gradeable course record with the given credit hours.
    pub fn with_credit_hours(&self, credit_hours: &str) -> CourseRecord {
        CourseRecord {
            credit_hours: credit_hours.to_string(),
            ..self.course.clone()
        }
    }
}

/// A validated registration number such as `2022-ag-7693`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegistrationNumber(String);

impl RegistrationNumber {
    /// Validate a registration number (case-insensitive `YYYY-ag-N`).
    pub fn parse(raw: &str) -> GradeResult<Self> {
        let trimmed = raw.trim();
        if REGISTRATION_PATTERN.is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(GradeError::InvalidRegistration(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistrationNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for RegistrationNumber {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RegistrationNumber {
    type Error = GradeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RegistrationNumber> for String {
    fn from(value: RegistrationNumber) -> Self {
        value.0
    }
}

/// Errors raised by this crate.
///
/// The grading functions themselves never fail; only input validation does.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GradeError {
    #[error("Invalid registration number: {0}")]
    InvalidRegistration(String),
}

/// Convenience result type.
pub type GradeResult<T> = Result<T, GradeError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn course(teacher: &str) -> CourseRecord {
        CourseRecord {
            teacher_name: teacher.to_string(),
            course_code: "CS-101".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_registration_accepts_mixed_case() {
        assert!(RegistrationNumber::parse("2022-ag-7693").is_ok());
        assert!(RegistrationNumber::parse("2022-AG-7693").is_ok());
        assert!(RegistrationNumber::parse(" 2019-ag-1 ").is_ok());
    }

    #[test]
    fn test_registration_rejects_malformed() {
        for bad in ["", "2022-ag-", "22-ag-7693", "2022-bs-7693", "2022-ag-1234567"] {
            assert!(RegistrationNumber::parse(bad).is_err(), "{bad} should fail");
        }
    }

    #[test]
    fn test_marked_improved_appends_once() {
        let c = course("Dr. Khan").marked_improved();
        assert_eq!(c.teacher_name, "Dr. Khan (Improved)");
        assert!(c.is_improved());
        assert_eq!(c.marked_improved().teacher_name, "Dr. Khan (Improved)");
    }

    #[test]
    fn test_marked_improved_without_teacher() {
        assert_eq!(course("").marked_improved().teacher_name, "(Improved)");
    }

    #[test]
    fn test_attendance_record_drops_credit_hours() {
        let mut c = course("N/A");
        c.credit_hours = "4".to_string();
        let a = AttendanceRecord::new(c);
        assert!(a.course.credit_hours.is_empty());
        assert_eq!(a.with_credit_hours("3").credit_hours, "3");
    }

    #[test]
    fn test_student_info_flattens_extra_fields() {
        let mut info = StudentInfo {
            student_full_name: "Ayesha".to_string(),
            registration_number: "2022-ag-7693".to_string(),
            ..Default::default()
        };
        info.extra.insert("degree".to_string(), "BSCS".to_string());
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["degree"], "BSCS");
        assert_eq!(json["student_full_name"], "Ayesha");
    }
}
