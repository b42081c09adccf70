//! Folding attendance-portal courses into a result transcript.

use crate::types::{AttendanceRecord, CourseRecord, DEFAULT_ATTENDANCE_CREDIT_HOURS};
use std::collections::HashSet;

/// Append attendance courses that the results portal does not list yet.
///
/// Attendance rows carry no credit hours, so each added course gets
/// `default_credit_hours` (falling back to `"3"` when blank). Courses whose
/// code already appears in `results` are skipped, as are repeated codes
/// within `attendance` itself. Returns a new list; inputs are untouched.
pub fn merge_attendance(
    results: &[CourseRecord],
    attendance: &[AttendanceRecord],
    default_credit_hours: &str,
) -> Vec<CourseRecord> {
    let credit_hours = if default_credit_hours.trim().is_empty() {
        DEFAULT_ATTENDANCE_CREDIT_HOURS
    } else {
        default_credit_hours.trim()
    };

    let mut seen: HashSet<&str> = results.iter().map(|c| c.course_code.as_str()).collect();
    let mut merged = results.to_vec();

    for record in attendance {
        let code = record.course.course_code.as_str();
        if code.is_empty() || !seen.insert(code) {
            continue;
        }
        merged.push(record.with_credit_hours(credit_hours));
    }

    merged
}
