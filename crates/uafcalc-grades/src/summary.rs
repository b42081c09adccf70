//! Transcript summaries: per-semester GPA plus the cumulative CGPA.

use crate::grading::{credit_hours, overall_gpa, semester_gpa, to_percentage};
use crate::semester::group_by_semester;
use crate::types::CourseRecord;
use serde::{Deserialize, Serialize};

/// One semester of a transcript summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterSummary {
    pub semester: String,
    /// 1-based chronological position.
    pub number: usize,
    pub gpa: f64,
    pub percentage: f64,
    pub credit_hours: u32,
    pub courses: Vec<CourseRecord>,
}

/// GPA figures derived from a list of course attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSummary {
    pub cgpa: f64,
    pub percentage: f64,
    pub total_credit_hours: u32,
    /// Oldest semester first.
    pub semesters: Vec<SemesterSummary>,
}

/// Summarize a transcript. Computed fresh on every call.
pub fn summarize(courses: &[CourseRecord]) -> TranscriptSummary {
    let semesters: Vec<SemesterSummary> = group_by_semester(courses)
        .into_iter()
        .enumerate()
        .map(|(i, group)| {
            let gpa = semester_gpa(&group.courses);
            SemesterSummary {
                semester: group.semester,
                number: i + 1,
                gpa,
                percentage: to_percentage(gpa),
                credit_hours: sum_credit_hours(&group.courses),
                courses: group.courses,
            }
        })
        .collect();

    let cgpa = overall_gpa(courses);
    TranscriptSummary {
        cgpa,
        percentage: to_percentage(cgpa),
        total_credit_hours: semesters.iter().map(|s| s.credit_hours).sum(),
        semesters,
    }
}

fn sum_credit_hours(courses: &[CourseRecord]) -> u32 {
    courses
        .iter()
        .filter_map(|c| credit_hours(&c.credit_hours))
        .sum()
}
