//! Semester ordering, grouping, and best-attempt reconciliation.
//!
//! Semester labels look like `"Spring 2022-2023"` or `"Winter 2024-25"`.
//! Chronological order is the academic start year, then the season within
//! that year (Winter, Spring, Summer). Labels without a recognizable year
//! sort first; labels without a recognizable season sort first within
//! their year.

use crate::grading::{grade_points, marks};
use crate::types::CourseRecord;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::LazyLock;

static ACADEMIC_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})[-/](\d{2,4})").expect("valid regex"));

/// Season within an academic year, in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Unknown,
    Winter,
    Spring,
    Summer,
}

impl Season {
    fn from_label(label: &str) -> Self {
        let lower = label.to_ascii_lowercase();
        if lower.contains("winter") {
            Season::Winter
        } else if lower.contains("spring") {
            Season::Spring
        } else if lower.contains("summer") {
            Season::Summer
        } else {
            Season::Unknown
        }
    }
}

/// Sort key parsed from a semester label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SemesterKey {
    pub start_year: u32,
    pub end_year: u32,
    pub season: Season,
}

impl SemesterKey {
    /// Parse the academic year (`YYYY-YYYY` or `YYYY-YY`) and season of a label.
    pub fn parse(label: &str) -> Self {
        let (start_year, end_year) = ACADEMIC_YEAR
            .captures(label)
            .and_then(|caps| {
                let start: u32 = caps.get(1)?.as_str().parse().ok()?;
                let mut end: u32 = caps.get(2)?.as_str().parse().ok()?;
                if end < 100 {
                    end += start / 100 * 100;
                }
                Some((start, end))
            })
            .unwrap_or((0, 0));

        Self {
            start_year,
            end_year,
            season: Season::from_label(label),
        }
    }

    fn ordering_key(&self) -> (u32, Season) {
        (self.start_year, self.season)
    }
}

/// Chronological comparison of two semester labels.
pub fn compare_semesters(a: &str, b: &str) -> Ordering {
    SemesterKey::parse(a)
        .ordering_key()
        .cmp(&SemesterKey::parse(b).ordering_key())
}

/// The courses filed under one semester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterGroup {
    pub semester: String,
    pub courses: Vec<CourseRecord>,
}

/// Whether `challenger` beats `incumbent` as the reported attempt.
///
/// Strictly higher grade points win; equal points fall back to strictly
/// higher total marks. Anything else keeps the incumbent.
fn outscores(challenger: &CourseRecord, incumbent: &CourseRecord) -> bool {
    let (c, i) = (grade_points(challenger), grade_points(incumbent));
    if c != i {
        return c > i;
    }
    marks(&challenger.total).unwrap_or(0.0) > marks(&incumbent.total).unwrap_or(0.0)
}

/// Reduce repeated attempts of a course to one record per course code.
///
/// The reported marks and grade come from the best attempt, while the record
/// stays filed under the semester of the earliest attempt. When the best
/// attempt was taken in a different semester its teacher name carries the
/// improvement marker. Output order follows first appearance of each code.
pub fn best_attempts(courses: &[CourseRecord]) -> Vec<CourseRecord> {
    let mut order: Vec<&str> = Vec::new();
    let mut attempts: HashMap<&str, Vec<&CourseRecord>> = HashMap::new();

    for course in courses {
        let code = course.course_code.as_str();
        attempts
            .entry(code)
            .or_insert_with(|| {
                order.push(code);
                Vec::new()
            })
            .push(course);
    }

    order
        .into_iter()
        .filter_map(|code| {
            let mut tries = attempts.remove(code)?;
            // Stable: equal semesters keep list order.
            tries.sort_by(|a, b| compare_semesters(&a.semester, &b.semester));

            let original = tries[0];
            let best = tries[1..]
                .iter()
                .copied()
                .fold(original, |kept, next| if outscores(next, kept) { next } else { kept });

            if best.semester == original.semester {
                Some(best.clone())
            } else {
                tracing::debug!(
                    course = code,
                    filed_under = %original.semester,
                    improved_in = %best.semester,
                    "keeping improved attempt"
                );
                Some(best.in_semester(&original.semester).marked_improved())
            }
        })
        .collect()
}

/// Group courses by semester after reconciling repeated attempts.
///
/// Groups are returned oldest first. Courses inside a group keep the order
/// in which their codes first appeared.
pub fn group_by_semester(courses: &[CourseRecord]) -> Vec<SemesterGroup> {
    let mut groups: Vec<SemesterGroup> = Vec::new();

    for course in best_attempts(courses) {
        match groups.iter_mut().find(|g| g.semester == course.semester) {
            Some(group) => group.courses.push(course),
            None => groups.push(SemesterGroup {
                semester: course.semester.clone(),
                courses: vec![course],
            }),
        }
    }

    groups.sort_by(|a, b| compare_semesters(&a.semester, &b.semester));
    groups
}

/// Distinct semester labels in chronological order, after reconciliation.
pub fn sorted_semesters(courses: &[CourseRecord]) -> Vec<String> {
    group_by_semester(courses)
        .into_iter()
        .map(|g| g.semester)
        .collect()
}

/// 1-based chronological position of `semester`, or 0 when absent.
pub fn semester_number(semester: &str, courses: &[CourseRecord]) -> usize {
    sorted_semesters(courses)
        .iter()
        .position(|s| s == semester)
        .map_or(0, |i| i + 1)
}
