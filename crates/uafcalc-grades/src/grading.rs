//! Marks → grade-point mapping and GPA aggregation.
//!
//! Grade points follow the university's tiered policy, scaled by credit
//! hours `ch` (valid range 1..=5):
//!
//! - `marks >= 16·ch` earns the maximum `4·ch`
//! - `marks < 8·ch` earns the minimum `ch`
//! - from `8·ch` up to `10·ch` the points rise linearly, half a point per mark
//! - above `10·ch` each missing mark below `16·ch` costs 0.33, 0.34, 0.33, …
//!
//! A failing grade or out-of-range credit hours earn zero. Malformed numeric
//! strings never raise: they simply contribute nothing.

use crate::semester::best_attempts;
use crate::types::CourseRecord;

/// Per-mark deductions in the upper band, applied cyclically.
const DEDUCTION_CYCLE: [f64; 3] = [0.33, 0.34, 0.33];

/// Highest credit-hour value the policy defines.
pub const MAX_CREDIT_HOURS: u32 = 5;

/// Parse the leading integer of a credit-hours string (`"3(2-1)"` → 3).
pub fn credit_hours(raw: &str) -> Option<u32> {
    let digits: String = raw
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Parse a marks string, accepting a leading numeric prefix (`"45.5*"` → 45.5).
pub fn marks(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if let Ok(v) = trimmed.parse::<f64>() {
        return v.is_finite().then_some(v);
    }

    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in trimmed.char_indices() {
        match c {
            '-' | '+' if i == 0 => {}
            '.' if !seen_dot => seen_dot = true,
            d if d.is_ascii_digit() => {}
            _ => break,
        }
        end = i + c.len_utf8();
    }
    trimmed[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Grade points earned by one course attempt.
pub fn grade_points(course: &CourseRecord) -> f64 {
    let (Some(ch), Some(m)) = (credit_hours(&course.credit_hours), marks(&course.total)) else {
        return 0.0;
    };
    if course.grade.trim().eq_ignore_ascii_case("F") {
        return 0.0;
    }
    points_for(ch, m)
}

/// Grade points for `m` marks in a course worth `ch` credit hours.
pub fn points_for(ch: u32, m: f64) -> f64 {
    if !m.is_finite() || !(1..=MAX_CREDIT_HOURS).contains(&ch) {
        return 0.0;
    }

    let ch = f64::from(ch);
    let max_gp = 4.0 * ch;
    let min_gp = ch;
    let max_marks = 16.0 * ch;
    let min_marks = 8.0 * ch;

    if m >= max_marks {
        return max_gp;
    }
    if m < min_marks {
        return min_gp;
    }

    let d_boundary = min_marks + 2.0 * ch;
    if m <= d_boundary {
        return min_gp + 0.5 * (m - min_marks);
    }

    // One deduction per whole mark short of the maximum, counting a partial
    // mark as a whole one.
    let gap = (max_marks - m).ceil() as usize;
    let deduction: f64 = (0..gap).map(|i| DEDUCTION_CYCLE[i % 3]).sum();
    max_gp - deduction
}

/// Maximum grade points for a course of `ch` credit hours; 0 outside 1..=5.
pub fn course_max_gp(ch: u32) -> f64 {
    match ch {
        1 => 4.0,
        2 => 8.0,
        3 => 12.0,
        4 => 16.0,
        5 => 20.0,
        _ => 0.0,
    }
}

/// GPA of a set of courses taken as-is (no deduplication), on a 4.0 scale.
///
/// Courses whose credit hours cannot be parsed are ignored.
pub fn semester_gpa(courses: &[CourseRecord]) -> f64 {
    let mut obtained = 0.0;
    let mut maximum = 0.0;

    for course in courses {
        if let Some(ch) = credit_hours(&course.credit_hours) {
            obtained += grade_points(course);
            maximum += course_max_gp(ch);
        }
    }

    if maximum == 0.0 {
        return 0.0;
    }
    round_to(4.0 * obtained / maximum, 4)
}

/// Cumulative GPA over all courses, counting only the best attempt per course code.
///
/// Attempts are reconciled by [`best_attempts`], so the kept record (and its
/// credit hours) is the same one the semester view shows.
pub fn overall_gpa(courses: &[CourseRecord]) -> f64 {
    let mut obtained = 0.0;
    let mut maximum = 0.0;

    for course in best_attempts(courses) {
        if let Some(ch) = credit_hours(&course.credit_hours) {
            obtained += grade_points(&course);
            maximum += 4.0 * f64::from(ch);
        }
    }

    if maximum == 0.0 {
        return 0.0;
    }
    round_to(4.0 * obtained / maximum, 4)
}

/// Convert a 4.0-scale GPA into a percentage with two decimals.
pub fn to_percentage(gpa: f64) -> f64 {
    round_to(gpa / 4.0 * 100.0, 2)
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
