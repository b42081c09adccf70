//! Grade engine properties.
//!
//! Covers the band edges of the grade-point policy, reconciliation of
//! repeated attempts, and grouping idempotence.

use proptest::prelude::*;
use uafcalc_grades::*;

// ─────────────────────── helpers ───────────────────────

fn course(code: &str, semester: &str, ch: u32, total: f64, grade: &str) -> CourseRecord {
    CourseRecord {
        sr: "1".to_string(),
        semester: semester.to_string(),
        teacher_name: "Dr. Rehman".to_string(),
        course_code: code.to_string(),
        course_title: format!("{code} title"),
        credit_hours: ch.to_string(),
        total: total.to_string(),
        grade: grade.to_string(),
        ..Default::default()
    }
}

// ─────────────────────── band edges ───────────────────────

#[test]
fn top_of_band_earns_maximum() {
    for ch in 1..=5u32 {
        let c = course("X", "Spring 2022-2023", ch, 16.0 * ch as f64, "A");
        assert_eq!(grade_points(&c), 4.0 * ch as f64, "ch={ch}");
    }
}

#[test]
fn below_minimum_marks_earns_credit_hours() {
    for ch in 1..=5u32 {
        let c = course("X", "Spring 2022-2023", ch, 8.0 * ch as f64 - 0.5, "D");
        assert_eq!(grade_points(&c), ch as f64, "ch={ch}");
        let c = course("X", "Spring 2022-2023", ch, 0.0, "D");
        assert_eq!(grade_points(&c), ch as f64, "ch={ch}");
    }
}

#[test]
fn failing_grade_earns_nothing() {
    for ch in 1..=5u32 {
        for total in [0.0, 8.0 * ch as f64, 16.0 * ch as f64, 100.0] {
            let c = course("X", "Spring 2022-2023", ch, total, "F");
            assert_eq!(grade_points(&c), 0.0);
        }
    }
}

#[test]
fn percentage_endpoints() {
    assert_eq!(to_percentage(4.0), 100.0);
    assert_eq!(to_percentage(0.0), 0.0);
}

#[test]
fn course_max_matches_four_per_credit_hour() {
    for ch in 1..=5u32 {
        assert_eq!(course_max_gp(ch), 4.0 * ch as f64);
    }
    assert_eq!(course_max_gp(0), 0.0);
    assert_eq!(course_max_gp(6), 0.0);
}

proptest! {
    #[test]
    fn grade_points_non_decreasing_in_marks(ch in 1u32..=5, a in 0u32..=100, b in 0u32..=100) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(points_for(ch, lo as f64) <= points_for(ch, hi as f64) + 1e-9);
    }

    #[test]
    fn grade_points_stay_within_band(ch in 1u32..=5, m in 0.0f64..120.0) {
        let gp = points_for(ch, m);
        prop_assert!(gp >= ch as f64 - 1e-9);
        prop_assert!(gp <= 4.0 * ch as f64 + 1e-9);
    }
}

// ─────────────────────── reconciliation ───────────────────────

#[test]
fn overall_gpa_ignores_attempt_order() {
    let first = course("CS101", "Winter 2021-2022", 3, 30.0, "C");
    let retake = course("CS101", "Winter 2022-2023", 3, 46.0, "A");
    let other = course("MTH201", "Winter 2021-2022", 2, 20.0, "C");

    let forward = overall_gpa(&[first.clone(), retake.clone(), other.clone()]);
    let backward = overall_gpa(&[other, retake, first]);
    assert_eq!(forward, backward);
}

#[test]
fn overall_gpa_uses_strictly_better_attempt() {
    let weak = course("CS101", "Winter 2021-2022", 3, 30.0, "C");
    let strong = course("CS101", "Winter 2022-2023", 3, 48.0, "A");
    assert_eq!(overall_gpa(&[weak.clone(), strong.clone()]), 4.0);
    assert_eq!(overall_gpa(&[strong, weak]), 4.0);
}

#[test]
fn equal_points_tie_ignores_attempt_order() {
    // 30/48 at 3 ch and 36/64 at 4 ch both earn 6 grade points; the higher
    // total keeps the 4 ch attempt whichever comes first.
    let short = course("CS101", "Winter 2022-2023", 3, 30.0, "C");
    let long = course("CS101", "Winter 2022-2023", 4, 36.0, "C");
    let other = course("MTH", "Winter 2022-2023", 3, 48.0, "A");

    let forward = overall_gpa(&[short.clone(), long.clone(), other.clone()]);
    let backward = overall_gpa(&[long, short, other]);
    assert_eq!(forward, backward);
    assert_eq!(forward, 2.5714);
}

#[test]
fn summary_cgpa_matches_kept_attempt() {
    let courses = vec![
        course("CS101", "Winter 2022-2023", 3, 36.0, "B"),
        course("CS101", "Winter 2022-2023", 4, 40.0, "B"),
    ];
    let summary = summarize(&courses);

    assert_eq!(summary.semesters[0].courses.len(), 1);
    assert_eq!(summary.semesters[0].courses[0].credit_hours, "4");
    assert_eq!(summary.total_credit_hours, 4);
    assert_eq!(summary.cgpa, 2.0);
    assert_eq!(summary.cgpa, summary.semesters[0].gpa);
}

#[test]
fn improved_attempt_filed_under_original_semester() {
    let courses = vec![
        course("CS101", "Spring 2021-2022", 3, 50.0, "A"),
        course("CS101", "Spring 2022-2023", 3, 70.0, "A"),
    ];

    assert_eq!(overall_gpa(&courses), 4.0);

    let groups = group_by_semester(&courses);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].semester, "Spring 2021-2022");
    assert_eq!(groups[0].courses.len(), 1);

    let kept = &groups[0].courses[0];
    assert_eq!(kept.total, "70");
    assert!(kept.teacher_name.ends_with("(Improved)"));
}

#[test]
fn grouping_is_idempotent() {
    let courses = vec![
        course("A", "Spring 2021-2022", 3, 30.0, "C"),
        course("B", "Winter 2021-2022", 2, 25.0, "B"),
        course("A", "Spring 2022-2023", 3, 45.0, "A"),
        course("C", "Summer 2021-2022", 1, 12.0, "B"),
    ];

    let once = group_by_semester(&courses);
    let flattened: Vec<CourseRecord> = once.iter().flat_map(|g| g.courses.clone()).collect();
    let twice = group_by_semester(&flattened);
    assert_eq!(once, twice);
}

#[test]
fn summary_agrees_with_engine() {
    let courses = vec![
        course("A", "Winter 2022-2023", 3, 40.0, "B"),
        course("B", "Spring 2022-2023", 4, 60.0, "A"),
    ];
    let summary = summarize(&courses);
    assert_eq!(summary.cgpa, overall_gpa(&courses));
    assert_eq!(summary.percentage, to_percentage(summary.cgpa));
    assert_eq!(summary.semesters[1].number, semester_number("Spring 2022-2023", &courses));
}
