//! uafcalc-grades: course record schema and the tiered grade-point engine.
//!
//! Everything here is pure: no I/O and no process-wide state. Every
//! aggregate is recomputed from the course list passed in.

pub mod grading;
pub mod merge;
pub mod semester;
pub mod summary;
pub mod types;

pub use grading::{
    course_max_gp, credit_hours, grade_points, marks, overall_gpa, points_for, semester_gpa,
    to_percentage,
};
pub use merge::merge_attendance;
pub use semester::{
    best_attempts, compare_semesters, group_by_semester, semester_number, sorted_semesters,
    SemesterGroup, SemesterKey, Season,
};
pub use summary::{summarize, SemesterSummary, TranscriptSummary};
pub use types::*;
