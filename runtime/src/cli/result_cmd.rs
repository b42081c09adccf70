//! `uafcalc result <REG>`: fetch a transcript and print its GPA summary.

use super::output::{self, Styles};
use crate::config::PortalConfig;
use crate::service::{ApiResponse, ResultReport};
use anyhow::{anyhow, Result};
use uafcalc_grades::{merge_attendance, summarize, DEFAULT_ATTENDANCE_CREDIT_HOURS};

/// Run the result command.
///
/// With `with_attendance`, current-semester attendance courses not yet on
/// the transcript are folded in at `credit_hours` each before summarizing.
pub async fn run(
    registration: &str,
    cfg: &PortalConfig,
    with_attendance: bool,
    credit_hours: Option<&str>,
) -> Result<()> {
    let service = super::build_service(cfg).await?;

    let mut report = service
        .lookup_result(registration)
        .await
        .map_err(|e| anyhow!(e))?;

    if with_attendance {
        match service.lookup_attendance(registration).await {
            Ok(attendance) => {
                let ch = credit_hours.unwrap_or(DEFAULT_ATTENDANCE_CREDIT_HOURS);
                let merged = merge_attendance(&report.dataset.result_table.rows, &attendance, ch);
                report.summary = summarize(&merged);
            }
            Err(e) => tracing::warn!("attendance unavailable, summarizing transcript only: {e}"),
        }
    }

    if output::is_json() {
        output::print_json(&ApiResponse::success(&report));
        return Ok(());
    }
    print_report(&report);
    Ok(())
}

fn print_report(report: &ResultReport) {
    let s = Styles::detect();
    let info = &report.dataset.student_info;
    let summary = &report.summary;

    println!();
    println!(
        "  {} ({})",
        s.bold(&info.student_full_name),
        info.registration_number
    );
    for (key, value) in &info.extra {
        println!("  {key}: {value}");
    }
    println!();
    println!(
        "  {:>3}  {:<24} {:>7} {:>7} {:>8} {:>8}",
        "#", "Semester", "Courses", "Credits", "GPA", "%"
    );
    for sem in &summary.semesters {
        println!(
            "  {:>3}  {:<24} {:>7} {:>7} {:>8.4} {:>8.2}",
            sem.number,
            sem.semester,
            sem.courses.len(),
            sem.credit_hours,
            sem.gpa,
            sem.percentage
        );
    }
    println!();

    let improved = summary
        .semesters
        .iter()
        .flat_map(|sem| &sem.courses)
        .filter(|c| c.is_improved())
        .count();
    if improved > 0 && !output::is_quiet() {
        println!("  {} {improved} course(s) counted at an improved attempt", s.warn_sym());
    }
    println!(
        "  {} CGPA {} ({:.2}%) over {} credit hours",
        s.ok_sym(),
        s.bold(&format!("{:.4}", summary.cgpa)),
        summary.percentage,
        summary.total_credit_hours
    );
}
