//! `uafcalc attendance <REG>`: list current-semester courses.

use super::output::{self, Styles};
use crate::config::PortalConfig;
use crate::service::ApiResponse;
use anyhow::{anyhow, Result};

/// Run the attendance command.
pub async fn run(registration: &str, cfg: &PortalConfig) -> Result<()> {
    let service = super::build_service(cfg).await?;
    let records = service
        .lookup_attendance(registration)
        .await
        .map_err(|e| anyhow!(e))?;

    if output::is_json() {
        output::print_json(&ApiResponse::success(&records));
        return Ok(());
    }

    let s = Styles::detect();
    if records.is_empty() {
        println!("  {} No current courses found.", s.warn_sym());
        return Ok(());
    }

    println!();
    println!(
        "  {:>3}  {:<10} {:<32} {:>6} {:>6} {:>6} {:>6} {:>6}  {}",
        "#", "Code", "Title", "Mid", "Assign", "Final", "Pract", "Total", "Grade"
    );
    for r in &records {
        let c = &r.course;
        println!(
            "  {:>3}  {:<10} {:<32} {:>6} {:>6} {:>6} {:>6} {:>6}  {}",
            c.sr,
            c.course_code,
            truncate(&c.course_title, 32),
            c.mid,
            c.assignment,
            c.final_marks,
            c.practical,
            c.total,
            c.grade
        );
    }
    if !output::is_quiet() {
        println!();
        println!("  {} {} course(s)", s.ok_sym(), records.len());
    }
    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
