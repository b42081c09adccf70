//! Attendance portal pages: the ASP.NET search form and the student detail grid.

use super::cell_text;
use crate::error::{ScrapeError, ScrapeResult};
use scraper::{Html, Selector};
use std::sync::LazyLock;
use uafcalc_grades::{AttendanceRecord, CourseRecord};

static VIEWSTATE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#__VIEWSTATE").expect("valid selector"));
static VIEWSTATE_GENERATOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#__VIEWSTATEGENERATOR").expect("valid selector"));
static EVENT_VALIDATION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#__EVENTVALIDATION").expect("valid selector"));
static ATTENDANCE_TABLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("#ctl00_Main_TabContainer1_tbResultInformation_gvResultInformation")
        .expect("valid selector")
});
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("valid selector"));
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("valid selector"));

// Fixed column positions in the detail grid.
const COL_SEMESTER: usize = 3;
const COL_TEACHER: usize = 4;
const COL_CODE: usize = 5;
const COL_TITLE: usize = 6;
const COL_MID: usize = 8;
const COL_ASSIGNMENT: usize = 9;
const COL_FINAL: usize = 10;
const COL_PRACTICAL: usize = 11;
const COL_TOTAL: usize = 12;
const COL_GRADE: usize = 13;

/// Rows with fewer cells than this are malformed and skipped.
pub const MIN_ATTENDANCE_CELLS: usize = COL_GRADE + 1;

/// The three ASP.NET state fields the search form must echo back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AspNetFormState {
    pub view_state: String,
    pub view_state_generator: String,
    pub event_validation: String,
}

impl AspNetFormState {
    /// Form body for a registration search.
    pub fn search_fields(&self, registration: &str) -> Vec<(String, String)> {
        vec![
            ("__VIEWSTATE".to_string(), self.view_state.clone()),
            (
                "__VIEWSTATEGENERATOR".to_string(),
                self.view_state_generator.clone(),
            ),
            ("__EVENTVALIDATION".to_string(), self.event_validation.clone()),
            ("ctl00$Main$txtReg".to_string(), registration.to_string()),
            ("ctl00$Main$btnShow".to_string(), "Show".to_string()),
        ]
    }
}

/// Read the hidden state fields from the search form page.
///
/// A field that is absent or empty is an error.
pub fn extract_form_state(html: &str) -> ScrapeResult<AspNetFormState> {
    let document = Html::parse_document(html);
    let value_of = |selector: &Selector, name: &'static str| {
        document
            .select(selector)
            .next()
            .and_then(|el| el.value().attr("value"))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or(ScrapeError::HiddenFieldMissing(name))
    };

    Ok(AspNetFormState {
        view_state: value_of(&VIEWSTATE, "__VIEWSTATE")?,
        view_state_generator: value_of(&VIEWSTATE_GENERATOR, "__VIEWSTATEGENERATOR")?,
        event_validation: value_of(&EVENT_VALIDATION, "__EVENTVALIDATION")?,
    })
}

/// Parse the student detail page.
///
/// A missing grid means the session did not reach the detail view and is an
/// error. A grid with no data rows is a student with no current courses.
pub fn parse_attendance_page(html: &str) -> ScrapeResult<Vec<AttendanceRecord>> {
    let document = Html::parse_document(html);
    parse_attendance_data(&document).ok_or_else(|| {
        ScrapeError::StructuralValidation("attendance table not found".to_string())
    })
}

/// Read every data row of the detail grid, or `None` if the grid is absent.
pub fn parse_attendance_data(document: &Html) -> Option<Vec<AttendanceRecord>> {
    let table = document.select(&ATTENDANCE_TABLE).next()?;

    let records = table
        .select(&ROW)
        .skip(1)
        .filter_map(|row| {
            let cells: Vec<String> = row.select(&CELL).map(cell_text).collect();
            if cells.len() < MIN_ATTENDANCE_CELLS {
                tracing::debug!(cells = cells.len(), "skipping short attendance row");
                return None;
            }
            if cells[COL_CODE].is_empty() {
                return None;
            }
            Some(cells)
        })
        .enumerate()
        .map(|(i, cells)| {
            let code = cells[COL_CODE].clone();
            let title = non_empty_or(&cells[COL_TITLE], &code);
            AttendanceRecord::new(CourseRecord {
                sr: (i + 1).to_string(),
                semester: cells[COL_SEMESTER].clone(),
                teacher_name: non_empty_or(&cells[COL_TEACHER], "N/A"),
                course_code: code,
                course_title: title,
                credit_hours: String::new(),
                mid: strip_decimal_suffix(&cells[COL_MID]),
                assignment: strip_decimal_suffix(&cells[COL_ASSIGNMENT]),
                final_marks: strip_decimal_suffix(&cells[COL_FINAL]),
                practical: strip_decimal_suffix(&cells[COL_PRACTICAL]),
                total: strip_decimal_suffix(&cells[COL_TOTAL]),
                grade: cells[COL_GRADE].clone(),
            })
        })
        .collect();

    Some(records)
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// `"12.00"` becomes `"12"`; anything else is unchanged.
fn strip_decimal_suffix(value: &str) -> String {
    value.strip_suffix(".00").unwrap_or(value).to_string()
}
