//! Parse a results-portal page into a [`ResultDataset`].
//!
//! The page holds two `table.table.tab-content` tables distinguished only by
//! position: the first is a label/value table of student details, the last is
//! the course table. Course columns are discovered from the header row at
//! parse time, so the portal may reorder or add columns freely.

use super::{cell_text, normalize_label};
use crate::error::{ScrapeError, ScrapeResult};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::LazyLock;
use uafcalc_grades::{CourseRecord, ResultDataset, ResultMetadata, ResultTable, StudentInfo};

static RESULT_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.table.tab-content").expect("valid selector"));
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("valid selector"));
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("valid selector"));
static HEADER_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("th").expect("valid selector"));
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"h3[align="center"]"#).expect("valid selector"));

/// Columns every course row must provide.
pub const REQUIRED_COLUMNS: [&str; 12] = [
    "sr",
    "semester",
    "teacher_name",
    "course_code",
    "course_title",
    "credit_hours",
    "mid",
    "assignment",
    "final",
    "practical",
    "total",
    "grade",
];

/// Parse a full results page.
///
/// Fails when the student's name or registration number is missing, or when
/// no course row survives extraction.
pub fn parse_result_page(html: &str) -> ScrapeResult<ResultDataset> {
    let document = Html::parse_document(html);

    let student_info = extract_student_info(&document)?;
    let result_table = extract_result_data(&document);
    if result_table.rows.is_empty() {
        return Err(ScrapeError::EmptyResult);
    }

    Ok(ResultDataset {
        metadata: extract_metadata(&document),
        student_info,
        result_table,
    })
}

/// Page title and header image.
pub fn extract_metadata(document: &Html) -> ResultMetadata {
    let mut metadata = ResultMetadata::default();
    if let Some(title) = document
        .select(&TITLE)
        .map(cell_text)
        .find(|t| !t.is_empty())
    {
        metadata.title = title;
    }
    metadata
}

/// Read the label/value rows of the first result table.
pub fn extract_student_info(document: &Html) -> ScrapeResult<StudentInfo> {
    let mut info = StudentInfo::default();

    if let Some(table) = document.select(&RESULT_TABLE).next() {
        for row in table.select(&ROW) {
            let cells: Vec<String> = row.select(&CELL).map(cell_text).collect();
            let [label, value] = cells.as_slice() else {
                continue;
            };
            let key = normalize_label(label);
            if key.is_empty() || value.is_empty() {
                continue;
            }
            match key.as_str() {
                "name" | "student_name" | "student_full_name" => {
                    info.student_full_name = value.clone();
                }
                "registration" | "registration_no" | "registration_number" | "reg_no" => {
                    info.registration_number = value.clone();
                }
                _ => {
                    info.extra.insert(key, value.clone());
                }
            }
        }
    }

    if info.student_full_name.is_empty() {
        return Err(ScrapeError::RequiredFieldMissing("student name"));
    }
    if info.registration_number.is_empty() {
        return Err(ScrapeError::RequiredFieldMissing("registration number"));
    }
    Ok(info)
}

/// Column positions learned from a header row.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    /// Index normalized header names; the first occurrence of a name wins.
    pub fn new(headers: &[String]) -> Self {
        let mut positions = HashMap::new();
        for (i, name) in headers.iter().enumerate() {
            positions.entry(name.clone()).or_insert(i);
        }
        Self { positions }
    }

    /// Whether every required column was found.
    pub fn is_complete(&self) -> bool {
        REQUIRED_COLUMNS
            .iter()
            .all(|c| self.positions.contains_key(*c))
    }

    fn cell<'a>(&self, cells: &'a [String], column: &str) -> Option<&'a str> {
        let i = *self.positions.get(column)?;
        cells.get(i).map(|s| s.as_str())
    }

    /// Map one row of cells to a course, or `None` if any required column is
    /// absent from the header or the row.
    pub fn map_row(&self, cells: &[String]) -> Option<CourseRecord> {
        let get = |column: &str| self.cell(cells, column).map(str::to_string);
        Some(CourseRecord {
            sr: get("sr")?,
            semester: get("semester")?,
            teacher_name: get("teacher_name")?,
            course_code: get("course_code")?,
            course_title: get("course_title")?,
            credit_hours: get("credit_hours")?,
            mid: get("mid")?,
            assignment: get("assignment")?,
            final_marks: get("final")?,
            practical: get("practical")?,
            total: get("total")?,
            grade: get("grade")?,
        })
    }
}

/// Read the course table: headers first, then every row through them.
///
/// Rows that lack a required column are dropped.
pub fn extract_result_data(document: &Html) -> ResultTable {
    let Some(table) = document.select(&RESULT_TABLE).last() else {
        return ResultTable::default();
    };

    let mut rows = table.select(&ROW);
    let Some(header_row) = rows.next() else {
        return ResultTable::default();
    };

    let headers = header_names(header_row);
    let index = HeaderIndex::new(&headers);
    if !index.is_complete() {
        tracing::debug!(?headers, "course table header lacks required columns");
    }

    let courses = rows
        .filter_map(|row| {
            let cells: Vec<String> = row.select(&CELL).map(cell_text).collect();
            if cells.is_empty() {
                return None;
            }
            let course = index.map_row(&cells);
            if course.is_none() {
                tracing::debug!(cells = cells.len(), "dropping incomplete course row");
            }
            course
        })
        .collect();

    ResultTable {
        headers,
        rows: courses,
    }
}

fn header_names(row: ElementRef<'_>) -> Vec<String> {
    let mut names: Vec<String> = row
        .select(&HEADER_CELL)
        .map(|th| normalize_label(&cell_text(th)))
        .collect();
    if names.is_empty() {
        names = row
            .select(&CELL)
            .map(|td| normalize_label(&cell_text(td)))
            .collect();
    }
    names
}
