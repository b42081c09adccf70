//! HTML extraction for both portals.
//!
//! Everything here is pure: a page's markup in, typed records or a
//! [`ScrapeError`](crate::error::ScrapeError) out. No I/O.

pub mod attendance_page;
pub mod result_page;

pub use attendance_page::{parse_attendance_data, parse_attendance_page};
pub use result_page::{extract_result_data, extract_student_info, parse_result_page};

use scraper::ElementRef;

/// Visible text of an element with whitespace runs collapsed to one space.
pub fn cell_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Turn a table label into a map key: lowercase, runs of anything that is not
/// a letter or digit become one `_`, no leading or trailing `_`.
pub fn normalize_label(label: &str) -> String {
    let mut key = String::with_capacity(label.len());
    let mut pending_sep = false;
    for c in label.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !key.is_empty() {
                key.push('_');
            }
            pending_sep = false;
            key.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("Registration #"), "registration");
        assert_eq!(normalize_label("  Student Full Name: "), "student_full_name");
        assert_eq!(normalize_label("Reg. No."), "reg_no");
        assert_eq!(normalize_label("Credit\n Hours"), "credit_hours");
        assert_eq!(normalize_label("---"), "");
    }

    #[test]
    fn test_cell_text_collapses_whitespace() {
        let doc = Html::parse_fragment("<p> Dr.\n   <b>Aslam</b>  Khan </p>");
        let sel = Selector::parse("p").unwrap();
        let p = doc.select(&sel).next().unwrap();
        assert_eq!(cell_text(p), "Dr. Aslam Khan");
    }
}
