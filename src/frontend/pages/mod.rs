//! Maud page templates for the board UI.
//!
//! Each page module exports a render function that produces the complete HTML.

pub mod detail;
pub mod error;
pub mod form;
pub mod list;

pub use detail::render_detail_page;
pub use error::render_error_page;
pub use form::{render_post_form_page, PostFormParams, SheetEditor};
pub use list::{render_list_page, ListPageParams};

use chrono::{DateTime, Local};

/// Render a stored RFC 3339 timestamp as local `YYYY-MM-DD HH:MM`.
///
/// Values that do not parse are shown as stored.
#[must_use]
pub fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw).map_or_else(
        |_| raw.to_string(),
        |ts| ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp_fallback() {
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn test_format_timestamp_shape() {
        let formatted = format_timestamp("2024-05-01T10:20:30.123Z");
        assert_eq!(formatted.len(), "2024-05-01 10:20".len());
        assert!(formatted.starts_with("2024-0"));
    }
}
