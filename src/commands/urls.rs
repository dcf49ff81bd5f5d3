//! Urls command - Show bookmarks as a table

use comfy_table::{presets::ASCII_FULL, Cell, ContentArrangement, Table};
use log::debug;

use crate::bookmarks::Bookmark;
use crate::timezone::Zone;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A rendered table and the timezone warning, if any
#[derive(Debug)]
pub struct RenderedTable {
    pub table: String,
    pub warning: Option<String>,
}

/// Execute the urls command and return formatted output
///
/// With `tag`, only bookmarks carrying that tag are shown.
pub fn execute(bookmarks: &[Bookmark], timezone: &str, tag: Option<&str>) -> RenderedTable {
    match tag {
        Some(tag) => {
            let matching: Vec<Bookmark> = bookmarks
                .iter()
                .filter(|b| b.has_tag(tag))
                .cloned()
                .collect();
            render(&matching, timezone)
        }
        None => render(bookmarks, timezone),
    }
}

/// Render bookmarks in their stored order with dates shown in `timezone`
///
/// An unknown timezone falls back to UTC and sets `warning`. Cells are never
/// wrapped, so long URLs stay on one line and can be copied whole.
pub fn render(bookmarks: &[Bookmark], timezone: &str) -> RenderedTable {
    let (zone, warning) = match timezone.parse::<Zone>() {
        Ok(zone) => (zone, None),
        Err(e) => (Zone::Utc, Some(format!("{}. Falling back to UTC.", e))),
    };
    debug!("Rendering {} bookmark(s) in {}", bookmarks.len(), zone);

    if bookmarks.is_empty() {
        return RenderedTable {
            table: "No bookmarks found.".to_string(),
            warning,
        };
    }

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(vec![Cell::new("DateTime"), Cell::new("URL"), Cell::new("Tags")]);

    for bookmark in bookmarks {
        table.add_row(vec![
            Cell::new(zone.format(&bookmark.date, DATE_FORMAT)),
            Cell::new(&bookmark.url),
            Cell::new(&bookmark.tags),
        ]);
    }

    RenderedTable {
        table: table.to_string(),
        warning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmarks::model::parse_date;

    fn bookmark(url: &str, tags: &str, date: &str) -> Bookmark {
        Bookmark::at(url, tags, parse_date(date).unwrap())
    }

    #[test]
    fn test_render_converts_to_fixed_offset() {
        let bookmarks = vec![bookmark(
            "http://example.com",
            "x,y",
            "2024-01-01T00:00:00+00:00",
        )];
        let rendered = render(&bookmarks, "-05:00");

        assert!(rendered.warning.is_none());
        assert!(rendered.table.contains("2023-12-31 19:00:00"));
        assert!(rendered.table.contains("http://example.com"));
        assert!(rendered.table.contains("x,y"));
    }

    #[test]
    fn test_render_named_zone() {
        let bookmarks = vec![bookmark("http://example.com", "", "2024-07-01T12:00:00Z")];
        let rendered = render(&bookmarks, "America/New_York");
        // EDT in July
        assert!(rendered.table.contains("2024-07-01 08:00:00"));
    }

    #[test]
    fn test_render_invalid_zone_falls_back_to_utc() {
        let bookmarks = vec![bookmark(
            "http://example.com",
            "",
            "2024-01-01T00:00:00+00:00",
        )];
        let rendered = render(&bookmarks, "Not/AZone");

        assert_eq!(
            rendered.warning.as_deref(),
            Some("Invalid timezone 'Not/AZone'. Falling back to UTC.")
        );
        assert!(rendered.table.contains("2024-01-01 00:00:00"));
    }

    #[test]
    fn test_render_has_headers_and_keeps_order() {
        let bookmarks = vec![
            bookmark("https://second-alphabetically.example", "", "2024-02-01T00:00:00Z"),
            bookmark("https://a-first.example", "", "2024-01-01T00:00:00Z"),
        ];
        let table = render(&bookmarks, "UTC").table;

        for header in ["DateTime", "URL", "Tags"] {
            assert!(table.contains(header));
        }
        let second = table.find("second-alphabetically").unwrap();
        let first = table.find("a-first").unwrap();
        assert!(second < first);
    }

    #[test]
    fn test_render_keeps_long_url_on_one_line() {
        let url = format!("https://example.com/{}", "segment/".repeat(40));
        let bookmarks = vec![bookmark(&url, "long", "2024-01-01T00:00:00Z")];
        let table = render(&bookmarks, "UTC").table;

        assert!(table.lines().any(|line| line.contains(url.as_str())));
    }

    #[test]
    fn test_render_empty() {
        let rendered = render(&[], "UTC");
        assert_eq!(rendered.table, "No bookmarks found.");
    }

    #[test]
    fn test_execute_filters_by_tag() {
        let bookmarks = vec![
            bookmark("https://rust.example", "rust,cli", "2024-01-01T00:00:00Z"),
            bookmark("https://go.example", "go", "2024-01-02T00:00:00Z"),
        ];
        let table = execute(&bookmarks, "UTC", Some("cli")).table;

        assert!(table.contains("https://rust.example"));
        assert!(!table.contains("https://go.example"));
    }
}
