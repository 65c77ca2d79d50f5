//! Terminal rendering for collected records.

use comfy_table::{presets, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;
use terminal_size::terminal_size;

use crate::models::Record;

/// Default width when the terminal size cannot be determined.
pub const DEFAULT_WIDTH: usize = 100;

/// Current terminal width in characters
pub fn terminal_width() -> usize {
    terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(DEFAULT_WIDTH)
}

/// Truncate text to `max_width` characters, appending an ellipsis when
/// truncation occurred
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    if max_width <= 3 {
        return text.chars().take(max_width).collect();
    }
    let kept: String = text.chars().take(max_width - 3).collect();
    format!("{}...", kept.trim_end())
}

/// One-line progress rendering for a freshly collected record
pub fn record_line(index: usize, record: &Record) -> String {
    let title = truncate_with_ellipsis(&record.title, 70);
    let detail = record
        .doi
        .as_deref()
        .or(record.publication.as_deref())
        .unwrap_or("-");
    format!(
        "{:>4}  {}  {}",
        index.dimmed(),
        title.bold(),
        detail.dimmed()
    )
}

/// Render a collection as a table sized to the terminal
pub fn record_table(records: &[Record]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(terminal_width() as u16)
        .set_header(vec!["#", "Title", "Year", "DOI", "Cited by", "Citation"]);

    for (i, record) in records.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(truncate_with_ellipsis(&record.title, 60)),
            Cell::new(
                record
                    .year
                    .map(|y| y.to_string())
                    .unwrap_or_default(),
            ),
            Cell::new(record.doi.as_deref().unwrap_or("")),
            Cell::new(
                record
                    .citation_count
                    .map(|c| c.to_string())
                    .unwrap_or_default(),
            ),
            Cell::new(truncate_with_ellipsis(
                record.citation.as_deref().unwrap_or(""),
                50,
            )),
        ]);
    }

    table
}
