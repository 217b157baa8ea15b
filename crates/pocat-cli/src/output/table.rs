//! Table formatting utilities for CLI output.

use comfy_table::{presets, CellAlignment, ContentArrangement, Table};
use pocat::CatalogStats;

/// Progress numbers for a single catalog file.
pub struct FileStats {
    /// Path as given on the command line.
    pub file: String,
    /// `Language` header value, if any.
    pub language: Option<String>,
    pub stats: CatalogStats,
}

/// Format per-file progress as an ASCII table.
pub fn format_stats_table(rows: &[FileStats]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "File",
        "Language",
        "Translated",
        "Fuzzy",
        "Untranslated",
        "Obsolete",
        "Progress",
    ]);

    for row in rows {
        let stats = &row.stats;
        table.add_row(vec![
            row.file.clone(),
            row.language.clone().unwrap_or_else(|| "-".to_string()),
            format!("{}/{}", stats.translated, stats.total),
            stats.fuzzy.to_string(),
            stats.untranslated.to_string(),
            stats.obsolete.to_string(),
            format!("{:.1}%", stats.percent_translated()),
        ]);
    }
    for index in 2..7 {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }

    table
}
