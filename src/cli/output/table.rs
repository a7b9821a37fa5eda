//! Table output formatting for CLI commands
//!
//! Corpus example listings rendered with comfy-table.

use std::env;

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};

use super::truncate;
use crate::infrastructure::corpus::CorpusSummary;

/// Characters of record content shown per corpus example.
pub const EXAMPLE_PREVIEW_CHARS: usize = 100;

/// Table formatter for CLI output
pub struct TableFormatter {
    use_colors: bool,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// First records of a loaded corpus.
    pub fn format_examples(&self, summary: &CorpusSummary) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![
            self.header("#"),
            self.header("Tema"),
            self.header("Pregunta"),
            self.header("Contenido"),
        ]);

        for (position, record) in summary.examples.iter().enumerate() {
            let metadata = record.metadata();
            table.add_row(vec![
                Cell::new(position + 1),
                self.topic_cell(metadata.tema().as_str()),
                Cell::new(metadata.pregunta().as_str()),
                Cell::new(truncate(record.content(), EXAMPLE_PREVIEW_CHARS)),
            ]);
        }

        table.to_string()
    }

    fn header(&self, title: &str) -> Cell {
        Cell::new(title).add_attribute(Attribute::Bold)
    }

    fn topic_cell(&self, topic: &str) -> Cell {
        if self.use_colors {
            Cell::new(topic).fg(Color::Cyan)
        } else {
            Cell::new(topic)
        }
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        if !self.use_colors {
            table.force_no_tty();
        }
        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if the terminal supports colors
fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }
    console::colors_enabled()
}
