//! Table observer for pretty-printing the podium.
//!
//! This module provides [`TableObserver`], which renders a [`Snapshot`] as a
//! formatted table using the `tabled` crate.
//!
//! # Feature Flag
//!
//! This module requires the `table` feature:
//!
//! ```toml
//! [dependencies]
//! classifica = { version = "0.1", features = ["table"] }
//! ```
//!
//! # Examples
//!
//! ## Standard format
//!
//! ```rust,ignore
//! use classifica::observers::table::{TableObserver, TableStyle};
//!
//! let observer = TableObserver::new().with_style(TableStyle::Rounded);
//! println!("{}", observer.render(&board.current_snapshot()));
//! // ╭──────┬───────┬───────╮
//! // │ Rank │ Value │ Count │
//! // ├──────┼───────┼───────┤
//! // │ 1    │ rust  │ 42    │
//! // │ 2    │ go    │ 17    │
//! // ╰──────┴───────┴───────╯
//! ```
//!
//! ## Compact format (multiple columns)
//!
//! ```rust,ignore
//! let observer = TableObserver::new().compact(true).columns(3);
//! println!("{}", observer.render(&board.current_snapshot()));
//! // ╭──────────────┬────────────┬────────────╮
//! // │ #1 rust: 42  │ #2 go: 17  │ #3 zig: 9  │
//! // ├──────────────┼────────────┼────────────┤
//! // │ #4 c: 5      │            │            │
//! // ╰──────────────┴────────────┴────────────╯
//! ```

use std::fmt::Display;

use tabled::{builder::Builder, settings::Style, Table, Tabled};

use crate::snapshot::Snapshot;

/// Available table styles for rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableStyle {
    /// ASCII table with simple characters: +, -, |
    Ascii,
    /// Modern rounded corners (default)
    #[default]
    Rounded,
    /// Sharp corners with box-drawing characters
    Sharp,
    /// Modern style with clean lines
    Modern,
    /// Extended ASCII characters
    Extended,
    /// GitHub-flavored Markdown table
    Markdown,
    /// ReStructuredText table
    ReStructuredText,
    /// Dots for borders
    Dots,
    /// No borders, just spacing
    Blank,
}

/// Separator style between value and count in compact mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompactSeparator {
    /// Colon separator: "value: count"
    #[default]
    Colon,
    /// Equals separator: "value = count"
    Equals,
    /// Arrow separator: "value → count"
    Arrow,
    /// Pipe separator: "value | count"
    Pipe,
    /// No separator, just space: "value count"
    Space,
}

impl CompactSeparator {
    /// Returns the separator string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompactSeparator::Colon => ": ",
            CompactSeparator::Equals => " = ",
            CompactSeparator::Arrow => " → ",
            CompactSeparator::Pipe => " | ",
            CompactSeparator::Space => " ",
        }
    }
}

/// Configuration for the table observer.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// The style to use for rendering.
    pub style: TableStyle,
    /// Whether to show the header row (only in non-compact mode).
    pub show_header: bool,
    /// Custom title for the table (optional).
    pub title: Option<String>,
    /// Whether to print the event total under the table.
    pub show_total_events: bool,
    /// Whether to use compact format (value: count in cells).
    pub compact: bool,
    /// Number of columns in compact mode (default: 1).
    pub columns: usize,
    /// Separator between value and count in compact mode.
    pub separator: CompactSeparator,
    /// Placeholder for empty cells in compact mode.
    pub empty_cell: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            style: TableStyle::default(),
            show_header: true,
            title: None,
            show_total_events: false,
            compact: false,
            columns: 1,
            separator: CompactSeparator::default(),
            empty_cell: String::new(),
        }
    }
}

/// Internal row representation for tabled (standard mode).
#[derive(Tabled)]
struct StandingRow {
    #[tabled(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Count")]
    count: u64,
}

/// An observer that renders the podium as a formatted table.
///
/// Supports two rendering modes:
///
/// 1. **Standard mode**: Rank, Value and Count columns, one standing per row
/// 2. **Compact mode**: Multi-column grid with "#rank value: count" cells
#[derive(Debug, Clone, Default)]
pub struct TableObserver {
    config: TableConfig,
}

impl TableObserver {
    /// Creates a new table observer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new table observer with the specified configuration.
    pub fn with_config(config: TableConfig) -> Self {
        Self { config }
    }

    /// Sets the table style.
    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.config.style = style;
        self
    }

    /// Sets whether to show the header row.
    ///
    /// Only applies in standard (non-compact) mode.
    pub fn with_header(mut self, show: bool) -> Self {
        self.config.show_header = show;
        self
    }

    /// Sets an optional title for the table.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    /// Appends a `total events: N` line below the table.
    pub fn with_total_events(mut self, show: bool) -> Self {
        self.config.show_total_events = show;
        self
    }

    /// Enables or disables compact mode.
    pub fn compact(mut self, enabled: bool) -> Self {
        self.config.compact = enabled;
        self
    }

    /// Sets the number of columns in compact mode.
    ///
    /// Values less than 1 are treated as 1.
    pub fn columns(mut self, count: usize) -> Self {
        self.config.columns = count.max(1);
        self
    }

    /// Sets the separator between value and count in compact mode.
    pub fn separator(mut self, sep: CompactSeparator) -> Self {
        self.config.separator = sep;
        self
    }

    /// Sets the placeholder text for empty cells in compact mode.
    pub fn empty_cell(mut self, placeholder: impl Into<String>) -> Self {
        self.config.empty_cell = placeholder.into();
        self
    }

    fn apply_style(&self, table: &mut Table) {
        match self.config.style {
            TableStyle::Ascii => {
                table.with(Style::ascii());
            }
            TableStyle::Rounded => {
                table.with(Style::rounded());
            }
            TableStyle::Sharp => {
                table.with(Style::sharp());
            }
            TableStyle::Modern => {
                table.with(Style::modern());
            }
            TableStyle::Extended => {
                table.with(Style::extended());
            }
            TableStyle::Markdown => {
                table.with(Style::markdown());
            }
            TableStyle::ReStructuredText => {
                table.with(Style::re_structured_text());
            }
            TableStyle::Dots => {
                table.with(Style::dots());
            }
            TableStyle::Blank => {
                table.with(Style::blank());
            }
        }
    }

    fn decorate<K>(&self, body: String, snapshot: &Snapshot<K>) -> String {
        let mut out = match self.config.title {
            Some(ref title) => format!("{}\n{}", title, body),
            None => body,
        };
        if self.config.show_total_events {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("total events: {}", snapshot.total_events));
        }
        out
    }

    fn render_compact<K: Display>(&self, snapshot: &Snapshot<K>) -> String {
        let cells: Vec<String> = snapshot
            .ranked()
            .map(|(rank, standing)| {
                format!(
                    "#{} {}{}{}",
                    rank,
                    standing.key,
                    self.config.separator.as_str(),
                    standing.count
                )
            })
            .collect();

        if cells.is_empty() {
            return self.decorate(String::new(), snapshot);
        }

        let cols = self.config.columns;
        let mut builder = Builder::default();

        for chunk in cells.chunks(cols) {
            let mut row: Vec<String> = chunk.to_vec();
            // Pad the last row with empty cells
            while row.len() < cols {
                row.push(self.config.empty_cell.clone());
            }
            builder.push_record(row);
        }

        let mut table = builder.build();
        self.apply_style(&mut table);
        self.decorate(table.to_string(), snapshot)
    }

    fn render_standard<K: Display>(&self, snapshot: &Snapshot<K>) -> String {
        let rows: Vec<StandingRow> = snapshot
            .ranked()
            .map(|(rank, standing)| StandingRow {
                rank,
                value: standing.key.to_string(),
                count: standing.count,
            })
            .collect();

        let mut table = Table::new(&rows);
        self.apply_style(&mut table);

        if !self.config.show_header {
            table.with(tabled::settings::Remove::row(
                tabled::settings::object::Rows::first(),
            ));
        }

        self.decorate(table.to_string(), snapshot)
    }

    /// Renders the snapshot as a formatted table string.
    pub fn render<K: Display>(&self, snapshot: &Snapshot<K>) -> String {
        if self.config.compact {
            self.render_compact(snapshot)
        } else {
            self.render_standard(snapshot)
        }
    }
}
