//! Table types.

use super::TextRun;
use serde::{Deserialize, Serialize};

/// A table with an optional header row.
///
/// Plain strings are always present; the parallel `*_runs` collections carry
/// styled text when the source provided it. Empty `cell_runs` means the cells
/// are plain text only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Header cell texts (first row of the source table)
    pub headers: Vec<String>,

    /// Data rows as plain strings
    pub rows: Vec<Vec<String>>,

    /// Styled runs per header cell
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub header_runs: Vec<Vec<TextRun>>,

    /// Styled runs per data cell, row-major
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cell_runs: Vec<Vec<Vec<TextRun>>>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a plain-text table from headers and rows.
    pub fn from_strings<H, R, C>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
            header_runs: Vec::new(),
            cell_runs: Vec::new(),
        }
    }

    /// Whether the table has a header row.
    pub fn has_headers(&self) -> bool {
        !self.headers.is_empty()
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns: the header width, else the first row's width.
    pub fn col_count(&self) -> usize {
        if !self.headers.is_empty() {
            self.headers.len()
        } else {
            self.rows.first().map(Vec::len).unwrap_or(0)
        }
    }

    /// Check if the table has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.col_count() == 0
    }

    /// Styled runs for a header cell, if present.
    pub fn header_cell_runs(&self, col: usize) -> Option<&[TextRun]> {
        self.header_runs.get(col).map(Vec::as_slice)
    }

    /// Styled runs for a data cell, if present.
    pub fn data_cell_runs(&self, row: usize, col: usize) -> Option<&[TextRun]> {
        self.cell_runs
            .get(row)
            .and_then(|r| r.get(col))
            .map(Vec::as_slice)
    }

    /// Plain text of all cells, row by row, tab-separated.
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        if self.has_headers() {
            lines.push(self.headers.join("\t"));
        }
        for row in &self.rows {
            lines.push(row.join("\t"));
        }
        lines.join("\n")
    }
}
