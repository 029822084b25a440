//! Rendering result with statistics.

use crate::model::{DocumentMetadata, DocumentSummary};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of a full transformation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformResult {
    /// Where the styled document was written (canonicalized)
    pub output: PathBuf,

    /// Metadata of the source document
    pub metadata: DocumentMetadata,

    /// Element counts of the detected tree
    pub summary: DocumentSummary,

    /// What the renderer emitted
    pub stats: RenderStats,
}

impl TransformResult {
    /// Create a new transform result.
    pub fn new(
        output: PathBuf,
        metadata: DocumentMetadata,
        summary: DocumentSummary,
        stats: RenderStats,
    ) -> Self {
        Self {
            output,
            metadata,
            summary,
            stats,
        }
    }
}

/// Statistics collected while rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Headings emitted (sections)
    pub heading_count: u32,

    /// Body paragraphs emitted
    pub paragraph_count: u32,

    /// Tables emitted
    pub table_count: u32,

    /// Images embedded
    pub image_count: u32,

    /// Callout boxes emitted
    pub callout_count: u32,

    /// List items emitted, nested ones included
    pub list_item_count: u32,

    /// Individual steps emitted
    pub step_count: u32,

    /// Explicit page breaks emitted
    pub page_break_count: u32,

    /// Elements skipped because they could not be rendered
    pub skipped_count: u32,

    /// Entries written to the table of contents
    pub toc_entries: u32,

    /// Whether a cover page was generated
    pub cover: bool,

    /// Approximate word count of rendered text
    pub word_count: u32,
}

impl RenderStats {
    /// Create empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment heading count.
    pub fn add_heading(&mut self) {
        self.heading_count += 1;
    }

    /// Increment paragraph count.
    pub fn add_paragraph(&mut self) {
        self.paragraph_count += 1;
    }

    /// Increment table count.
    pub fn add_table(&mut self) {
        self.table_count += 1;
    }

    /// Increment image count.
    pub fn add_image(&mut self) {
        self.image_count += 1;
    }

    /// Increment callout count.
    pub fn add_callout(&mut self) {
        self.callout_count += 1;
    }

    /// Increment list item count.
    pub fn add_list_item(&mut self) {
        self.list_item_count += 1;
    }

    /// Increment step count.
    pub fn add_step(&mut self) {
        self.step_count += 1;
    }

    /// Increment page break count.
    pub fn add_page_break(&mut self) {
        self.page_break_count += 1;
    }

    /// Record a skipped element.
    pub fn add_skipped(&mut self) {
        self.skipped_count += 1;
    }

    /// Add the word count of text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
    }

    /// Number of content elements emitted, headings excluded.
    pub fn element_count(&self) -> u32 {
        self.paragraph_count
            + self.table_count
            + self.image_count
            + self.callout_count
            + self.page_break_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_stats_counts() {
        let mut stats = RenderStats::new();
        stats.add_paragraph();
        stats.add_paragraph();
        stats.add_table();
        stats.add_skipped();
        stats.count_text("Bonjour tout le monde");

        assert_eq!(stats.paragraph_count, 2);
        assert_eq!(stats.element_count(), 3);
        assert_eq!(stats.skipped_count, 1);
        assert_eq!(stats.word_count, 4);
    }

    #[test]
    fn test_transform_result_serializes() {
        let result = TransformResult::new(
            PathBuf::from("out.docx"),
            DocumentMetadata::default(),
            DocumentSummary::default(),
            RenderStats::new(),
        );
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"output\":\"out.docx\""));
        assert!(json.contains("\"stats\""));
    }
}
