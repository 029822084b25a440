//! Structure detection over a parsed document tree.
//!
//! Detection never fails: an element that matches no pattern is left as it
//! was. Passes run in a fixed order:
//!
//! 1. heading levels are compressed to `1..=3`
//! 2. level-1 sections are numbered
//! 3. callouts replace matching tables and paragraphs
//! 4. step heads and their descriptions are grouped into steps blocks

pub mod callout;
pub mod headings;
pub mod steps;

pub use callout::{detect_callouts, match_keyword, KeywordMatch};
pub use headings::{assign_numbers, normalize_levels};
pub use steps::{detect_steps, step_number};

use crate::model::{ContentElement, DocumentTree, Paragraph};
use unicode_normalization::UnicodeNormalization;

/// Enriches a document tree with detected structure.
#[derive(Debug, Clone, Default)]
pub struct StructureDetector;

impl StructureDetector {
    /// Create a new detector.
    pub fn new() -> Self {
        Self
    }

    /// Run all detection passes and return the enriched tree.
    pub fn detect(&self, mut tree: DocumentTree) -> DocumentTree {
        log::info!("Starting structure detection");

        normalize_levels(&mut tree.sections);
        assign_numbers(&mut tree.sections);

        tree.preamble = self.detect_elements(std::mem::take(&mut tree.preamble));
        for section in &mut tree.sections {
            section.children = self.detect_elements(std::mem::take(&mut section.children));
        }

        let summary = tree.summary();
        log::info!(
            "Detection complete: {} callouts, {} steps blocks",
            summary.callouts,
            summary.steps_blocks
        );
        tree
    }

    /// Run callout then step detection on one element sequence.
    pub fn detect_elements(&self, elements: Vec<ContentElement>) -> Vec<ContentElement> {
        detect_steps(detect_callouts(elements))
    }
}

/// NFC-normalized text, so decomposed accents match the patterns.
pub(crate) fn normalize(text: &str) -> String {
    text.nfc().collect()
}

/// NFC-normalized paragraph text.
pub(crate) fn normalized_text(paragraph: &Paragraph) -> String {
    normalize(&paragraph.text())
}
