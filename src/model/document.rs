//! Document-level types.

use super::{ContentElement, ElementKind};
use serde::{Deserialize, Serialize};

/// Document metadata read from the package core properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Document title
    pub title: Option<String>,

    /// Document author (core `dc:creator`)
    pub author: Option<String>,

    /// Creation date, falling back to modification date (`YYYY-MM-DD`)
    pub date: Option<String>,

    /// Document version string
    pub version: Option<String>,

    /// Reference code; synthesized at render time when absent
    pub reference: Option<String>,
}

impl DocumentMetadata {
    /// Title, or an empty string.
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Whether a non-blank title is present.
    pub fn has_title(&self) -> bool {
        self.title.as_deref().map(|t| !t.trim().is_empty()).unwrap_or(false)
    }
}

/// A heading with the content that follows it up to the next heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Heading text
    pub heading: String,

    /// Heading level (1..=3 after normalization)
    pub level: u32,

    /// Section number; only level-1 sections are numbered after detection
    pub number: Option<u32>,

    /// Content elements of the section
    pub children: Vec<ContentElement>,
}

impl Section {
    /// Create a new section without content.
    pub fn new(heading: impl Into<String>, level: u32) -> Self {
        Self {
            heading: heading.into(),
            level,
            number: None,
            children: Vec::new(),
        }
    }

    /// Set the section number.
    pub fn with_number(mut self, number: u32) -> Self {
        self.number = Some(number);
        self
    }

    /// Add a content element.
    pub fn push(&mut self, element: impl Into<ContentElement>) {
        self.children.push(element.into());
    }
}

/// The root aggregate of the intermediate representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentTree {
    /// Document metadata
    pub metadata: DocumentMetadata,

    /// Sections in document order
    pub sections: Vec<Section>,

    /// Content appearing before the first heading
    pub preamble: Vec<ContentElement>,
}

impl DocumentTree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sections.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Check if the tree holds no content.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.preamble.is_empty()
    }

    /// All content elements in document order (preamble first).
    pub fn elements(&self) -> impl Iterator<Item = &ContentElement> {
        self.preamble
            .iter()
            .chain(self.sections.iter().flat_map(|s| s.children.iter()))
    }

    /// Plain text of the whole tree, headings included.
    pub fn plain_text(&self) -> String {
        let mut blocks: Vec<String> = self.preamble.iter().map(ContentElement::plain_text).collect();
        for section in &self.sections {
            blocks.push(section.heading.clone());
            blocks.extend(section.children.iter().map(ContentElement::plain_text));
        }
        blocks.retain(|b| !b.is_empty());
        blocks.join("\n\n")
    }

    /// Count the structural elements of the tree.
    pub fn summary(&self) -> DocumentSummary {
        let mut summary = DocumentSummary {
            sections: self.sections.len(),
            ..Default::default()
        };
        for element in self.elements() {
            summary.add(element.kind());
        }
        summary
    }
}

/// Element counts for a document tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Number of sections
    pub sections: usize,
    /// Number of paragraphs
    pub paragraphs: usize,
    /// Number of tables
    pub tables: usize,
    /// Number of images
    pub images: usize,
    /// Number of callouts
    pub callouts: usize,
    /// Number of list blocks
    pub lists: usize,
    /// Number of steps blocks
    pub steps_blocks: usize,
    /// Number of page breaks
    pub page_breaks: usize,
}

impl DocumentSummary {
    fn add(&mut self, kind: ElementKind) {
        match kind {
            ElementKind::Paragraph => self.paragraphs += 1,
            ElementKind::Table => self.tables += 1,
            ElementKind::Image => self.images += 1,
            ElementKind::Callout => self.callouts += 1,
            ElementKind::List => self.lists += 1,
            ElementKind::Steps => self.steps_blocks += 1,
            ElementKind::PageBreak => self.page_breaks += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Callout, CalloutType, ListBlock, ListType, Paragraph, Step, StepsBlock, Table,
    };

    #[test]
    fn test_document_tree_summary() {
        let mut s1 = Section::new("S1", 1);
        s1.push(Paragraph::with_text("text"));
        s1.push(Table::from_strings(["A", "B"], vec![vec!["1", "2"]]));
        s1.push(ContentElement::Callout(Callout::new(CalloutType::Info, "info")));

        let mut s2 = Section::new("S2", 1);
        s2.push(Paragraph::with_text("more"));
        s2.push(ContentElement::List(ListBlock::new(ListType::Bullet, vec![])));
        s2.push(ContentElement::Steps(StepsBlock {
            steps: vec![Step {
                number: 1,
                title: "S".into(),
                ..Default::default()
            }],
        }));

        let tree = DocumentTree {
            sections: vec![s1, s2],
            ..Default::default()
        };
        let summary = tree.summary();

        assert_eq!(summary.sections, 2);
        assert_eq!(summary.paragraphs, 2);
        assert_eq!(summary.tables, 1);
        assert_eq!(summary.callouts, 1);
        assert_eq!(summary.lists, 1);
        assert_eq!(summary.steps_blocks, 1);
        assert_eq!(summary.images, 0);
    }

    #[test]
    fn test_elements_order() {
        let mut section = Section::new("Intro", 1);
        section.push(Paragraph::with_text("second"));
        let tree = DocumentTree {
            preamble: vec![Paragraph::with_text("first").into()],
            sections: vec![section],
            ..Default::default()
        };
        let texts: Vec<String> = tree.elements().map(ContentElement::plain_text).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(tree.plain_text(), "first\n\nIntro\n\nsecond");
    }
}
