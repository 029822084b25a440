//! Paragraph and text-level types.

use serde::{Deserialize, Serialize};

/// A contiguous span of text with uniform inline formatting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Underlined text
    pub underline: bool,

    /// Strikethrough (single or double)
    pub strikethrough: bool,

    /// Text color (hex format, e.g., "#FF0000")
    pub color: Option<String>,

    /// Font size override in half-points (24 = 12pt)
    pub font_size: Option<u32>,

    /// Hyperlink target (external URL or `#anchor`)
    pub hyperlink: Option<String>,
}

impl TextRun {
    /// Create a new text run with default formatting.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Create a bold text run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            ..Default::default()
        }
    }

    /// Create an italic text run.
    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            italic: true,
            ..Default::default()
        }
    }

    /// Attach a hyperlink target.
    pub fn with_hyperlink(mut self, target: impl Into<String>) -> Self {
        self.hyperlink = Some(target.into());
        self
    }

    /// Copy this run's formatting onto different text.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Check if this run holds only whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Check if any inline styling is applied.
    pub fn has_styling(&self) -> bool {
        self.bold || self.italic || self.underline || self.strikethrough
    }
}

/// A paragraph: an ordered sequence of runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Text runs in the paragraph
    pub runs: Vec<TextRun>,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self { runs: Vec::new() }
    }

    /// Create a paragraph from runs.
    pub fn from_runs(runs: Vec<TextRun>) -> Self {
        Self { runs }
    }

    /// Create a paragraph with plain text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![TextRun::new(text)],
        }
    }

    /// Add a styled text run.
    pub fn add_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Check if the paragraph has no visible text.
    pub fn is_blank(&self) -> bool {
        self.runs.iter().all(TextRun::is_blank)
    }

    /// The first run that carries visible text.
    pub fn first_visible_run(&self) -> Option<&TextRun> {
        self.runs.iter().find(|r| !r.is_blank())
    }

    /// Whether the paragraph opens with a bold run (ignoring blank runs).
    pub fn starts_bold(&self) -> bool {
        self.first_visible_run().map(|r| r.bold).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_text() {
        let mut p = Paragraph::new();
        p.add_run(TextRun::new("hello "));
        p.add_run(TextRun::bold("world"));
        assert_eq!(p.text(), "hello world");
    }

    #[test]
    fn test_empty_paragraph() {
        let p = Paragraph::new();
        assert_eq!(p.text(), "");
        assert!(p.is_blank());
    }

    #[test]
    fn test_starts_bold_skips_blank_runs() {
        let p = Paragraph::from_runs(vec![TextRun::new("  "), TextRun::bold("Title"), TextRun::new(" rest")]);
        assert!(p.starts_bold());

        let p = Paragraph::from_runs(vec![TextRun::new("plain"), TextRun::bold("bold")]);
        assert!(!p.starts_bold());
    }

    #[test]
    fn test_with_text_keeps_formatting() {
        let mut run = TextRun::bold("Note: body");
        run.color = Some("#FF0000".to_string());
        let copy = run.with_text("body");
        assert_eq!(copy.text, "body");
        assert!(copy.bold);
        assert_eq!(copy.color.as_deref(), Some("#FF0000"));
    }

    #[test]
    fn test_run_styling() {
        assert!(!TextRun::new("x").has_styling());
        assert!(TextRun::italic("x").has_styling());
        let link = TextRun::new("site").with_hyperlink("https://example.com");
        assert_eq!(link.hyperlink.as_deref(), Some("https://example.com"));
    }
}
