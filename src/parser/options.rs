//! Parsing options and configuration.

/// Options for parsing DOCX documents.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Whether to load embedded images
    pub extract_images: bool,

    /// Whether to infer a missing title from the first heading or bold paragraph
    pub infer_title: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable strict mode (missing embedded parts are fatal).
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Enable lenient mode (skip unreadable embedded parts).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable image extraction.
    pub fn with_images(mut self, extract: bool) -> Self {
        self.extract_images = extract;
        self
    }

    /// Skip images entirely.
    pub fn text_only(mut self) -> Self {
        self.extract_images = false;
        self
    }

    /// Enable or disable title inference.
    pub fn with_title_inference(mut self, infer: bool) -> Self {
        self.infer_title = infer;
        self
    }

    /// Whether the parser should fail instead of skipping broken content.
    pub fn is_strict(&self) -> bool {
        self.error_mode == ErrorMode::Strict
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            extract_images: true,
            infer_title: true,
        }
    }
}

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any unreadable embedded part
    Strict,
    /// Skip unreadable embedded parts and continue
    #[default]
    Lenient,
}
