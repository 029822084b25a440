//! Rendering options.

/// Options controlling which parts of the styled document are generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit a cover page before the content
    pub generate_cover: bool,

    /// Emit a table of contents after the cover
    pub generate_toc: bool,

    /// Show "Section NN" labels above level-1 headings
    pub number_sections: bool,

    /// Emit the running header and footer
    pub header_footer: bool,

    /// Replace the document title on the cover only
    pub cover_title_override: Option<String>,

    /// Replace the footer's left text (e.g. a confidentiality mention)
    pub mention: Option<String>,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the cover page.
    pub fn with_cover(mut self, generate: bool) -> Self {
        self.generate_cover = generate;
        self
    }

    /// Enable or disable the table of contents.
    pub fn with_toc(mut self, generate: bool) -> Self {
        self.generate_toc = generate;
        self
    }

    /// Enable or disable section number labels.
    pub fn with_section_numbers(mut self, number: bool) -> Self {
        self.number_sections = number;
        self
    }

    /// Enable or disable header and footer.
    pub fn with_header_footer(mut self, enabled: bool) -> Self {
        self.header_footer = enabled;
        self
    }

    /// Set the cover title.
    pub fn with_cover_title(mut self, title: impl Into<String>) -> Self {
        self.cover_title_override = Some(title.into());
        self
    }

    /// Set the footer mention.
    pub fn with_mention(mut self, mention: impl Into<String>) -> Self {
        self.mention = Some(mention.into());
        self
    }

    /// Only the styled body: no cover, contents or running header/footer.
    pub fn body_only() -> Self {
        Self {
            generate_cover: false,
            generate_toc: false,
            header_footer: false,
            ..Self::default()
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            generate_cover: true,
            generate_toc: true,
            number_sections: true,
            header_footer: true,
            cover_title_override: None,
            mention: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_toc(false)
            .with_cover_title("Guide")
            .with_mention("Interne");

        assert!(options.generate_cover);
        assert!(!options.generate_toc);
        assert_eq!(options.cover_title_override.as_deref(), Some("Guide"));
        assert_eq!(options.mention.as_deref(), Some("Interne"));
    }

    #[test]
    fn test_body_only() {
        let options = RenderOptions::body_only();
        assert!(!options.generate_cover);
        assert!(!options.generate_toc);
        assert!(!options.header_footer);
        assert!(options.number_sections);
    }
}
