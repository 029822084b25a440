//! # docstyle
//!
//! Restyle Word (.docx) documents with a declarative design system.
//!
//! A document goes through four stages:
//!
//! 1. **parse**: the `.docx` package becomes a [`DocumentTree`] of sections
//!    and typed content elements
//! 2. **detect**: callouts, step sequences and a normalized heading
//!    hierarchy are recognized in the tree
//! 3. **style-map**: every element is paired with a component style from
//!    the YAML [`DesignSystem`]
//! 4. **render**: a new `.docx` is written with a cover page, a table of
//!    contents, the styled body and a running header and footer
//!
//! ## Quick Start
//!
//! ```no_run
//! use docstyle::{transform_file, RenderOptions};
//!
//! let result = transform_file("manual.docx", "manual_styled.docx", &RenderOptions::default())
//!     .unwrap();
//! println!("{} sections written to {}", result.summary.sections, result.output.display());
//! ```
//!
//! ## Builder
//!
//! ```no_run
//! use docstyle::DocStyle;
//!
//! let result = DocStyle::new()
//!     .with_theme("corporate.yaml").unwrap()
//!     .with_toc(false)
//!     .with_mention("Diffusion restreinte")
//!     .transform("manual.docx", "out/manual.docx")
//!     .unwrap();
//! println!("{} headings", result.stats.heading_count);
//! ```

pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod structure;
pub mod style;

pub use detect::{detect_format_from_bytes, detect_format_from_path, is_docx, ZipSignature};
pub use error::{Error, Result};
pub use model::{
    Callout, CalloutType, ContentElement, DocumentMetadata, DocumentSummary, DocumentTree,
    ElementKind, Image, ListBlock, ListItem, ListType, Paragraph, Section, Step, StepsBlock, Table,
    TextRun,
};
pub use parser::{DocxParser, ErrorMode, ParseOptions};
pub use render::{
    render_bytes, render_file_with_stats, JsonFormat, RenderOptions, RenderStats, TransformResult,
};
pub use structure::StructureDetector;
pub use style::{DesignSystem, FontRole, Style, StyleMapper};

use std::io::Read;
use std::path::{Path, PathBuf};

/// Parse a `.docx` file into a document tree.
///
/// The tree is not yet enriched; see [`detect_structure`].
///
/// # Example
///
/// ```no_run
/// use docstyle::parse_file;
///
/// let tree = parse_file("manual.docx").unwrap();
/// println!("Sections: {}", tree.section_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<DocumentTree> {
    DocxParser::open(path)?.parse()
}

/// Parse a `.docx` file with custom options.
pub fn parse_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ParseOptions,
) -> Result<DocumentTree> {
    DocxParser::open_with_options(path, options)?.parse()
}

/// Parse a `.docx` document from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<DocumentTree> {
    DocxParser::from_bytes(data)?.parse()
}

/// Parse a `.docx` document from bytes with custom options.
pub fn parse_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<DocumentTree> {
    DocxParser::from_bytes_with_options(data, options)?.parse()
}

/// Parse a `.docx` document from a reader.
pub fn parse_reader<R: Read>(reader: R) -> Result<DocumentTree> {
    DocxParser::from_reader(reader)?.parse()
}

/// Enrich a parsed tree with callouts, steps and normalized headings.
pub fn detect_structure(tree: DocumentTree) -> DocumentTree {
    StructureDetector::new().detect(tree)
}

/// Render a tree to a styled `.docx` with the bundled design system.
///
/// Returns the canonicalized output path.
pub fn render_file(
    tree: &DocumentTree,
    output: impl AsRef<Path>,
    options: &RenderOptions,
) -> Result<PathBuf> {
    render::render_file(tree, output, options)
}

/// Render a tree to a styled `.docx` with a specific design system.
pub fn render_file_with_design(
    tree: &DocumentTree,
    output: impl AsRef<Path>,
    options: &RenderOptions,
    design: &DesignSystem,
) -> Result<PathBuf> {
    render::render_file_with_design(tree, output, options, design)
}

/// Run the whole pipeline: parse, detect and render.
///
/// # Example
///
/// ```no_run
/// use docstyle::{transform_file, RenderOptions};
///
/// let options = RenderOptions::default().with_cover_title("Manuel Utilisateur");
/// let result = transform_file("in.docx", "out.docx", &options).unwrap();
/// assert!(result.output.is_absolute());
/// ```
pub fn transform_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &RenderOptions,
) -> Result<TransformResult> {
    DocStyle::new()
        .with_render_options(options.clone())
        .transform(input, output)
}

/// Serialize a tree to JSON.
///
/// # Example
///
/// ```no_run
/// use docstyle::{parse_file, to_json, JsonFormat};
///
/// let tree = parse_file("manual.docx").unwrap();
/// let json = to_json(&tree, JsonFormat::Pretty).unwrap();
/// println!("{}", json);
/// ```
pub fn to_json(tree: &DocumentTree, format: JsonFormat) -> Result<String> {
    render::to_json(tree, format)
}

/// Builder over the whole pipeline.
///
/// # Example
///
/// ```no_run
/// use docstyle::DocStyle;
///
/// let tree = DocStyle::new().lenient().parse("manual.docx").unwrap();
/// println!("{} callouts", tree.summary().callouts);
/// ```
pub struct DocStyle {
    parse_options: ParseOptions,
    render_options: RenderOptions,
    design: DesignSystem,
}

impl DocStyle {
    /// Create a builder with the bundled design system and default options.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            render_options: RenderOptions::default(),
            design: DesignSystem::default_system(),
        }
    }

    /// Replace the design system.
    pub fn with_design(mut self, design: DesignSystem) -> Self {
        self.design = design;
        self
    }

    /// Load the base design system from a YAML file.
    pub fn with_config(self, path: impl AsRef<Path>) -> Result<Self> {
        let design = DesignSystem::from_path(path)?;
        Ok(self.with_design(design))
    }

    /// Merge a theme file over the current design system.
    pub fn with_theme(mut self, path: impl AsRef<Path>) -> Result<Self> {
        self.design = self.design.with_theme(path)?;
        Ok(self)
    }

    /// Replace the parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Replace the render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Fail on unreadable parts instead of skipping them.
    pub fn strict(mut self) -> Self {
        self.parse_options = self.parse_options.strict();
        self
    }

    /// Skip unreadable parts with a warning.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Enable or disable the cover page.
    pub fn with_cover(mut self, enabled: bool) -> Self {
        self.render_options = self.render_options.with_cover(enabled);
        self
    }

    /// Enable or disable the table of contents.
    pub fn with_toc(mut self, enabled: bool) -> Self {
        self.render_options = self.render_options.with_toc(enabled);
        self
    }

    /// Enable or disable `Section NN` labels on chapters.
    pub fn with_section_numbers(mut self, enabled: bool) -> Self {
        self.render_options = self.render_options.with_section_numbers(enabled);
        self
    }

    /// Enable or disable the running header and footer.
    pub fn with_header_footer(mut self, enabled: bool) -> Self {
        self.render_options = self.render_options.with_header_footer(enabled);
        self
    }

    /// Title printed on the cover instead of the document title.
    pub fn with_cover_title(mut self, title: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_cover_title(title);
        self
    }

    /// Text printed on the left of the footer.
    pub fn with_mention(mut self, mention: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_mention(mention);
        self
    }

    /// The design system in use.
    pub fn design(&self) -> &DesignSystem {
        &self.design
    }

    /// The render options in use.
    pub fn render_options(&self) -> &RenderOptions {
        &self.render_options
    }

    /// Parse and detect a document without rendering it.
    pub fn parse(&self, input: impl AsRef<Path>) -> Result<DocumentTree> {
        let tree = parse_file_with_options(input, self.parse_options.clone())?;
        Ok(detect_structure(tree))
    }

    /// Parse, detect and render a document.
    pub fn transform(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<TransformResult> {
        let tree = self.parse(input)?;
        let summary = tree.summary();
        let (output, stats) =
            render_file_with_stats(&tree, output, &self.render_options, &self.design)?;
        Ok(TransformResult::new(output, tree.metadata, summary, stats))
    }
}

impl Default for DocStyle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn docx(body: &str) -> Vec<u8> {
        let document = format!(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        );
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(document.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    fn heading(text: &str) -> String {
        format!(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>"#,
            text
        )
    }

    fn para(text: &str) -> String {
        format!(r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#, text)
    }

    fn sample() -> Vec<u8> {
        docx(&[
            heading("Installation"),
            para("Attention : ne pas interrompre la mise à jour."),
            para("Step 1: Configure"),
            para("Description one."),
            para("Step 2: Deploy"),
            para("Description two."),
        ]
        .concat())
    }

    #[test]
    fn test_builder_defaults() {
        let builder = DocStyle::new();
        let options = builder.render_options();
        assert!(options.generate_cover);
        assert!(options.generate_toc);
        assert!(options.number_sections);
        assert!(options.header_footer);
        assert!(options.mention.is_none());
    }

    #[test]
    fn test_builder_chain() {
        let builder = DocStyle::default()
            .strict()
            .with_cover(false)
            .with_toc(false)
            .with_section_numbers(false)
            .with_header_footer(false)
            .with_cover_title("Titre")
            .with_mention("Interne");
        let options = builder.render_options();
        assert!(!options.generate_cover);
        assert!(!options.generate_toc);
        assert!(!options.number_sections);
        assert!(!options.header_footer);
        assert_eq!(options.cover_title_override.as_deref(), Some("Titre"));
        assert_eq!(options.mention.as_deref(), Some("Interne"));
        assert!(builder.parse_options.is_strict());
    }

    #[test]
    fn test_builder_missing_theme() {
        let result = DocStyle::new().with_theme("/nonexistent/theme.yaml");
        assert!(matches!(result, Err(Error::FileNotFound(_))));
        let result = DocStyle::new().with_config("/nonexistent/config.yaml");
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[test]
    fn test_parse_bytes_and_detect() {
        let tree = parse_bytes(&sample()).unwrap();
        assert_eq!(tree.section_count(), 1);
        assert_eq!(tree.summary().callouts, 0);

        let tree = detect_structure(tree);
        let summary = tree.summary();
        assert_eq!(summary.callouts, 1);
        assert_eq!(summary.steps_blocks, 1);
        assert_eq!(tree.sections[0].number, Some(1));
    }

    #[test]
    fn test_parse_reader() {
        let tree = parse_reader(Cursor::new(sample())).unwrap();
        assert_eq!(tree.sections[0].heading, "Installation");
    }

    #[test]
    fn test_parse_bytes_invalid() {
        assert!(parse_bytes(&[]).is_err());
        assert!(parse_bytes(b"not a zip archive").is_err());
    }

    #[test]
    fn test_parse_file_not_found() {
        let result = parse_file("/nonexistent/path/file.docx");
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[test]
    fn test_parse_file_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manual.pdf");
        std::fs::write(&path, sample()).unwrap();
        let result = parse_file(&path);
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_transform_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("manual.docx");
        std::fs::write(&input, sample()).unwrap();
        let output = dir.path().join("out/manual_transformed.docx");

        let result = transform_file(&input, &output, &RenderOptions::default()).unwrap();
        assert!(result.output.is_absolute());
        assert!(result.output.exists());
        assert_eq!(result.summary.sections, 1);
        assert_eq!(result.stats.heading_count, 1);
        assert_eq!(result.stats.callout_count, 1);
        assert!(result.stats.cover);

        // The output parses back as a document.
        let tree = parse_file(&result.output).unwrap();
        assert!(tree.plain_text().contains("Description two."));
    }

    #[test]
    fn test_to_json() {
        let tree = detect_structure(parse_bytes(&sample()).unwrap());
        let json = to_json(&tree, JsonFormat::Compact).unwrap();
        assert!(json.contains("\"Installation\""));
        assert!(!json.contains('\n'));
    }
}
