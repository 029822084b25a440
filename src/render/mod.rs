//! Rendering of document trees into styled DOCX files and JSON.
//!
//! [`DocxRenderer`] walks a [`DocumentTree`] and emits WordprocessingML
//! through a [`DocxWriter`]. Layout is split by page region: `cover`, `toc`,
//! `body` and `header_footer` each add their own `impl` block.

mod body;
mod cover;
mod header_footer;
mod json;
mod options;
mod result;
mod toc;
pub mod writer;
pub mod xml;

pub use cover::{format_reference, split_title};
pub use json::{to_json, JsonFormat};
pub use options::RenderOptions;
pub use result::{RenderStats, TransformResult};
pub use toc::{leader_dots, toc_entries, TocEntry};
pub use writer::{DocxWriter, EmbeddedImage, StyleDefaults};

use crate::error::Result;
use crate::model::{DocumentTree, TextRun};
use crate::style::{is_hex_color, DesignSystem, FontRole, Style, StyleMapper};
use std::path::{Path, PathBuf};

/// Render a tree to a `.docx` file with the default design system.
///
/// Returns the canonicalized output path.
pub fn render_file(
    tree: &DocumentTree,
    output: impl AsRef<Path>,
    options: &RenderOptions,
) -> Result<PathBuf> {
    let design = DesignSystem::default_system();
    render_file_with_design(tree, output, options, &design)
}

/// Render a tree to a `.docx` file with a specific design system.
pub fn render_file_with_design(
    tree: &DocumentTree,
    output: impl AsRef<Path>,
    options: &RenderOptions,
    design: &DesignSystem,
) -> Result<PathBuf> {
    render_file_with_stats(tree, output, options, design).map(|(path, _)| path)
}

/// Render a tree to a `.docx` file and report what was emitted.
pub fn render_file_with_stats(
    tree: &DocumentTree,
    output: impl AsRef<Path>,
    options: &RenderOptions,
    design: &DesignSystem,
) -> Result<(PathBuf, RenderStats)> {
    let output = output.as_ref();
    let (bytes, stats) = DocxRenderer::new(design, options.clone()).render(tree)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, bytes)?;

    let resolved = output.canonicalize()?;
    log::info!("Document saved to {}", resolved.display());
    Ok((resolved, stats))
}

/// Render a tree to `.docx` bytes.
pub fn render_bytes(
    tree: &DocumentTree,
    options: &RenderOptions,
    design: &DesignSystem,
) -> Result<Vec<u8>> {
    DocxRenderer::new(design, options.clone())
        .render(tree)
        .map(|(bytes, _)| bytes)
}

/// Styled DOCX renderer.
pub struct DocxRenderer<'d> {
    design: &'d DesignSystem,
    mapper: StyleMapper<'d>,
    options: RenderOptions,
    writer: DocxWriter,
    stats: RenderStats,
    display_font: String,
    body_font: String,
}

impl<'d> DocxRenderer<'d> {
    /// Create a renderer over a design system.
    pub fn new(design: &'d DesignSystem, options: RenderOptions) -> Self {
        Self {
            design,
            mapper: StyleMapper::new(design),
            options,
            writer: DocxWriter::new(design.get_page_config()),
            stats: RenderStats::new(),
            display_font: design.get_font(FontRole::Display),
            body_font: design.get_font(FontRole::Body),
        }
    }

    /// Render a tree into package bytes and statistics.
    pub fn render(mut self, tree: &DocumentTree) -> Result<(Vec<u8>, RenderStats)> {
        self.render_internal(tree)?;
        let bytes = self.writer.to_bytes()?;
        Ok((bytes, self.stats))
    }

    fn render_internal(&mut self, tree: &DocumentTree) -> Result<()> {
        log::info!(
            "Rendering document: cover={}, toc={}, numbered={}, header_footer={}",
            self.options.generate_cover,
            self.options.generate_toc,
            self.options.number_sections,
            self.options.header_footer
        );
        self.setup_document(tree);

        if self.options.generate_cover {
            let mut metadata = tree.metadata.clone();
            if let Some(title) = self.options.cover_title_override.as_ref() {
                metadata.title = Some(title.clone());
            }
            self.render_cover(&metadata)?;
        }

        if self.options.generate_toc {
            self.render_toc(tree)?;
        }

        for element in &tree.preamble {
            self.render_element(element)?;
        }

        for section in &tree.sections {
            self.render_heading(&section.heading, section.level, section.number)?;
            for element in &section.children {
                self.render_element(element)?;
            }
        }

        if self.options.header_footer {
            self.render_header_footer(tree)?;
        }

        log::info!(
            "Rendered {} heading(s) and {} element(s), {} skipped",
            self.stats.heading_count,
            self.stats.element_count(),
            self.stats.skipped_count
        );
        Ok(())
    }

    fn setup_document(&mut self, tree: &DocumentTree) {
        let body = self.design.get_body_style();
        self.writer.set_defaults(StyleDefaults {
            body_font: self.body_font.clone(),
            display_font: self.display_font.clone(),
            body_size: body.u32_or("size", 21),
        });
        self.writer
            .set_properties(tree.metadata.title.as_deref(), tree.metadata.author.as_deref());
        self.writer.set_title_page(self.options.header_footer);
    }

    /// Resolve a color field of a style, with a palette name as default.
    fn style_color(&self, style: &Style, key: &str, default: &str) -> Result<String> {
        self.design.resolve_color(style.str_or(key, default))
    }

    /// Color of a source run, falling back when it has none usable.
    fn run_color(run: &TextRun, fallback: &str) -> String {
        match run.color.as_deref() {
            Some(color) if is_hex_color(color) => color.to_string(),
            _ => fallback.to_string(),
        }
    }
}
