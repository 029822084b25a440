//! Table of contents page.
//!
//! Word's layout engine is not available, so page numbers are estimates:
//! the first entry is assumed on page 3 and every level-1 section is
//! counted as two pages.

use super::xml::{Border, ParagraphXml, RunProps};
use super::DocxRenderer;
use crate::error::Result;
use crate::model::DocumentTree;
use serde::Serialize;

const TOC_TITLE: &str = "Table des matières";
const FIRST_PAGE_ESTIMATE: u32 = 3;
const PAGES_PER_CHAPTER: u32 = 2;
const LEADER_BASE: usize = 40;
const LEADER_MIN: usize = 6;
const LEVEL2_INDENT: u32 = 720;

/// One line of the table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub level: u32,
    pub number: Option<u32>,
    pub title: String,
    /// Estimated page number
    pub page: u32,
}

/// Entries for the level-1 and level-2 sections of a tree, in order.
pub fn toc_entries(tree: &DocumentTree) -> Vec<TocEntry> {
    let mut page = FIRST_PAGE_ESTIMATE;
    tree.sections
        .iter()
        .filter(|s| matches!(s.level, 1 | 2))
        .map(|section| {
            let entry = TocEntry {
                level: section.level,
                number: section.number,
                title: section.heading.clone(),
                page,
            };
            if section.level == 1 {
                page += PAGES_PER_CHAPTER;
            }
            entry
        })
        .collect()
}

/// Dot leader between a title and its page number.
pub fn leader_dots(title: &str) -> String {
    let count = LEADER_BASE
        .saturating_sub(title.chars().count() / 2)
        .max(LEADER_MIN);
    format!("  {}  ", ".".repeat(count))
}

impl DocxRenderer<'_> {
    pub(super) fn render_toc(&mut self, tree: &DocumentTree) -> Result<()> {
        let entries = toc_entries(tree);
        if entries.is_empty() {
            log::warn!("No sections found for table of contents; skipping");
            return Ok(());
        }
        log::info!("Generating table of contents");

        let heading = self.design.get_heading_style(1);
        let heading_color = self.style_color(&heading, "color", "black")?;
        self.writer.push_paragraph(
            &ParagraphXml::new()
                .spacing(
                    heading.u32_or("spacing_before", 0),
                    heading.u32_or("spacing_after", 200),
                )
                .run(
                    TOC_TITLE,
                    RunProps::new()
                        .font(self.display_font.clone())
                        .size(heading.u32_or("size", 40))
                        .color(&heading_color)
                        .bold(true),
                ),
        );

        let accent = self.design.resolve_color("accent_blue")?;
        self.writer.push_paragraph(
            &ParagraphXml::new()
                .spacing(0, 320)
                .border_bottom(Border::eighths(12, &accent).with_space(1)),
        );

        let black = self.design.resolve_color("black")?;
        let dark_gray = self.design.resolve_color("dark_gray")?;
        for entry in &entries {
            let chapter = entry.level == 1;
            let (font, size, spacing) = if chapter {
                (self.display_font.clone(), 26, 80)
            } else {
                (self.body_font.clone(), 22, 40)
            };
            let base = RunProps::new().font(font).size(size);
            let title_color = if chapter { &black } else { &dark_gray };
            let number = entry
                .number
                .map_or_else(|| "00".to_string(), |n| format!("{:02}", n));

            let mut paragraph = ParagraphXml::new().spacing(spacing, spacing);
            if !chapter {
                paragraph = paragraph.indent_left(LEVEL2_INDENT);
            }
            let paragraph = paragraph
                .run(number, base.clone().bold(true).color(&accent))
                .run(" \u{2014} ", base.clone().bold(chapter).color(title_color))
                .run(entry.title.clone(), base.clone().bold(chapter).color(title_color))
                .run(leader_dots(&entry.title), base.clone().color(&dark_gray))
                .run(entry.page.to_string(), base.bold(chapter).color(&accent));
            self.writer.push_paragraph(&paragraph);
            log::debug!(
                "TOC entry: {} (level {}, est. page {})",
                entry.title,
                entry.level,
                entry.page
            );
        }

        self.writer.push_paragraph(&ParagraphXml::page_break());
        self.stats.toc_entries = entries.len() as u32;
        log::info!("Table of contents generated with {} entries", entries.len());
        Ok(())
    }
}
