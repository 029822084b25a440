//! Flat extraction of body content from the main document part.
//!
//! The extractor walks `w:body` once and emits [`RawElement`] records in
//! document order. Grouping lists and opening sections is left to the
//! tree builder.

use super::package::{DocxPackage, NumberingCatalog, Relationships, StyleCatalog};
use super::wml::{is_w, toggle, w_attr, w_child, w_children, w_val, A_NS, R_NS, VML_NS, WP_NS};
use super::ParseOptions;
use crate::error::{Error, Result};
use crate::model::{Image, ListType, Paragraph, Table, TextRun};
use regex::Regex;
use roxmltree::Node;
use std::sync::LazyLock;

/// Units per inch, for EMU to DXA conversion.
const EMU_PER_INCH: f64 = 914_400.0;
const DXA_PER_INCH: f64 = 1_440.0;

/// Smallest run size (half-points) that lets a bold paragraph count as a heading.
const HEURISTIC_HEADING_MIN_SIZE: u32 = 28;

/// Deepest heading level read from styles.
const MAX_HEADING_LEVEL: u32 = 6;

static HEADING_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Heading\s+([0-9])$").expect("valid heading regex"));

/// A flat record produced by the extractor.
#[derive(Debug, Clone, PartialEq)]
pub enum RawElement {
    /// A heading paragraph
    Heading {
        /// Source heading level (1..=6)
        level: u32,
        /// Stripped heading text
        text: String,
        /// Styled runs
        runs: Vec<TextRun>,
    },
    /// A body paragraph with visible text
    Paragraph(Paragraph),
    /// A table
    Table(Table),
    /// An embedded image
    Image(Image),
    /// A numbered or bulleted paragraph
    ListItem {
        /// Styled runs
        runs: Vec<TextRun>,
        /// Nesting level from `w:ilvl`
        level: u32,
        /// List flavor from the numbering definition
        list_type: ListType,
    },
    /// A page or section break
    PageBreak,
}

/// Walks the main document part of a package.
pub struct Extractor<'p> {
    package: &'p DocxPackage,
    options: &'p ParseOptions,
    rels: Relationships,
    styles: StyleCatalog,
    numbering: NumberingCatalog,
}

impl<'p> Extractor<'p> {
    /// Load the lookups needed for extraction.
    pub fn new(package: &'p DocxPackage, options: &'p ParseOptions) -> Result<Self> {
        let rels = package.document_relationships()?;
        let styles = package.styles()?;
        let numbering = package.numbering()?;
        log::debug!(
            "Extractor lookups: {} relationships, {} styles",
            rels.len(),
            styles.len()
        );
        Ok(Self {
            package,
            options,
            rels,
            styles,
            numbering,
        })
    }

    /// Extract all body records in document order.
    pub fn extract(&self) -> Result<Vec<RawElement>> {
        let xml = self.package.main_document()?;
        let doc = roxmltree::Document::parse(xml)
            .map_err(|e| Error::Corrupted(format!("main document is not valid XML: {}", e)))?;
        let body = w_child(doc.root_element(), "body")
            .ok_or_else(|| Error::Corrupted("main document has no w:body".to_string()))?;

        let mut out = Vec::new();
        self.walk_blocks(body, &mut out)?;
        log::debug!("Extracted {} raw elements", out.len());
        Ok(out)
    }

    fn walk_blocks(&self, container: Node, out: &mut Vec<RawElement>) -> Result<()> {
        for child in container.children().filter(Node::is_element) {
            if is_w(child, "p") {
                self.process_paragraph(child, out)?;
            } else if is_w(child, "tbl") {
                out.push(RawElement::Table(self.extract_table(child)));
            } else if is_w(child, "sdt") {
                if let Some(content) = w_child(child, "sdtContent") {
                    self.walk_blocks(content, out)?;
                }
            } else if is_w(child, "sectPr") {
                continue;
            } else {
                log::debug!("Skipping body element <{}>", child.tag_name().name());
            }
        }
        Ok(())
    }

    fn process_paragraph(&self, paragraph: Node, out: &mut Vec<RawElement>) -> Result<()> {
        if has_page_break(paragraph) {
            out.push(RawElement::PageBreak);
        }

        if self.options.extract_images {
            for image in self.extract_images(paragraph)? {
                out.push(RawElement::Image(image));
            }
        }

        let heading_level = detect_heading_level(paragraph, &self.styles);
        let list_info = self.detect_list(paragraph);
        let runs = self.extract_runs(paragraph);
        let text: String = runs.iter().map(|r| r.text.as_str()).collect();
        let stripped = text.trim();

        if let Some(level) = heading_level {
            out.push(RawElement::Heading {
                level,
                text: stripped.to_string(),
                runs,
            });
        } else if let Some((level, list_type)) = list_info {
            out.push(RawElement::ListItem {
                runs,
                level,
                list_type,
            });
        } else if !stripped.is_empty() {
            out.push(RawElement::Paragraph(Paragraph::from_runs(runs)));
        }
        Ok(())
    }

    /// `(level, kind)` of a list paragraph, or `None` for ordinary paragraphs.
    fn detect_list(&self, paragraph: Node) -> Option<(u32, ListType)> {
        let num_pr = w_child(paragraph, "pPr").and_then(|ppr| w_child(ppr, "numPr"))?;
        let level = w_val(num_pr, "ilvl")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let num_id = w_val(num_pr, "numId").unwrap_or("0");
        if num_id == "0" {
            return None;
        }
        Some((level, self.numbering.list_type(num_id)))
    }

    /// Runs of direct `w:r` children and of runs nested in hyperlinks.
    fn extract_runs(&self, paragraph: Node) -> Vec<TextRun> {
        let mut runs = Vec::new();
        self.collect_runs(paragraph, None, &mut runs);
        runs
    }

    fn collect_runs(&self, container: Node, hyperlink: Option<&str>, runs: &mut Vec<TextRun>) {
        for child in container.children().filter(Node::is_element) {
            if is_w(child, "r") {
                if let Some(mut run) = parse_run(child) {
                    run.hyperlink = hyperlink.map(str::to_string);
                    runs.push(run);
                }
            } else if is_w(child, "hyperlink") {
                let target = self.hyperlink_target(child);
                self.collect_runs(child, target.as_deref(), runs);
            } else if is_w(child, "ins") || is_w(child, "smartTag") {
                self.collect_runs(child, hyperlink, runs);
            }
        }
    }

    fn hyperlink_target(&self, hyperlink: Node) -> Option<String> {
        if let Some(target) = hyperlink.attribute((R_NS, "id")).and_then(|id| self.rels.target(id)) {
            return Some(target.to_string());
        }
        w_attr(hyperlink, "anchor")
            .filter(|a| !a.is_empty())
            .map(|anchor| format!("#{}", anchor))
    }

    fn extract_images(&self, paragraph: Node) -> Result<Vec<Image>> {
        let mut images = Vec::new();

        for drawing in paragraph.descendants().filter(|n| is_w(*n, "drawing")) {
            let (width, height) = drawing_extent(drawing);
            let alt_text = drawing_alt_text(drawing);
            for blip in drawing.descendants().filter(|n| is_named(*n, A_NS, "blip")) {
                let Some(embed) = blip.attribute((R_NS, "embed")) else {
                    continue;
                };
                if let Some(mut image) = self.load_image(embed)? {
                    image.width = width;
                    image.height = height;
                    image.alt_text = alt_text.clone();
                    images.push(image);
                }
            }
        }

        for pict in paragraph.descendants().filter(|n| is_w(*n, "pict")) {
            let ids = pict
                .descendants()
                .filter(|n| is_named(*n, VML_NS, "imagedata"))
                .filter_map(|n| n.attribute((R_NS, "id")));
            for id in ids {
                if let Some(image) = self.load_image(id)? {
                    images.push(image);
                    break;
                }
            }
        }

        Ok(images)
    }

    /// Load an image part by relationship id.
    ///
    /// Strict mode turns a dangling reference into an error; lenient mode
    /// logs it and skips the image.
    fn load_image(&self, rel_id: &str) -> Result<Option<Image>> {
        let part_name = self.rels.part_name(rel_id);
        let data = part_name.as_deref().and_then(|name| self.package.part(name));
        match (part_name, data) {
            (Some(name), Some(data)) => {
                let filename = name.rsplit('/').next().unwrap_or(&name).to_string();
                Ok(Some(Image::new(data.to_vec()).with_filename(filename)))
            }
            (name, _) => {
                let what = name.unwrap_or_else(|| rel_id.to_string());
                if self.options.is_strict() {
                    Err(Error::ResourceNotFound(what))
                } else {
                    log::warn!("Skipping image: part '{}' is missing", what);
                    Ok(None)
                }
            }
        }
    }

    fn extract_table(&self, table: Node) -> Table {
        let mut result = Table::new();

        for (row_idx, row) in w_children(table, "tr").enumerate() {
            let mut texts = Vec::new();
            let mut row_runs = Vec::new();

            for cell in w_children(row, "tc") {
                let mut paragraphs = Vec::new();
                let mut runs = Vec::new();
                for paragraph in w_children(cell, "p") {
                    let para_runs = self.extract_runs(paragraph);
                    paragraphs.push(para_runs.iter().map(|r| r.text.as_str()).collect::<String>());
                    runs.extend(para_runs);
                }
                let text = paragraphs.join("\n").trim().to_string();

                // A horizontally merged cell occupies every grid column it spans.
                let span = w_child(cell, "tcPr")
                    .and_then(|pr| w_val(pr, "gridSpan"))
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(1)
                    .max(1);
                for _ in 0..span {
                    texts.push(text.clone());
                    row_runs.push(runs.clone());
                }
            }

            if row_idx == 0 {
                result.headers = texts;
                result.header_runs = row_runs;
            } else {
                result.rows.push(texts);
                result.cell_runs.push(row_runs);
            }
        }

        result
    }
}

fn is_named(node: Node, ns: &str, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name && node.tag_name().namespace() == Some(ns)
}

/// Convert EMU to DXA, rounding to the nearest twip.
pub(crate) fn emu_to_dxa(emu: u64) -> u32 {
    (emu as f64 * DXA_PER_INCH / EMU_PER_INCH).round() as u32
}

fn drawing_extent(drawing: Node) -> (Option<u32>, Option<u32>) {
    let Some(extent) = drawing.descendants().find(|n| is_named(*n, WP_NS, "extent")) else {
        return (None, None);
    };
    let dim = |attr: &str| {
        extent
            .attribute(attr)
            .and_then(|v| v.parse::<u64>().ok())
            .map(emu_to_dxa)
    };
    (dim("cx"), dim("cy"))
}

fn drawing_alt_text(drawing: Node) -> String {
    drawing
        .descendants()
        .find(|n| is_named(*n, WP_NS, "docPr"))
        .map(|doc_pr| {
            let descr = doc_pr.attribute("descr").unwrap_or("");
            if descr.is_empty() {
                doc_pr.attribute("name").unwrap_or("").to_string()
            } else {
                descr.to_string()
            }
        })
        .unwrap_or_default()
}

/// Whether a paragraph carries a page, column, section or rendered page break.
fn has_page_break(paragraph: Node) -> bool {
    let run_break = w_children(paragraph, "r").any(|run| {
        w_children(run, "br").any(|br| matches!(w_attr(br, "type"), Some("page" | "column")))
            || w_child(run, "lastRenderedPageBreak").is_some()
    });
    run_break
        || w_child(paragraph, "pPr")
            .and_then(|ppr| w_child(ppr, "sectPr"))
            .is_some()
}

/// Parse one `w:r` element. Runs with no text, tab or soft break are dropped.
fn parse_run(run: Node) -> Option<TextRun> {
    let mut text = String::new();
    for child in run.children().filter(Node::is_element) {
        if is_w(child, "t") {
            text.push_str(child.text().unwrap_or(""));
        } else if is_w(child, "tab") {
            text.push('\t');
        } else if is_w(child, "cr") || is_soft_break(child) {
            text.push('\n');
        }
    }
    if text.is_empty() {
        return None;
    }

    let mut result = TextRun::new(text);
    if let Some(rpr) = w_child(run, "rPr") {
        result.bold = toggle(rpr, "b");
        result.italic = toggle(rpr, "i");
        result.underline = w_val(rpr, "u")
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "none" | "false" | "0"))
            .unwrap_or(false);
        result.strikethrough = toggle(rpr, "strike") || toggle(rpr, "dstrike");
        result.color = w_val(rpr, "color").and_then(color_value);
        result.font_size = font_size(rpr);
    }
    Some(result)
}

fn is_soft_break(node: Node) -> bool {
    is_w(node, "br") && w_attr(node, "type").unwrap_or("textWrapping") == "textWrapping"
}

fn color_value(val: &str) -> Option<String> {
    if val.is_empty() || val.eq_ignore_ascii_case("auto") || val.eq_ignore_ascii_case("none") {
        None
    } else if val.starts_with('#') {
        Some(val.to_string())
    } else {
        Some(format!("#{}", val))
    }
}

fn font_size(rpr: Node) -> Option<u32> {
    w_val(rpr, "sz").and_then(|v| v.parse().ok())
}

// Heading detection

/// Inputs shared by the heading strategies.
struct HeadingProbe<'a, 'input> {
    paragraph: Node<'a, 'input>,
    properties: Option<Node<'a, 'input>>,
    style_id: Option<&'a str>,
    styles: &'a StyleCatalog,
}

type HeadingStrategy = fn(&HeadingProbe<'_, '_>) -> Option<u32>;

/// Strategies in priority order; the first that yields a level wins.
const HEADING_STRATEGIES: [(&str, HeadingStrategy); 4] = [
    ("paragraph outline level", level_from_paragraph_outline),
    ("style outline level", level_from_style_outline),
    ("style name", level_from_style_name),
    ("bold run heuristic", level_from_run_formatting),
];

/// Heading level (1..=6) of a paragraph, or `None` for body text.
pub(crate) fn detect_heading_level(paragraph: Node, styles: &StyleCatalog) -> Option<u32> {
    let properties = w_child(paragraph, "pPr");
    let probe = HeadingProbe {
        paragraph,
        properties,
        style_id: properties.and_then(|ppr| w_val(ppr, "pStyle")).filter(|s| !s.is_empty()),
        styles,
    };
    HEADING_STRATEGIES.iter().find_map(|(name, strategy)| {
        let level = strategy(&probe)?;
        log::debug!("Heading level {} from {}", level, name);
        Some(level)
    })
}

fn outline_to_level(outline: u32) -> Option<u32> {
    (outline <= 5).then_some(outline + 1)
}

fn level_from_paragraph_outline(probe: &HeadingProbe<'_, '_>) -> Option<u32> {
    probe
        .properties
        .and_then(|ppr| w_val(ppr, "outlineLvl"))
        .and_then(|v| v.parse().ok())
        .and_then(outline_to_level)
}

fn level_from_style_outline(probe: &HeadingProbe<'_, '_>) -> Option<u32> {
    probe
        .styles
        .get(probe.style_id?)
        .and_then(|style| style.outline_level)
        .and_then(outline_to_level)
}

fn level_from_style_name(probe: &HeadingProbe<'_, '_>) -> Option<u32> {
    let style_id = probe.style_id?;
    let style_name = probe.styles.get(style_id).and_then(|s| s.name.as_deref());
    let candidates = || style_name.into_iter().chain(Some(style_id)).filter(|c| !c.is_empty());

    for candidate in candidates() {
        if let Some(level) = numbered_heading_name(candidate) {
            return Some(level);
        }
    }
    for candidate in candidates() {
        match candidate.to_lowercase().as_str() {
            "title" | "titre" => return Some(1),
            "subtitle" | "sous-titre" | "soustitre" => return Some(2),
            _ => {}
        }
    }
    None
}

/// `Heading 2`, `heading2`, `Titre 2` and friends.
fn numbered_heading_name(candidate: &str) -> Option<u32> {
    if let Some(caps) = HEADING_NAME_RE.captures(candidate) {
        return caps[1].parse::<u32>().ok().map(|n| n.min(MAX_HEADING_LEVEL));
    }
    let compact = candidate.to_lowercase().replace(' ', "");
    ["heading", "titre"].iter().find_map(|prefix| {
        let digits = compact.strip_prefix(prefix)?;
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        digits.parse::<u32>().ok().map(|n| n.min(MAX_HEADING_LEVEL))
    })
}

/// All visible direct runs bold and at least 14pt.
fn level_from_run_formatting(probe: &HeadingProbe<'_, '_>) -> Option<u32> {
    let mut all_bold = true;
    let mut max_size: Option<u32> = None;

    for run in w_children(probe.paragraph, "r") {
        let first_text = w_child(run, "t").and_then(|t| t.text()).unwrap_or("");
        if first_text.trim().is_empty() {
            continue;
        }
        let rpr = w_child(run, "rPr");
        let bold = rpr
            .and_then(|pr| w_child(pr, "b"))
            .map(|b| !matches!(w_attr(b, "val"), Some("false" | "0")))
            .unwrap_or(false);
        if !bold {
            all_bold = false;
        }
        if let Some(size) = rpr.and_then(font_size) {
            max_size = Some(max_size.map_or(size, |m| m.max(size)));
        }
    }

    let size = max_size?;
    if !all_bold || size < HEURISTIC_HEADING_MIN_SIZE {
        return None;
    }
    Some(match size {
        s if s >= 48 => 1,
        s if s >= 36 => 2,
        _ => 3,
    })
}
