//! WordprocessingML fragment builders.
//!
//! Paragraphs, runs and tables are assembled as plain values and serialized
//! with `to_xml` into a `String` buffer. Element order inside `w:pPr`,
//! `w:rPr`, `w:tblPr` and `w:tcPr` follows the schema sequence, which Word
//! enforces.

use quick_xml::escape::escape;
use std::fmt::Write;

/// EMU per DXA (twentieth of a point).
pub const EMU_PER_DXA: u64 = 635;

/// EMU per pixel at 96 DPI.
pub const EMU_PER_PIXEL: u64 = 9525;

/// Border widths are given in points and written in eighth-points.
pub const EIGHTHS_PER_POINT: u32 = 8;

/// Normalize a resolved color to the `RRGGBB` form WordprocessingML wants.
///
/// The leading `#` is dropped and 3-digit colors are expanded.
pub fn color_hex(color: &str) -> String {
    let digits = color.trim().trim_start_matches('#');
    if digits.len() == 3 {
        digits
            .chars()
            .flat_map(|c| [c, c])
            .collect::<String>()
            .to_ascii_uppercase()
    } else {
        digits.to_ascii_uppercase()
    }
}

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Both,
}

impl Alignment {
    /// Value of `w:jc`.
    pub fn as_str(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Both => "both",
        }
    }

    /// Parse a configuration value; anything unknown is left alignment.
    pub fn from_config(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "center" | "centre" => Alignment::Center,
            "right" => Alignment::Right,
            "justify" | "both" => Alignment::Both,
            _ => Alignment::Left,
        }
    }
}

/// A single-line border edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Border {
    /// Width in eighth-points.
    pub size: u32,
    /// `RRGGBB` color.
    pub color: String,
    /// Distance from the text in points.
    pub space: u32,
}

impl Border {
    /// A single border of `points` width in the given color.
    pub fn single(points: u32, color: &str) -> Self {
        Self {
            size: points * EIGHTHS_PER_POINT,
            color: color_hex(color),
            space: 0,
        }
    }

    /// A single border with a width already in eighth-points.
    pub fn eighths(size: u32, color: &str) -> Self {
        Self {
            size,
            color: color_hex(color),
            space: 0,
        }
    }

    /// Set the distance from the text.
    pub fn with_space(mut self, space: u32) -> Self {
        self.space = space;
        self
    }

    fn write(&self, xml: &mut String, edge: &str) {
        let _ = write!(
            xml,
            "<w:{} w:val=\"single\" w:sz=\"{}\" w:space=\"{}\" w:color=\"{}\"/>",
            edge, self.size, self.space, self.color
        );
    }
}

fn write_edge(xml: &mut String, edge: &str, border: Option<&Border>) {
    match border {
        Some(border) => border.write(xml, edge),
        None => {
            let _ = write!(xml, "<w:{} w:val=\"nil\"/>", edge);
        }
    }
}

/// Character formatting of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunProps {
    pub font: Option<String>,
    /// Size in half-points.
    pub size: Option<u32>,
    /// `RRGGBB` color.
    pub color: Option<String>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
}

impl RunProps {
    /// Empty formatting.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    pub fn size(mut self, half_points: u32) -> Self {
        self.size = Some(half_points);
        self
    }

    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color_hex(color));
        self
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn underline(mut self, underline: bool) -> Self {
        self.underline = underline;
        self
    }

    pub fn strike(mut self, strike: bool) -> Self {
        self.strike = strike;
        self
    }

    fn is_empty(&self) -> bool {
        *self == RunProps::default()
    }

    fn write(&self, xml: &mut String) {
        if self.is_empty() {
            return;
        }
        xml.push_str("<w:rPr>");
        if let Some(font) = &self.font {
            let font = escape(font);
            let _ = write!(
                xml,
                "<w:rFonts w:ascii=\"{0}\" w:hAnsi=\"{0}\" w:cs=\"{0}\"/>",
                font
            );
        }
        if self.bold {
            xml.push_str("<w:b/><w:bCs/>");
        }
        if self.italic {
            xml.push_str("<w:i/><w:iCs/>");
        }
        if self.strike {
            xml.push_str("<w:strike/>");
        }
        if let Some(color) = &self.color {
            let _ = write!(xml, "<w:color w:val=\"{}\"/>", color);
        }
        if let Some(size) = self.size {
            let _ = write!(xml, "<w:sz w:val=\"{0}\"/><w:szCs w:val=\"{0}\"/>", size);
        }
        if self.underline {
            xml.push_str("<w:u w:val=\"single\"/>");
        }
        xml.push_str("</w:rPr>");
    }
}

/// Paragraph-level content.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    /// A text run. Embedded `\t` and `\n` become tabs and line breaks.
    Text { text: String, props: RunProps },
    /// A tab character.
    Tab(RunProps),
    /// A hard page break.
    PageBreak,
    /// A prebuilt `w:drawing` element.
    Drawing(String),
    /// A link to an external relationship or an internal bookmark.
    Hyperlink {
        rel_id: Option<String>,
        anchor: Option<String>,
        runs: Vec<Inline>,
    },
    /// A `PAGE` field showing the current page number.
    PageNumber(RunProps),
}

impl Inline {
    /// Text run shorthand.
    pub fn text(text: impl Into<String>, props: RunProps) -> Self {
        Inline::Text {
            text: text.into(),
            props,
        }
    }

    fn write(&self, xml: &mut String) {
        match self {
            Inline::Text { text, props } => {
                xml.push_str("<w:r>");
                props.write(xml);
                write_text(xml, text);
                xml.push_str("</w:r>");
            }
            Inline::Tab(props) => {
                xml.push_str("<w:r>");
                props.write(xml);
                xml.push_str("<w:tab/></w:r>");
            }
            Inline::PageBreak => xml.push_str("<w:r><w:br w:type=\"page\"/></w:r>"),
            Inline::Drawing(drawing) => {
                xml.push_str("<w:r>");
                xml.push_str(drawing);
                xml.push_str("</w:r>");
            }
            Inline::Hyperlink {
                rel_id,
                anchor,
                runs,
            } => {
                xml.push_str("<w:hyperlink");
                if let Some(id) = rel_id {
                    let _ = write!(xml, " r:id=\"{}\"", escape(id));
                }
                if let Some(anchor) = anchor {
                    let _ = write!(xml, " w:anchor=\"{}\"", escape(anchor));
                }
                xml.push_str(" w:history=\"1\">");
                for run in runs {
                    run.write(xml);
                }
                xml.push_str("</w:hyperlink>");
            }
            Inline::PageNumber(props) => {
                xml.push_str("<w:fldSimple w:instr=\" PAGE \"><w:r>");
                props.write(xml);
                xml.push_str("<w:t>1</w:t></w:r></w:fldSimple>");
            }
        }
    }
}

/// Write run text, splitting out tabs and line breaks.
fn write_text(xml: &mut String, text: &str) {
    let mut segment = String::new();
    let flush = |xml: &mut String, segment: &mut String| {
        if !segment.is_empty() {
            let _ = write!(xml, "<w:t xml:space=\"preserve\">{}</w:t>", escape(segment.as_str()));
            segment.clear();
        }
    };
    for ch in text.chars() {
        match ch {
            '\t' => {
                flush(xml, &mut segment);
                xml.push_str("<w:tab/>");
            }
            '\n' => {
                flush(xml, &mut segment);
                xml.push_str("<w:br/>");
            }
            '\r' => {}
            _ => segment.push(ch),
        }
    }
    flush(xml, &mut segment);
}

/// A paragraph with its properties and content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphXml {
    pub style_id: Option<String>,
    pub keep_next: bool,
    pub border_top: Option<Border>,
    pub border_bottom: Option<Border>,
    /// Right-aligned tab stop positions.
    pub right_tabs: Vec<u32>,
    pub space_before: Option<u32>,
    pub space_after: Option<u32>,
    /// Exact line height in DXA.
    pub line: Option<u32>,
    pub indent_left: Option<u32>,
    pub indent_right: Option<u32>,
    pub alignment: Option<Alignment>,
    pub inlines: Vec<Inline>,
}

impl ParagraphXml {
    /// Empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(mut self, style_id: impl Into<String>) -> Self {
        self.style_id = Some(style_id.into());
        self
    }

    pub fn keep_next(mut self, keep: bool) -> Self {
        self.keep_next = keep;
        self
    }

    pub fn border_top(mut self, border: Border) -> Self {
        self.border_top = Some(border);
        self
    }

    pub fn border_bottom(mut self, border: Border) -> Self {
        self.border_bottom = Some(border);
        self
    }

    pub fn right_tab(mut self, position: u32) -> Self {
        self.right_tabs.push(position);
        self
    }

    pub fn spacing(mut self, before: u32, after: u32) -> Self {
        self.space_before = Some(before);
        self.space_after = Some(after);
        self
    }

    pub fn line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn indent_left(mut self, left: u32) -> Self {
        self.indent_left = Some(left);
        self
    }

    pub fn indent_right(mut self, right: u32) -> Self {
        self.indent_right = Some(right);
        self
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Append a text run.
    pub fn run(mut self, text: impl Into<String>, props: RunProps) -> Self {
        self.inlines.push(Inline::text(text, props));
        self
    }

    /// Append any inline.
    pub fn push(&mut self, inline: Inline) {
        self.inlines.push(inline);
    }

    /// Builder form of [`ParagraphXml::push`].
    pub fn with(mut self, inline: Inline) -> Self {
        self.push(inline);
        self
    }

    /// A paragraph holding only a page break.
    pub fn page_break() -> Self {
        Self::new().with(Inline::PageBreak)
    }

    /// Serialize into `xml`.
    pub fn to_xml(&self, xml: &mut String) {
        xml.push_str("<w:p>");
        self.write_properties(xml);
        for inline in &self.inlines {
            inline.write(xml);
        }
        xml.push_str("</w:p>");
    }

    fn has_properties(&self) -> bool {
        self.style_id.is_some()
            || self.keep_next
            || self.border_top.is_some()
            || self.border_bottom.is_some()
            || !self.right_tabs.is_empty()
            || self.space_before.is_some()
            || self.space_after.is_some()
            || self.line.is_some()
            || self.indent_left.is_some()
            || self.indent_right.is_some()
            || self.alignment.is_some()
    }

    fn write_properties(&self, xml: &mut String) {
        if !self.has_properties() {
            return;
        }
        xml.push_str("<w:pPr>");
        if let Some(style) = &self.style_id {
            let _ = write!(xml, "<w:pStyle w:val=\"{}\"/>", escape(style));
        }
        if self.keep_next {
            xml.push_str("<w:keepNext/>");
        }
        if self.border_top.is_some() || self.border_bottom.is_some() {
            xml.push_str("<w:pBdr>");
            if let Some(top) = &self.border_top {
                top.write(xml, "top");
            }
            if let Some(bottom) = &self.border_bottom {
                bottom.write(xml, "bottom");
            }
            xml.push_str("</w:pBdr>");
        }
        if !self.right_tabs.is_empty() {
            xml.push_str("<w:tabs>");
            for pos in &self.right_tabs {
                let _ = write!(xml, "<w:tab w:val=\"right\" w:leader=\"none\" w:pos=\"{}\"/>", pos);
            }
            xml.push_str("</w:tabs>");
        }
        if self.space_before.is_some() || self.space_after.is_some() || self.line.is_some() {
            xml.push_str("<w:spacing");
            if let Some(before) = self.space_before {
                let _ = write!(xml, " w:before=\"{}\"", before);
            }
            if let Some(after) = self.space_after {
                let _ = write!(xml, " w:after=\"{}\"", after);
            }
            if let Some(line) = self.line {
                let _ = write!(xml, " w:line=\"{}\" w:lineRule=\"exact\"", line);
            }
            xml.push_str("/>");
        }
        if self.indent_left.is_some() || self.indent_right.is_some() {
            xml.push_str("<w:ind");
            if let Some(left) = self.indent_left {
                let _ = write!(xml, " w:left=\"{}\"", left);
            }
            if let Some(right) = self.indent_right {
                let _ = write!(xml, " w:right=\"{}\"", right);
            }
            xml.push_str("/>");
        }
        if let Some(alignment) = self.alignment {
            let _ = write!(xml, "<w:jc w:val=\"{}\"/>", alignment.as_str());
        }
        xml.push_str("</w:pPr>");
    }
}

/// Cell padding in DXA.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellMargins {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

/// Per-edge cell borders. A missing edge is written as `nil`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellBorders {
    pub top: Option<Border>,
    pub left: Option<Border>,
    pub bottom: Option<Border>,
    pub right: Option<Border>,
}

/// A table cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellXml {
    pub width: Option<u32>,
    pub borders: Option<CellBorders>,
    pub shading: Option<String>,
    pub margins: Option<CellMargins>,
    pub paragraphs: Vec<ParagraphXml>,
}

impl CellXml {
    /// Cell holding one paragraph.
    pub fn new(paragraph: ParagraphXml) -> Self {
        Self {
            paragraphs: vec![paragraph],
            ..Self::default()
        }
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn shading(mut self, color: &str) -> Self {
        self.shading = Some(color_hex(color));
        self
    }

    pub fn margins(mut self, margins: CellMargins) -> Self {
        self.margins = Some(margins);
        self
    }

    pub fn borders(mut self, borders: CellBorders) -> Self {
        self.borders = Some(borders);
        self
    }

    fn to_xml(&self, xml: &mut String) {
        xml.push_str("<w:tc><w:tcPr>");
        match self.width {
            Some(width) => {
                let _ = write!(xml, "<w:tcW w:w=\"{}\" w:type=\"dxa\"/>", width);
            }
            None => xml.push_str("<w:tcW w:w=\"0\" w:type=\"auto\"/>"),
        }
        if let Some(borders) = &self.borders {
            xml.push_str("<w:tcBorders>");
            write_edge(xml, "top", borders.top.as_ref());
            write_edge(xml, "left", borders.left.as_ref());
            write_edge(xml, "bottom", borders.bottom.as_ref());
            write_edge(xml, "right", borders.right.as_ref());
            xml.push_str("</w:tcBorders>");
        }
        if let Some(fill) = &self.shading {
            let _ = write!(xml, "<w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"{}\"/>", fill);
        }
        if let Some(m) = &self.margins {
            let _ = write!(
                xml,
                "<w:tcMar><w:top w:w=\"{}\" w:type=\"dxa\"/><w:left w:w=\"{}\" w:type=\"dxa\"/><w:bottom w:w=\"{}\" w:type=\"dxa\"/><w:right w:w=\"{}\" w:type=\"dxa\"/></w:tcMar>",
                m.top, m.left, m.bottom, m.right
            );
        }
        xml.push_str("</w:tcPr>");
        if self.paragraphs.is_empty() {
            ParagraphXml::new().to_xml(xml);
        }
        for paragraph in &self.paragraphs {
            paragraph.to_xml(xml);
        }
        xml.push_str("</w:tc>");
    }
}

/// A table row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowXml {
    /// Repeat the row at the top of each page.
    pub header: bool,
    pub cells: Vec<CellXml>,
}

/// A table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableXml {
    pub centered: bool,
    /// Border applied to every outer and inner edge; `None` draws no borders.
    pub borders: Option<Border>,
    /// Column widths in DXA.
    pub grid: Vec<u32>,
    pub rows: Vec<RowXml>,
}

impl TableXml {
    /// Serialize into `xml`.
    pub fn to_xml(&self, xml: &mut String) {
        let total: u32 = self.grid.iter().sum();
        xml.push_str("<w:tbl><w:tblPr>");
        let _ = write!(xml, "<w:tblW w:w=\"{}\" w:type=\"dxa\"/>", total);
        if self.centered {
            xml.push_str("<w:jc w:val=\"center\"/>");
        }
        xml.push_str("<w:tblBorders>");
        for edge in ["top", "left", "bottom", "right", "insideH", "insideV"] {
            match &self.borders {
                Some(border) => border.write(xml, edge),
                None => {
                    let _ = write!(
                        xml,
                        "<w:{} w:val=\"none\" w:sz=\"0\" w:space=\"0\" w:color=\"auto\"/>",
                        edge
                    );
                }
            }
        }
        xml.push_str("</w:tblBorders>");
        xml.push_str("<w:tblLayout w:type=\"fixed\"/>");
        xml.push_str("<w:tblLook w:val=\"0000\" w:firstRow=\"0\" w:lastRow=\"0\" w:firstColumn=\"0\" w:lastColumn=\"0\" w:noHBand=\"1\" w:noVBand=\"1\"/>");
        xml.push_str("</w:tblPr><w:tblGrid>");
        for width in &self.grid {
            let _ = write!(xml, "<w:gridCol w:w=\"{}\"/>", width);
        }
        xml.push_str("</w:tblGrid>");
        for row in &self.rows {
            xml.push_str("<w:tr>");
            if row.header {
                xml.push_str("<w:trPr><w:tblHeader/></w:trPr>");
            }
            for cell in &row.cells {
                cell.to_xml(xml);
            }
            xml.push_str("</w:tr>");
        }
        xml.push_str("</w:tbl>");
    }
}

/// An inline picture referencing an image relationship.
pub fn inline_drawing(rel_id: &str, id: usize, name: &str, cx: u64, cy: u64, descr: &str) -> String {
    let name = escape(name);
    let descr = escape(descr);
    format!(
        concat!(
            "<w:drawing><wp:inline distT=\"0\" distB=\"0\" distL=\"0\" distR=\"0\">",
            "<wp:extent cx=\"{cx}\" cy=\"{cy}\"/>",
            "<wp:effectExtent l=\"0\" t=\"0\" r=\"0\" b=\"0\"/>",
            "<wp:docPr id=\"{id}\" name=\"{name}\" descr=\"{descr}\"/>",
            "<wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect=\"1\"/></wp:cNvGraphicFramePr>",
            "<a:graphic><a:graphicData uri=\"http://schemas.openxmlformats.org/drawingml/2006/picture\">",
            "<pic:pic><pic:nvPicPr><pic:cNvPr id=\"{id}\" name=\"{name}\"/><pic:cNvPicPr/></pic:nvPicPr>",
            "<pic:blipFill><a:blip r:embed=\"{rel}\"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>",
            "<pic:spPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>",
            "<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></pic:spPr></pic:pic>",
            "</a:graphicData></a:graphic></wp:inline></w:drawing>"
        ),
        cx = cx,
        cy = cy,
        id = id,
        name = name,
        descr = descr,
        rel = escape(rel_id),
    )
}
