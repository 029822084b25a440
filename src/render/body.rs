//! Headings and content elements.

use super::xml::{
    inline_drawing, Alignment, Border, CellBorders, CellMargins, CellXml, Inline,
    ParagraphXml, RowXml, RunProps, TableXml, EMU_PER_DXA, EMU_PER_PIXEL,
};
use super::DocxRenderer;
use crate::error::Result;
use crate::model::{
    Callout, ContentElement, Image, ListBlock, ListItem, ListType, Paragraph, StepsBlock, Table,
    TextRun,
};
use crate::style::Style;

/// Share of the heading size used by the "Section NN" label.
const SECTION_LABEL_RATIO: f64 = 0.6;

/// Compute the drawing extent of an image in EMU.
///
/// Declared DXA dimensions win over the native pixel size; a declared width
/// without height keeps the native aspect ratio. The result never exceeds
/// `max_width` DXA. Returns `None` when no size can be determined.
pub fn image_extent(image: &Image, pixels: Option<(u32, u32)>, max_width: u32) -> Option<(u64, u64)> {
    let (width, height) = match image.width.filter(|w| *w > 0) {
        Some(width) => {
            let cx = u64::from(width) * EMU_PER_DXA;
            let cy = match image.height.filter(|h| *h > 0) {
                Some(height) => u64::from(height) * EMU_PER_DXA,
                None => match pixels {
                    Some((pw, ph)) if pw > 0 => cx * u64::from(ph) / u64::from(pw),
                    _ => cx,
                },
            };
            (cx, cy)
        }
        None => {
            let (pw, ph) = pixels?;
            (u64::from(pw) * EMU_PER_PIXEL, u64::from(ph) * EMU_PER_PIXEL)
        }
    };
    if width == 0 {
        return None;
    }

    let max = u64::from(max_width) * EMU_PER_DXA;
    if width > max {
        Some((max, height * max / width))
    } else {
        Some((width, height))
    }
}

fn is_external_link(target: &str) -> bool {
    target.contains("://") || target.starts_with("mailto:")
}

impl DocxRenderer<'_> {
    pub(super) fn render_element(&mut self, element: &ContentElement) -> Result<()> {
        let style = self.mapper.map_element(element)?;
        match element {
            ContentElement::Paragraph(paragraph) => self.render_paragraph(paragraph, &style),
            ContentElement::Table(table) => self.render_table(table, &style),
            ContentElement::Image(image) => self.render_image(image, &style),
            ContentElement::Callout(callout) => self.render_callout(callout, &style),
            ContentElement::List(list) => self.render_list(list, &style),
            ContentElement::Steps(steps) => self.render_steps(steps, &style),
            ContentElement::PageBreak => {
                self.writer.push_paragraph(&ParagraphXml::page_break());
                self.stats.add_page_break();
                Ok(())
            }
        }
    }

    pub(super) fn render_heading(&mut self, text: &str, level: u32, number: Option<u32>) -> Result<()> {
        let style = self.mapper.map_heading(level);
        let size = style.u32_or("size", 26);
        let color = self.style_color(&style, "color", "black")?;
        let before = style.u32_or("spacing_before", 240);
        let after = style.u32_or("spacing_after", 120);
        let font = style.str_or("font", &self.display_font).to_string();
        let style_id = format!("Heading{}", level.clamp(1, 3));

        if level != 1 {
            self.writer.push_paragraph(
                &ParagraphXml::new()
                    .style(style_id)
                    .keep_next(style.bool_or("keep_with_next", true))
                    .spacing(before, after)
                    .run(
                        text,
                        RunProps::new()
                            .font(font)
                            .size(size)
                            .bold(style.bool_or("bold", true))
                            .color(&color),
                    ),
            );
            self.stats.add_heading();
            log::debug!("Heading {}: '{}'", level, text);
            return Ok(());
        }

        let numbered = self.options.number_sections;
        if numbered {
            let accent = self.design.resolve_color("accent_blue")?;
            let label_size = (f64::from(size) * SECTION_LABEL_RATIO).round() as u32;
            self.writer.push_paragraph(
                &ParagraphXml::new().keep_next(true).spacing(before, 0).run(
                    format!("Section {:02}", number.unwrap_or(0)),
                    RunProps::new()
                        .font(font.clone())
                        .size(label_size)
                        .bold(true)
                        .color(&accent),
                ),
            );
        }

        self.writer.push_paragraph(
            &ParagraphXml::new()
                .style(style_id)
                .keep_next(true)
                .spacing(if numbered { 80 } else { before }, 0)
                .run(
                    text,
                    RunProps::new().font(font).size(size).bold(true).color(&color),
                ),
        );

        let bar = self.design.get_component_style("accent_bar").unwrap_or_default();
        let bar_color = self.style_color(&bar, "border_bottom_color", "accent_blue")?;
        let usable = self.design.usable_width();
        self.writer.push_paragraph(
            &ParagraphXml::new()
                .spacing(80, after)
                .indent_right(usable.saturating_sub(bar.u32_or("width", 2400)))
                .border_bottom(
                    Border::single(bar.u32_or("border_bottom_size", 6), &bar_color).with_space(1),
                ),
        );

        self.stats.add_heading();
        log::debug!("Heading 1: '{}' (number {:?})", text, number);
        Ok(())
    }

    fn link_inline(&mut self, target: &str, run: Inline) -> Inline {
        if is_external_link(target) {
            Inline::Hyperlink {
                rel_id: Some(self.writer.add_hyperlink(target)),
                anchor: None,
                runs: vec![run],
            }
        } else {
            Inline::Hyperlink {
                rel_id: None,
                anchor: Some(target.trim_start_matches('#').to_string()),
                runs: vec![run],
            }
        }
    }

    fn render_paragraph(&mut self, paragraph: &Paragraph, style: &Style) -> Result<()> {
        let body_color = self.style_color(style, "color", "dark_gray")?;
        let size = style.u32_or("size", 21);
        let font = style.str_or("font", &self.body_font).to_string();
        let base = RunProps::new().font(font).size(size);

        let mut out = ParagraphXml {
            space_after: Some(style.u32_or("spacing_after", 160)),
            line: style.u32("line_spacing"),
            ..ParagraphXml::default()
        };

        if paragraph.runs.is_empty() {
            out.push(Inline::text("", base.clone().color(&body_color)));
        }
        for run in &paragraph.runs {
            let props = base
                .clone()
                .bold(run.bold)
                .italic(run.italic)
                .underline(run.underline)
                .strike(run.strikethrough);
            let inline = match run.hyperlink.as_deref() {
                Some(target) => {
                    let accent = self.design.resolve_color("accent_blue")?;
                    let text = Inline::text(run.text.clone(), props.underline(true).color(&accent));
                    self.link_inline(target, text)
                }
                None => Inline::text(
                    run.text.clone(),
                    props.color(&Self::run_color(run, &body_color)),
                ),
            };
            out.push(inline);
        }

        self.writer.push_paragraph(&out);
        self.stats.add_paragraph();
        self.stats.count_text(&paragraph.text());
        Ok(())
    }

    fn render_table(&mut self, table: &Table, style: &Style) -> Result<()> {
        let cols = table.col_count();
        if cols == 0 {
            log::warn!("Skipping empty table (no columns)");
            self.stats.add_skipped();
            return Ok(());
        }

        let header_bg = self.style_color(style, "header_bg", "accent_blue")?;
        let header_text = self.style_color(style, "header_text_color", "white")?;
        let body_color = self.style_color(style, "body_color", "dark_gray")?;
        let zebra = self.style_color(style, "zebra_color", "bg_light")?;
        let border_color = self.style_color(style, "row_border_color", "very_light_gray")?;
        let zebra_stripe = style.bool_or("zebra_stripe", true);
        let font = style.str_or("font", &self.body_font).to_string();
        let padding = CellMargins {
            top: style.u32_or("cell_padding_top", 80),
            bottom: style.u32_or("cell_padding_bottom", 80),
            left: style.u32_or("cell_padding_left", 120),
            right: style.u32_or("cell_padding_right", 120),
        };

        let col_width = self.design.usable_width() / cols as u32;
        let cell = |paragraph: ParagraphXml| CellXml::new(paragraph).width(col_width).margins(padding);
        let mut rows = Vec::with_capacity(table.row_count() + 1);

        if table.has_headers() {
            let props = RunProps::new()
                .font(font.clone())
                .size(style.u32_or("header_font_size", 21))
                .bold(style.bool_or("header_bold", true))
                .color(&header_text);
            let cells = table
                .headers
                .iter()
                .enumerate()
                .map(|(col, text)| {
                    let mut paragraph = ParagraphXml::new().spacing(0, 0);
                    match table.header_cell_runs(col).filter(|runs| !runs.is_empty()) {
                        Some(runs) => {
                            for run in runs {
                                paragraph.push(Inline::text(run.text.clone(), props.clone()));
                            }
                        }
                        None => paragraph.push(Inline::text(text.clone(), props.clone())),
                    }
                    cell(paragraph).shading(&header_bg)
                })
                .collect();
            rows.push(RowXml { header: true, cells });
        }

        let body_props = RunProps::new()
            .font(font)
            .size(style.u32_or("body_font_size", 21))
            .color(&body_color);
        for (row_idx, row) in table.rows.iter().enumerate() {
            let striped = zebra_stripe && row_idx % 2 == 0;
            let cells = (0..cols)
                .map(|col| {
                    let mut paragraph = ParagraphXml::new().spacing(0, 0);
                    match table.data_cell_runs(row_idx, col).filter(|runs| !runs.is_empty()) {
                        Some(runs) => {
                            for run in runs {
                                paragraph.push(Inline::text(
                                    run.text.clone(),
                                    body_props.clone().bold(run.bold).italic(run.italic),
                                ));
                            }
                        }
                        None => {
                            let text = row.get(col).cloned().unwrap_or_default();
                            paragraph.push(Inline::text(text, body_props.clone()));
                        }
                    }
                    let styled = cell(paragraph);
                    if striped {
                        styled.shading(&zebra)
                    } else {
                        styled
                    }
                })
                .collect();
            rows.push(RowXml { header: false, cells });
        }

        self.writer.push_table(&TableXml {
            centered: true,
            borders: Some(Border::single(style.u32_or("row_border_size", 1), &border_color)),
            grid: vec![col_width; cols],
            rows,
        });
        self.stats.add_table();
        self.stats.count_text(&table.plain_text());
        log::debug!(
            "Rendered table: {} col(s), {} data row(s), headers={}",
            cols,
            table.row_count(),
            table.has_headers()
        );
        Ok(())
    }

    fn render_image(&mut self, image: &Image, style: &Style) -> Result<()> {
        if !image.is_renderable() {
            log::warn!("Skipping image with no data: {}", image.filename);
            self.stats.add_skipped();
            return Ok(());
        }

        let embedded = match self.writer.add_image(&image.data) {
            Ok(embedded) => embedded,
            Err(err) => {
                log::warn!("Skipping image {}: {}", image.filename, err);
                self.stats.add_skipped();
                return Ok(());
            }
        };
        let max_width = style.u32_or("max_width", self.design.usable_width());
        let Some((cx, cy)) = image_extent(image, embedded.pixels, max_width) else {
            log::warn!("Skipping image {}: size unknown", image.filename);
            self.stats.add_skipped();
            return Ok(());
        };

        let drawing = inline_drawing(
            &embedded.rel_id,
            embedded.id,
            &embedded.name,
            cx,
            cy,
            &image.alt_text,
        );
        self.writer.push_paragraph(
            &ParagraphXml::new()
                .align(Alignment::Center)
                .spacing(120, 120)
                .with(Inline::Drawing(drawing)),
        );

        if !image.alt_text.is_empty() {
            let caption = style.nested("caption_style");
            let color = self.style_color(&caption, "color", "medium_gray")?;
            self.writer.push_paragraph(
                &ParagraphXml::new()
                    .align(Alignment::Center)
                    .spacing(40, caption.u32_or("spacing_after", 80))
                    .run(
                        image.alt_text.clone(),
                        RunProps::new()
                            .font(caption.str_or("font", &self.body_font).to_string())
                            .size(caption.u32_or("size", 18))
                            .italic(true)
                            .color(&color),
                    ),
            );
        }

        self.stats.add_image();
        log::debug!("Rendered image {} ({}x{} EMU)", embedded.name, cx, cy);
        Ok(())
    }

    fn render_callout(&mut self, callout: &Callout, style: &Style) -> Result<()> {
        let border_color = self.style_color(style, "border_left_color", "accent_blue")?;
        let background = self.style_color(style, "background", "bg_light")?;
        let title_color = self.style_color(style, "title_color", "accent_blue")?;
        let body_color = self.style_color(style, "body_color", "dark_gray")?;
        let font = style.str_or("font", &self.body_font).to_string();

        let mut paragraphs = vec![ParagraphXml::new().spacing(0, 80).run(
            callout.display_title(),
            RunProps::new()
                .font(font.clone())
                .size(style.u32_or("title_size", 21))
                .bold(style.bool_or("title_bold", true))
                .color(&title_color),
        )];

        if !callout.body.is_empty() {
            let props = RunProps::new().font(font).size(style.u32_or("body_size", 21));
            let mut body = ParagraphXml::new().spacing(40, 0);
            let fallback;
            let runs: &[TextRun] = if callout.body_runs.is_empty() {
                fallback = [TextRun::new(callout.body.clone())];
                &fallback
            } else {
                &callout.body_runs
            };
            for run in runs {
                body.push(Inline::text(
                    run.text.clone(),
                    props
                        .clone()
                        .bold(run.bold)
                        .italic(run.italic)
                        .color(&Self::run_color(run, &body_color)),
                ));
            }
            paragraphs.push(body);
        }

        let cell = CellXml {
            paragraphs,
            ..CellXml::default()
        }
        .width(self.design.usable_width())
        .borders(CellBorders {
            left: Some(Border::single(style.u32_or("border_left_size", 12), &border_color)),
            ..CellBorders::default()
        })
        .shading(&background)
        .margins(CellMargins {
            top: style.u32_or("padding_top", 120),
            bottom: style.u32_or("padding_bottom", 120),
            left: style.u32_or("padding_left", 240),
            right: style.u32_or("padding_right", 240),
        });

        self.writer.push_table(&TableXml {
            centered: true,
            borders: None,
            grid: vec![self.design.usable_width()],
            rows: vec![RowXml {
                header: false,
                cells: vec![cell],
            }],
        });
        self.writer.push_paragraph(
            &ParagraphXml::new()
                .spacing(0, style.u32_or("spacing_after", 200))
                .run("", RunProps::new().size(2)),
        );

        self.stats.add_callout();
        self.stats.count_text(&callout.body);
        log::debug!("Rendered {} callout", callout.callout_type.as_str());
        Ok(())
    }

    fn render_list(&mut self, list: &ListBlock, style: &Style) -> Result<()> {
        let marker_key = match list.list_type {
            ListType::Bullet => "bullet_color",
            ListType::Numbered => "number_color",
        };
        let marker_color = self.style_color(style, marker_key, "accent_blue")?;
        let text_color = self.style_color(style, "text_color", "dark_gray")?;
        self.render_list_items(&list.items, list.list_type, style, &marker_color, &text_color)
    }

    fn render_list_items(
        &mut self,
        items: &[ListItem],
        list_type: ListType,
        style: &Style,
        marker_color: &str,
        text_color: &str,
    ) -> Result<()> {
        let indent_step = style.u32_or("indent_per_level", 360);
        let size = style.u32_or("text_size", 21);
        let base = RunProps::new()
            .font(style.str_or("font", &self.body_font).to_string())
            .size(size);

        for (index, item) in items.iter().enumerate() {
            let marker = match list_type {
                ListType::Numbered => format!("{}. ", index + 1),
                ListType::Bullet => "\u{2022}  ".to_string(),
            };
            let mut paragraph = ParagraphXml::new()
                .indent_left(indent_step * (item.level + 1))
                .spacing(0, style.u32_or("spacing_after", 80))
                .run(marker, base.clone().bold(true).color(marker_color));
            for run in &item.runs {
                paragraph.push(Inline::text(
                    run.text.clone(),
                    base.clone()
                        .bold(run.bold)
                        .italic(run.italic)
                        .color(&Self::run_color(run, text_color)),
                ));
            }
            self.writer.push_paragraph(&paragraph);
            self.stats.add_list_item();
            self.stats.count_text(&item.text());

            if !item.children.is_empty() {
                self.render_list_items(&item.children, list_type, style, marker_color, text_color)?;
            }
        }
        Ok(())
    }

    fn render_steps(&mut self, steps: &StepsBlock, style: &Style) -> Result<()> {
        let number_color = self.style_color(style, "number_color", "accent_blue")?;
        let title_color = self.style_color(style, "title_color", "black")?;
        let desc_color = self.style_color(style, "desc_color", "dark_gray")?;
        let display = style.str_or("display_font", &self.display_font).to_string();
        let body = style.str_or("body_font", &self.body_font).to_string();
        let between = style.u32_or("spacing_between", 200);
        let title_size = style.u32_or("title_size", 24);

        for step in &steps.steps {
            self.writer.push_paragraph(
                &ParagraphXml::new()
                    .keep_next(true)
                    .spacing(between, 80)
                    .run(
                        format!("{:02}", step.number),
                        RunProps::new()
                            .font(display.clone())
                            .size(style.u32_or("number_size", 56))
                            .bold(style.bool_or("number_bold", true))
                            .color(&number_color),
                    )
                    .run("   ", RunProps::new().size(title_size))
                    .run(
                        step.title.clone(),
                        RunProps::new()
                            .font(display.clone())
                            .size(title_size)
                            .bold(true)
                            .color(&title_color),
                    ),
            );

            if !step.description.is_empty() {
                let props = RunProps::new()
                    .font(body.clone())
                    .size(style.u32_or("desc_size", 21));
                let mut description = ParagraphXml::new().spacing(40, between).indent_left(360);
                if step.description_runs.is_empty() {
                    description.push(Inline::text(
                        step.description.clone(),
                        props.clone().color(&desc_color),
                    ));
                }
                for run in &step.description_runs {
                    description.push(Inline::text(
                        run.text.clone(),
                        props
                            .clone()
                            .bold(run.bold)
                            .italic(run.italic)
                            .color(&Self::run_color(run, &desc_color)),
                    ));
                }
                self.writer.push_paragraph(&description);
            }

            self.stats.add_step();
            self.stats.count_text(&step.title);
            self.stats.count_text(&step.description);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CalloutType, DocumentTree, Section, Step};
    use crate::render::tests::{design, document_xml};
    use crate::render::writer::sample_png;
    use crate::render::{render_bytes, RenderOptions};

    fn render_section(children: Vec<ContentElement>) -> String {
        let mut tree = DocumentTree::new();
        let mut section = Section::new("Chapitre", 1).with_number(3);
        section.children = children;
        tree.sections.push(section);
        document_xml(&render_bytes(&tree, &RenderOptions::body_only(), &design()).unwrap())
    }

    #[test]
    fn test_image_extent_declared() {
        let image = Image::new(vec![1]).with_dimensions(2880, 1440);
        assert_eq!(image_extent(&image, None, 9360), Some((2880 * 635, 1440 * 635)));
    }

    #[test]
    fn test_image_extent_scales_down() {
        let image = Image::new(vec![1]).with_dimensions(18720, 9360);
        assert_eq!(image_extent(&image, None, 9360), Some((9360 * 635, 4680 * 635)));
    }

    #[test]
    fn test_image_extent_native_and_aspect() {
        let bare = Image::new(vec![1]);
        assert_eq!(image_extent(&bare, Some((200, 100)), 9360), Some((200 * 9525, 100 * 9525)));
        assert_eq!(image_extent(&bare, None, 9360), None);

        let mut width_only = Image::new(vec![1]);
        width_only.width = Some(2000);
        assert_eq!(image_extent(&width_only, Some((4, 2)), 9360), Some((2000 * 635, 1000 * 635)));
    }

    #[test]
    fn test_heading_levels() {
        let mut tree = DocumentTree::new();
        tree.sections.push(Section::new("Vue d'ensemble", 1).with_number(2));
        tree.sections.push(Section::new("Détails", 2));
        let xml = document_xml(&render_bytes(&tree, &RenderOptions::body_only(), &design()).unwrap());

        assert!(xml.contains(">Section 02</w:t>"));
        // 0.6 x 40 half-points
        assert!(xml.contains("<w:sz w:val=\"24\"/>"));
        assert!(xml.contains("<w:pStyle w:val=\"Heading1\"/>"));
        assert!(xml.contains("<w:pStyle w:val=\"Heading2\"/>"));
        assert!(xml.contains("<w:ind w:right=\"6960\"/>"));
        assert!(xml.contains("w:sz=\"48\" w:space=\"1\" w:color=\"0071E3\""));
    }

    #[test]
    fn test_unnumbered_heading() {
        let mut tree = DocumentTree::new();
        tree.sections.push(Section::new("Annexe", 1));
        let options = RenderOptions::body_only().with_section_numbers(false);
        let xml = document_xml(&render_bytes(&tree, &options, &design()).unwrap());
        assert!(!xml.contains("Section"));
        assert!(xml.contains("<w:spacing w:before=\"480\" w:after=\"0\"/>"));
    }

    #[test]
    fn test_paragraph_runs() {
        let mut colored = TextRun::new("rouge");
        colored.color = Some("FF0000".to_string());
        let mut struck = TextRun::new("barré");
        struck.strikethrough = true;
        let link = TextRun::new("lien").with_hyperlink("https://example.com");
        let paragraph = Paragraph::from_runs(vec![TextRun::bold("gras"), colored, struck, link]);
        let xml = render_section(vec![paragraph.into(), Paragraph::new().into()]);

        assert!(xml.contains("<w:b/><w:bCs/><w:color w:val=\"424245\"/>"));
        assert!(xml.contains("<w:color w:val=\"FF0000\"/>"));
        assert!(xml.contains("<w:strike/>"));
        assert!(xml.contains("<w:hyperlink r:id=\"rId3\""));
        assert!(xml.contains("<w:color w:val=\"0071E3\"/><w:sz w:val=\"21\"/><w:szCs w:val=\"21\"/><w:u w:val=\"single\"/>"));
        assert!(xml.contains("w:line=\"300\" w:lineRule=\"exact\""));
        // The empty paragraph still carries one run.
        assert!(xml.contains("</w:rPr></w:r></w:p>"));
    }

    #[test]
    fn test_table_rendering() {
        let table = Table::from_strings(vec!["Nom", "Valeur"], vec![vec!["a", "1"], vec!["b", "2"], vec!["c"]]);
        let xml = render_section(vec![table.into()]);

        assert!(xml.contains("<w:tblHeader/>"));
        assert_eq!(xml.matches("w:fill=\"0071E3\"").count(), 2);
        // Rows 0 and 2 are striped.
        assert_eq!(xml.matches("w:fill=\"F5F5F7\"").count(), 4);
        assert!(xml.contains("<w:gridCol w:w=\"4680\"/>"));
        assert!(xml.contains("<w:insideH w:val=\"single\" w:sz=\"8\" w:space=\"0\" w:color=\"D2D2D7\"/>"));
        assert!(xml.contains("<w:tcMar><w:top w:w=\"80\""));
    }

    #[test]
    fn test_empty_table_skipped() {
        let mut tree = DocumentTree::new();
        tree.preamble.push(Table::new().into());
        let (_, stats) = crate::render::DocxRenderer::new(&design(), RenderOptions::body_only())
            .render(&tree)
            .unwrap();
        assert_eq!(stats.table_count, 0);
        assert_eq!(stats.skipped_count, 1);
    }

    #[test]
    fn test_image_rendering() {
        let image = Image::new(sample_png(4, 2)).with_alt_text("Schéma");
        let empty = Image::new(Vec::new());
        let xml = render_section(vec![image.into(), empty.into()]);

        assert!(xml.contains("cx=\"38100\" cy=\"19050\""));
        assert!(xml.contains("<w:jc w:val=\"center\"/>"));
        assert!(xml.contains(">Schéma</w:t>"));
        assert!(xml.contains("<w:i/>"));
        assert_eq!(xml.matches("<w:drawing>").count(), 1);
    }

    #[test]
    fn test_callout_rendering() {
        let warning = Callout::new(CalloutType::Warning, "Ne pas couper l'alimentation.");
        let xml = render_section(vec![warning.into()]);

        assert!(xml.contains(">Attention</w:t>"));
        assert!(xml.contains("w:fill=\"FFF4E5\""));
        assert!(xml.contains("<w:left w:val=\"single\" w:sz=\"96\" w:space=\"0\" w:color=\"FF9F0A\"/>"));
        assert!(xml.contains("<w:top w:val=\"nil\"/>"));
        assert!(xml.contains("<w:top w:val=\"none\""));
        assert!(xml.contains("<w:sz w:val=\"2\"/>"));
    }

    #[test]
    fn test_list_rendering() {
        let mut first = ListItem::new(vec![TextRun::new("Un")], 0);
        first.children.push(ListItem::new(vec![TextRun::new("Un.a")], 1));
        first.children.push(ListItem::new(vec![TextRun::new("Un.b")], 1));
        let list = ListBlock::new(ListType::Numbered, vec![first, ListItem::new(vec![TextRun::new("Deux")], 0)]);
        let xml = render_section(vec![list.into()]);

        assert_eq!(xml.matches(">1. </w:t>").count(), 2);
        assert_eq!(xml.matches(">2. </w:t>").count(), 2);
        assert!(xml.contains("<w:ind w:left=\"360\"/>"));
        assert!(xml.contains("<w:ind w:left=\"720\"/>"));

        let bullets = ListBlock::new(ListType::Bullet, vec![ListItem::new(vec![TextRun::new("x")], 0)]);
        assert!(render_section(vec![bullets.into()]).contains(">\u{2022}  </w:t>"));
    }

    #[test]
    fn test_steps_rendering() {
        let steps = StepsBlock {
            steps: vec![
                Step {
                    number: 1,
                    title: "Configurer".into(),
                    description: "Éditer le fichier.".into(),
                    description_runs: vec![TextRun::new("Éditer le fichier.")],
                },
                Step {
                    number: 2,
                    title: "Déployer".into(),
                    description: String::new(),
                    description_runs: vec![],
                },
            ],
        };
        let xml = render_section(vec![steps.into()]);

        assert!(xml.contains(">01</w:t>"));
        assert!(xml.contains(">02</w:t>"));
        assert!(xml.contains("<w:sz w:val=\"56\"/>"));
        assert!(xml.contains(">   </w:t>"));
        assert_eq!(xml.matches("<w:ind w:left=\"360\"/>").count(), 1);
    }

    #[test]
    fn test_page_break() {
        let xml = render_section(vec![ContentElement::PageBreak]);
        assert!(xml.contains("<w:br w:type=\"page\"/>"));
    }
}
