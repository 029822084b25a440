//! Running header and footer.

use super::xml::{Alignment, Border, Inline, ParagraphXml, RunProps};
use super::DocxRenderer;
use crate::error::Result;
use crate::model::DocumentTree;

const PAGE_NUMBER_PLACEHOLDER: &str = "{page_number}";

/// Text printed before the page number, from a template like `Page {page_number}`.
pub(crate) fn page_label(template: &str) -> String {
    template.replace(PAGE_NUMBER_PLACEHOLDER, "").trim().to_string()
}

impl DocxRenderer<'_> {
    pub(super) fn render_header_footer(&mut self, tree: &DocumentTree) -> Result<()> {
        self.render_header(tree)?;
        self.render_footer()?;
        log::debug!("Header and footer configured");
        Ok(())
    }

    fn render_header(&mut self, tree: &DocumentTree) -> Result<()> {
        let config = self.design.get_header_config();
        let text = match config.str("text").filter(|t| !t.is_empty()) {
            Some(text) => text.to_string(),
            None => tree.metadata.title_or_empty().to_string(),
        };

        let mut paragraph =
            ParagraphXml::new().align(Alignment::from_config(config.str_or("alignment", "right")));
        if !text.is_empty() {
            let color = self.style_color(&config, "color", "light_gray")?;
            paragraph = paragraph.run(
                text,
                RunProps::new()
                    .font(config.str_or("font", &self.body_font).to_string())
                    .size(config.u32_or("size", 16))
                    .color(&color),
            );
        }
        self.writer.set_header(&[paragraph]);
        Ok(())
    }

    fn render_footer(&mut self) -> Result<()> {
        let config = self.design.get_footer_config();
        let color = self.style_color(&config, "color", "light_gray")?;
        let props = RunProps::new()
            .font(config.str_or("font", &self.body_font).to_string())
            .size(config.u32_or("size", 16))
            .color(&color);

        let mut paragraph = ParagraphXml::new().right_tab(self.design.usable_width());
        let border_size = config.u32_or("border_top_size", 1);
        if border_size > 0 {
            let border_color = self.style_color(&config, "border_top_color", "very_light_gray")?;
            paragraph = paragraph.border_top(Border::single(border_size, &border_color).with_space(1));
        }

        let left = match self.options.mention.as_deref() {
            Some(mention) => mention.to_string(),
            None => config.str_or("left_text", "").to_string(),
        };
        if !left.is_empty() {
            paragraph.push(Inline::text(left, props.clone()));
        }
        paragraph.push(Inline::Tab(props.clone()));

        let label = page_label(config.str_or("right_text", "Page {page_number}"));
        if !label.is_empty() {
            paragraph.push(Inline::text(format!("{} ", label), props.clone()));
        }
        paragraph.push(Inline::PageNumber(props));

        self.writer.set_footer(&[paragraph]);
        Ok(())
    }
}
