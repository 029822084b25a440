//! Maps content elements to resolved style instructions.

use super::fonts::FontRole;
use super::tokens::{DesignSystem, Style};
use crate::error::{Error, Result};
use crate::model::{CalloutType, ContentElement, ElementKind, ListType};
use serde_yaml::Value;

/// Component used for callouts of a kind without its own box style.
pub const FALLBACK_CALLOUT_COMPONENT: &str = "info_box";

/// Produces style instructions for elements and headings.
///
/// Every returned [`Style`] carries a `type` discriminator next to the
/// design-system values for that element.
#[derive(Debug, Clone, Copy)]
pub struct StyleMapper<'d> {
    design: &'d DesignSystem,
}

impl<'d> StyleMapper<'d> {
    /// Create a mapper over a design system.
    pub fn new(design: &'d DesignSystem) -> Self {
        Self { design }
    }

    /// The underlying design system.
    pub fn design_system(&self) -> &'d DesignSystem {
        self.design
    }

    /// Style instructions for one element.
    pub fn map_element(&self, element: &ContentElement) -> Result<Style> {
        let kind = element.kind();
        let mut style = match element {
            ContentElement::Paragraph(_) => self.design.get_body_style(),
            ContentElement::Table(table) => {
                let mut style = self.design.get_component_style("table")?;
                style.set("font", self.design.get_font(FontRole::Body));
                style.set("has_headers", table.has_headers());
                style.set("row_count", table.row_count());
                style.set("col_count", table.col_count());
                style
            }
            ContentElement::Image(image) => Style::new()
                .with("max_width", self.design.usable_width())
                .with("page_width", self.design.get_page_config().width)
                .with("original_width", image.width.map_or(Value::Null, Value::from))
                .with("original_height", image.height.map_or(Value::Null, Value::from))
                .with("caption_style", self.design.get_caption_style()),
            ContentElement::Callout(callout) => {
                let mut style = self.callout_style(callout.callout_type)?;
                style.set("font", self.design.get_font(FontRole::Body));
                style.set("callout_type", callout.callout_type.as_str());
                style
            }
            ContentElement::List(list) => {
                let mut style = self
                    .design
                    .get_component_style(list_component(list.list_type))?;
                style.set("font", self.design.get_font(FontRole::Body));
                style.set("list_type", list.list_type.as_str());
                style.set("item_count", list.items.len());
                style
            }
            ContentElement::Steps(steps) => {
                let mut style = self.design.get_component_style("steps")?;
                style.set("display_font", self.design.get_font(FontRole::Display));
                style.set("body_font", self.design.get_font(FontRole::Body));
                style.set("step_count", steps.steps.len());
                style
            }
            ContentElement::PageBreak => Style::new(),
        };
        style.set("type", kind.as_str());
        Ok(style)
    }

    /// Style instructions for a section heading.
    pub fn map_heading(&self, level: u32) -> Style {
        let mut style = self.design.get_heading_style(level);
        style.set("type", "heading");
        style.set("level", level);
        style
    }

    /// The box component of a callout kind, falling back to the info box.
    pub fn callout_style(&self, callout_type: CalloutType) -> Result<Style> {
        let component = callout_component(callout_type);
        match self.design.get_component_style(component) {
            Ok(style) => Ok(style),
            Err(Error::UnknownComponent(_)) if component != FALLBACK_CALLOUT_COMPONENT => {
                log::debug!(
                    "No component style for '{}'; falling back to '{}'",
                    component,
                    FALLBACK_CALLOUT_COMPONENT
                );
                self.design.get_component_style(FALLBACK_CALLOUT_COMPONENT)
            }
            Err(err) => Err(err),
        }
    }
}

/// Component name of a callout kind.
pub fn callout_component(callout_type: CalloutType) -> &'static str {
    match callout_type {
        CalloutType::Warning => "warning_box",
        CalloutType::Info | CalloutType::Note | CalloutType::Tip => "info_box",
    }
}

/// Component name of a list kind.
pub fn list_component(list_type: ListType) -> &'static str {
    match list_type {
        ListType::Bullet => "bullet_list",
        ListType::Numbered => "numbered_list",
    }
}

/// Whether a mapped style describes the given element kind.
pub fn is_kind(style: &Style, kind: ElementKind) -> bool {
    style.str("type") == Some(kind.as_str())
}
