//! Design tokens: palette, typography, page geometry and component styles.
//!
//! A [`DesignSystem`] wraps the YAML configuration tree. Every style lookup
//! returns an owned [`Style`] whose color fields are already resolved to hex
//! literals, so callers never see palette names.

use super::fonts::{FontLocator, FontRole, SystemFontLocator};
use super::merge::deep_merge;
use crate::error::{Error, Result};
use regex::Regex;
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

const DEFAULT_CONFIG: &str = include_str!("../../config/design-system.yaml");

static HEX_COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#?(?:[0-9a-fA-F]{3}){1,2}$").expect("valid hex color regex")
});

/// Key suffixes whose values are treated as color references.
pub const COLOR_SUFFIXES: [&str; 21] = [
    "color",
    "bg",
    "background",
    "border_color",
    "border_left_color",
    "border_top_color",
    "border_bottom_color",
    "border_right_color",
    "text_color",
    "header_text_color",
    "header_bg",
    "zebra_color",
    "title_color",
    "body_color",
    "number_color",
    "bullet_color",
    "accent_color",
    "title_accent_color",
    "accent_bar_color",
    "metadata_color",
    "subtitle_color",
];

/// Font used when the configuration names none at all.
pub const LAST_RESORT_FONT: &str = "Arial";

/// Whether `value` is a 3- or 6-digit hex color, with or without `#`.
pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR_RE.is_match(value)
}

fn is_color_key(key: &str) -> bool {
    COLOR_SUFFIXES.iter().any(|suffix| key.ends_with(suffix))
}

/// A resolved style: an owned key/value mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Style(Mapping);

impl Style {
    /// Create an empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing mapping.
    pub fn from_mapping(mapping: Mapping) -> Self {
        Self(mapping)
    }

    /// The underlying mapping.
    pub fn as_mapping(&self) -> &Mapping {
        &self.0
    }

    /// Raw value of a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether the key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Set a key, replacing any previous value.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(Value::from(key), value.into());
    }

    /// Set a key only if it is absent.
    pub fn set_default(&mut self, key: &str, value: impl Into<Value>) {
        if !self.contains(key) {
            self.set(key, value);
        }
    }

    /// Builder form of [`Style::set`].
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Copy every entry of `other` into this style; `other` wins.
    pub fn extend(&mut self, other: Style) {
        for (key, value) in other.0 {
            self.0.insert(key, value);
        }
    }

    /// String value of a key.
    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// String value of a key, or `default`.
    pub fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.str(key).unwrap_or(default)
    }

    /// Non-negative integer value of a key. Floats are rounded.
    pub fn u32(&self, key: &str) -> Option<u32> {
        let value = self.get(key)?;
        value
            .as_u64()
            .map(|n| n.min(u64::from(u32::MAX)) as u32)
            .or_else(|| {
                value
                    .as_f64()
                    .filter(|f| *f >= 0.0)
                    .map(|f| f.round().min(f64::from(u32::MAX)) as u32)
            })
    }

    /// Integer value of a key, or `default`.
    pub fn u32_or(&self, key: &str, default: u32) -> u32 {
        self.u32(key).unwrap_or(default)
    }

    /// Float value of a key, or `default`.
    pub fn f64_or(&self, key: &str, default: f64) -> f64 {
        self.get(key).and_then(Value::as_f64).unwrap_or(default)
    }

    /// Boolean value of a key, or `default`.
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    /// Nested style under `key`; empty when absent or not a mapping.
    pub fn nested(&self, key: &str) -> Style {
        self.get(key)
            .and_then(Value::as_mapping)
            .cloned()
            .map(Style)
            .unwrap_or_default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the style has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Style> for Value {
    fn from(style: Style) -> Self {
        Value::Mapping(style.0)
    }
}

/// Page margins in DXA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Margins {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 1440,
            bottom: 1440,
            left: 1440,
            right: 1440,
        }
    }
}

/// Page size and margins in DXA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageConfig {
    pub width: u32,
    pub height: u32,
    pub margins: Margins,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            width: 12240,
            height: 15840,
            margins: Margins::default(),
        }
    }
}

impl PageConfig {
    /// Width between the left and right margins.
    pub fn usable_width(&self) -> u32 {
        self.width
            .saturating_sub(self.margins.left)
            .saturating_sub(self.margins.right)
    }
}

/// A loaded design system.
///
/// The resolved font per role is cached on the instance, so separate
/// instances never share state.
#[derive(Debug, Clone)]
pub struct DesignSystem {
    raw: Mapping,
    source: Option<PathBuf>,
    locator: Arc<dyn FontLocator>,
    font_cache: RefCell<HashMap<FontRole, String>>,
}

impl Default for DesignSystem {
    fn default() -> Self {
        Self::default_system()
    }
}

impl DesignSystem {
    fn from_mapping(raw: Mapping) -> Self {
        Self {
            raw,
            source: None,
            locator: Arc::new(SystemFontLocator::new()),
            font_cache: RefCell::new(HashMap::new()),
        }
    }

    /// The design system bundled with the crate.
    pub fn default_system() -> Self {
        Self::from_yaml_str(DEFAULT_CONFIG).unwrap_or_else(|err| {
            log::error!("Bundled design system is invalid: {}", err);
            Self::from_mapping(Mapping::new())
        })
    }

    /// Parse a design system from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(text)?;
        match value {
            Value::Mapping(raw) => {
                let system = Self::from_mapping(raw);
                log::debug!(
                    "Loaded {} colors, {} components",
                    system.section_len("colors"),
                    system.section_len("components")
                );
                Ok(system)
            }
            _ => Err(Error::Config(
                "expected a mapping at the top level of the design system".to_string(),
            )),
        }
    }

    /// Load a design system from a YAML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        let mut system = Self::from_yaml_str(&text)?;
        system.source = Some(path.to_path_buf());
        log::info!("Design system loaded from {}", path.display());
        Ok(system)
    }

    /// Deep-merge a theme file on top of this design system.
    pub fn with_theme(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        let system = self.with_theme_str(&text)?;
        log::info!("Applied theme overlay from {}", path.display());
        Ok(system)
    }

    /// Deep-merge theme YAML text on top of this design system.
    ///
    /// A document that is not a mapping is ignored with a warning.
    pub fn with_theme_str(mut self, text: &str) -> Result<Self> {
        let overlay: Value = serde_yaml::from_str(text)?;
        if !overlay.is_mapping() {
            log::warn!("Theme does not contain a YAML mapping; skipping");
            return Ok(self);
        }
        if let Value::Mapping(merged) = deep_merge(&Value::Mapping(self.raw), &overlay) {
            self.raw = merged;
        } else {
            self.raw = Mapping::new();
        }
        self.font_cache.borrow_mut().clear();
        Ok(self)
    }

    /// Use another font locator. Clears the font cache.
    pub fn with_locator(mut self, locator: impl FontLocator + 'static) -> Self {
        self.locator = Arc::new(locator);
        self.font_cache.borrow_mut().clear();
        self
    }

    /// File the design system was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn section(&self, name: &str) -> Option<&Mapping> {
        self.raw.get(name).and_then(Value::as_mapping)
    }

    fn section_len(&self, name: &str) -> usize {
        self.section(name).map_or(0, Mapping::len)
    }

    fn typography_str(&self, key: &str) -> Option<&str> {
        self.section("typography")
            .and_then(|t| t.get(key))
            .and_then(Value::as_str)
    }

    fn typography_entry(&self, key: &str) -> Option<&Mapping> {
        self.section("typography")
            .and_then(|t| t.get(key))
            .and_then(Value::as_mapping)
    }

    /// Resolve a color name or literal to a hex code.
    ///
    /// The empty name resolves to black. Hex literals are returned as given.
    /// Palette names follow their alias chain; a cycle or an unknown name
    /// fails with [`Error::ColorNotFound`].
    pub fn resolve_color(&self, name: &str) -> Result<String> {
        if name.is_empty() {
            return Ok("#000000".to_string());
        }
        let palette = self.section("colors");
        let mut current = name;
        let mut seen = HashSet::new();
        loop {
            if is_hex_color(current) {
                return Ok(current.to_string());
            }
            if !seen.insert(current) {
                log::debug!("Color alias cycle through '{}'", current);
                return Err(Error::ColorNotFound(name.to_string()));
            }
            match palette.and_then(|p| p.get(current)).and_then(Value::as_str) {
                Some(next) => current = next,
                None => return Err(Error::ColorNotFound(name.to_string())),
            }
        }
    }

    fn is_palette_name(&self, value: &str) -> bool {
        self.section("colors")
            .is_some_and(|palette| palette.contains_key(value))
    }

    /// Copy of `mapping` with color fields resolved, recursively.
    fn resolve_colors(&self, mapping: &Mapping) -> Mapping {
        mapping
            .iter()
            .map(|(key, value)| {
                let resolved = match value {
                    Value::String(text) if !is_hex_color(text) => {
                        let key_name = key.as_str().unwrap_or_default();
                        if is_color_key(key_name) || self.is_palette_name(text) {
                            match self.resolve_color(text) {
                                Ok(hex) => Value::String(hex),
                                Err(_) => {
                                    log::warn!(
                                        "Could not resolve color '{}' for key '{}'",
                                        text,
                                        key_name
                                    );
                                    value.clone()
                                }
                            }
                        } else {
                            value.clone()
                        }
                    }
                    Value::Mapping(nested) => Value::Mapping(self.resolve_colors(nested)),
                    _ => value.clone(),
                };
                (key.clone(), resolved)
            })
            .collect()
    }

    fn resolved(&self, mapping: Option<&Mapping>) -> Style {
        mapping
            .map(|m| Style(self.resolve_colors(m)))
            .unwrap_or_default()
    }

    /// Primary font of a role followed by the fallbacks, empty names removed.
    pub fn get_font_family(&self, role: FontRole) -> Vec<String> {
        let primary = self.typography_str(role.config_key()).unwrap_or_default();
        let fallbacks = self
            .section("typography")
            .and_then(|t| t.get("fallback_fonts"))
            .and_then(Value::as_sequence)
            .map(|seq| seq.iter().filter_map(Value::as_str).collect::<Vec<_>>())
            .unwrap_or_default();

        std::iter::once(primary)
            .chain(fallbacks)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// First available font of the role's family.
    ///
    /// When nothing is available the first family member is returned anyway,
    /// so the document still declares the intended font.
    pub fn get_font(&self, role: FontRole) -> String {
        let cached = self.font_cache.borrow().get(&role).cloned();
        if let Some(font) = cached {
            return font;
        }

        let family = self.get_font_family(role);
        let font = match family.iter().find(|name| self.locator.is_available(name)) {
            Some(found) => {
                log::debug!("Font for role {:?} resolved to '{}'", role, found);
                found.clone()
            }
            None => {
                let fallback = family
                    .first()
                    .cloned()
                    .unwrap_or_else(|| LAST_RESORT_FONT.to_string());
                log::warn!(
                    "No available font found for role {:?}; falling back to '{}'",
                    role,
                    fallback
                );
                fallback
            }
        };

        self.font_cache.borrow_mut().insert(role, font.clone());
        font
    }

    /// Heading style for a level, with `font` and `level` added.
    ///
    /// A level without its own entry uses `heading3`.
    pub fn get_heading_style(&self, level: u32) -> Style {
        let key = format!("heading{}", level);
        let raw = match self.typography_entry(&key) {
            Some(entry) if !entry.is_empty() => Some(entry),
            _ => {
                log::warn!("No typography style defined for heading level {}", level);
                self.typography_entry("heading3")
            }
        };
        let mut style = self.resolved(raw);
        style.set("font", self.get_font(FontRole::Display));
        style.set_default("level", level);
        style
    }

    fn text_style(&self, key: &str) -> Style {
        let mut style = self.resolved(self.typography_entry(key));
        style.set("font", self.get_font(FontRole::Body));
        style
    }

    /// Body text style.
    pub fn get_body_style(&self) -> Style {
        self.text_style("body")
    }

    /// Caption style.
    pub fn get_caption_style(&self) -> Style {
        self.text_style("caption")
    }

    /// Small text style.
    pub fn get_small_style(&self) -> Style {
        self.text_style("small")
    }

    /// Style of a named component from the `components` section.
    pub fn get_component_style(&self, component: &str) -> Result<Style> {
        self.section("components")
            .and_then(|c| c.get(component))
            .and_then(Value::as_mapping)
            .map(|m| Style(self.resolve_colors(m)))
            .ok_or_else(|| Error::UnknownComponent(component.to_string()))
    }

    /// Page size and margins, with defaults for missing values.
    pub fn get_page_config(&self) -> PageConfig {
        let page = self.resolved(self.section("page"));
        let margins = page.nested("margins");
        let defaults = PageConfig::default();
        PageConfig {
            width: page.u32_or("width", defaults.width),
            height: page.u32_or("height", defaults.height),
            margins: Margins {
                top: margins.u32_or("top", defaults.margins.top),
                bottom: margins.u32_or("bottom", defaults.margins.bottom),
                left: margins.u32_or("left", defaults.margins.left),
                right: margins.u32_or("right", defaults.margins.right),
            },
        }
    }

    /// Usable content width: `page.usable_width` when set, else page width
    /// minus the side margins.
    pub fn usable_width(&self) -> u32 {
        let page = Style(self.section("page").cloned().unwrap_or_default());
        page.u32("usable_width")
            .unwrap_or_else(|| self.get_page_config().usable_width())
    }

    /// Cover settings with `title_font` checked for availability.
    pub fn get_cover_config(&self) -> Style {
        let mut config = self.resolved(self.section("cover"));
        let usable_title_font = config
            .str("title_font")
            .filter(|font| !font.is_empty() && self.locator.is_available(font))
            .map(str::to_string);
        match usable_title_font {
            Some(font) => config.set("title_font", font),
            None => config.set("title_font", self.get_font(FontRole::Display)),
        }
        config
    }

    fn header_footer_entry(&self, key: &str) -> Style {
        let mut config = self.resolved(
            self.section("header_footer")
                .and_then(|hf| hf.get(key))
                .and_then(Value::as_mapping),
        );
        config.set_default("font", self.get_font(FontRole::Body));
        config
    }

    /// Header settings.
    pub fn get_header_config(&self) -> Style {
        self.header_footer_entry("header")
    }

    /// Footer settings.
    pub fn get_footer_config(&self) -> Style {
        self.header_footer_entry("footer")
    }
}
