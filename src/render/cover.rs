//! Cover page.

use super::xml::{Border, ParagraphXml, RunProps};
use super::DocxRenderer;
use crate::error::Result;
use crate::model::DocumentMetadata;
use chrono::Datelike;
use regex::Regex;
use std::sync::LazyLock;

/// Delimiters that split a title into two lines, in priority order.
const SPLIT_DELIMITERS: [&str; 3] = [" \u{2014} ", " - ", " : "];

const DEFAULT_REF_PREFIX: &str = "DOC";
const DEFAULT_REF_FORMAT: &str = "{prefix}-MAN-{year}-{seq:03d}";

/// Space before the metadata block, pushing it toward the page bottom.
const METADATA_SPACER: u32 = 3600;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([a-z]+)(?::0?(\d+)d)?\}").expect("valid placeholder regex")
});

/// Split a title into two roughly balanced lines.
///
/// A delimiter occurrence nearest the character midpoint wins; otherwise the
/// space nearest the midpoint is used. A title without either stays on the
/// first line.
pub fn split_title(title: &str) -> (String, String) {
    let title = title.trim();
    if title.is_empty() {
        return (String::new(), String::new());
    }
    let chars: Vec<char> = title.chars().collect();
    let mid = chars.len() / 2;

    let mut best: Option<(usize, usize, usize)> = None;
    for delim in SPLIT_DELIMITERS {
        let pattern: Vec<char> = delim.chars().collect();
        let mut start = 0;
        while start + pattern.len() <= chars.len() {
            if chars[start..start + pattern.len()] == pattern[..] {
                let distance = start.abs_diff(mid);
                if best.map_or(true, |(d, _, _)| distance < d) {
                    best = Some((distance, start, pattern.len()));
                }
                start += pattern.len();
            } else {
                start += 1;
            }
        }
    }

    if let Some((_, idx, len)) = best {
        let line1: String = chars[..idx].iter().collect();
        let line2: String = chars[idx + len..].iter().collect();
        return (line1.trim_end().to_string(), line2.trim_start().to_string());
    }

    let space = chars
        .iter()
        .enumerate()
        .filter(|(_, c)| **c == ' ')
        .map(|(i, _)| i)
        .fold(None, |best: Option<usize>, i| match best {
            Some(b) if b.abs_diff(mid) <= i.abs_diff(mid) => Some(b),
            _ => Some(i),
        });

    match space {
        Some(idx) => (
            chars[..idx].iter().collect(),
            chars[idx + 1..].iter().collect(),
        ),
        None => (title.to_string(), String::new()),
    }
}

/// Fill a reference template.
///
/// Supports `{prefix}`, `{year}`, `{seq}` and zero-padded `{seq:0Nd}`.
/// Returns `None` when the template names an unknown placeholder or has
/// unbalanced braces.
pub fn format_reference(template: &str, prefix: &str, year: i32, seq: u32) -> Option<String> {
    let mut out = String::with_capacity(template.len() + 8);
    let mut last = 0;
    for caps in PLACEHOLDER_RE.captures_iter(template) {
        let whole = caps.get(0)?;
        out.push_str(&template[last..whole.start()]);
        let width: usize = match caps.get(2) {
            Some(w) => w.as_str().parse().ok()?,
            None => 0,
        };
        let value = match &caps[1] {
            "prefix" => prefix.to_string(),
            "year" => format!("{:0width$}", year, width = width),
            "seq" => format!("{:0width$}", seq, width = width),
            _ => return None,
        };
        out.push_str(&value);
        last = whole.end();
    }
    out.push_str(&template[last..]);

    if out.contains('{') || out.contains('}') {
        return None;
    }
    Some(out)
}

/// Reference code for documents that carry none.
fn auto_reference(prefix: &str, template: &str) -> String {
    let year = chrono::Local::now().year();
    format_reference(template, prefix, year, 1).unwrap_or_else(|| {
        log::warn!(
            "Invalid reference format '{}'; using the default pattern",
            template
        );
        format!("{}-MAN-{}-001", prefix, year)
    })
}

impl DocxRenderer<'_> {
    pub(super) fn render_cover(&mut self, metadata: &DocumentMetadata) -> Result<()> {
        log::info!("Generating cover page for '{}'", metadata.title_or_empty());
        let config = self.design.get_cover_config();

        let title_font = config.str_or("title_font", &self.display_font).to_string();
        let title_size = config.u32_or("title_size", 144);
        let title_color = self.style_color(&config, "title_color", "black")?;
        let accent_color = self.style_color(&config, "title_accent_color", "accent_blue")?;

        self.writer
            .push_paragraph(&ParagraphXml::new().spacing(config.u32_or("top_spacer", 2400), 0));

        let (line1, line2) = split_title(metadata.title_or_empty());
        let title_props = RunProps::new().font(title_font).size(title_size).bold(true);
        self.writer.push_paragraph(
            &ParagraphXml::new()
                .spacing(0, 0)
                .run(line1, title_props.clone().color(&title_color)),
        );
        if !line2.is_empty() {
            self.writer.push_paragraph(
                &ParagraphXml::new()
                    .spacing(0, 0)
                    .run(line2, title_props.color(&accent_color)),
            );
        }

        let bar_color = self.style_color(&config, "accent_bar_color", "accent_blue")?;
        let bar_width = config.u32_or("accent_bar_width", 2400);
        let usable = self.design.usable_width();
        self.writer.push_paragraph(
            &ParagraphXml::new()
                .spacing(120, 200)
                .indent_right(usable.saturating_sub(bar_width))
                .border_bottom(
                    Border::single(config.u32_or("accent_bar_height", 6), &bar_color).with_space(1),
                ),
        );

        if let Some(version) = metadata.version.as_deref().filter(|v| !v.is_empty()) {
            let color = self.style_color(&config, "subtitle_color", "medium_gray")?;
            self.writer.push_paragraph(
                &ParagraphXml::new().spacing(200, 0).run(
                    format!("Version {}", version),
                    RunProps::new()
                        .font(self.body_font.clone())
                        .size(config.u32_or("subtitle_size", 32))
                        .color(&color),
                ),
            );
        } else {
            log::debug!("No version string; skipping cover subtitle");
        }

        self.writer
            .push_paragraph(&ParagraphXml::new().spacing(METADATA_SPACER, 0));

        let reference = match metadata.reference.as_deref().filter(|r| !r.is_empty()) {
            Some(reference) => reference.to_string(),
            None => auto_reference(
                config.str_or("ref_prefix", DEFAULT_REF_PREFIX),
                config.str_or("ref_format", DEFAULT_REF_FORMAT),
            ),
        };
        let meta_color = self.style_color(&config, "metadata_color", "light_gray")?;
        let meta_props = RunProps::new()
            .font(self.body_font.clone())
            .size(config.u32_or("metadata_size", 24))
            .color(&meta_color);
        let meta_spacing = config.u32_or("metadata_spacing", 160);
        let lines = [metadata.author.as_deref(), metadata.date.as_deref(), Some(reference.as_str())];
        for line in lines.into_iter().flatten().filter(|l| !l.is_empty()) {
            self.writer.push_paragraph(
                &ParagraphXml::new()
                    .spacing(0, meta_spacing)
                    .run(line, meta_props.clone()),
            );
        }

        self.writer.push_paragraph(&ParagraphXml::page_break());
        self.stats.cover = true;
        Ok(())
    }
}
