//! Callout detection.
//!
//! Three strategies are tried in order on each element: single-cell tables,
//! paragraphs opening with a keyword and a colon, and paragraphs opening
//! with a border marker (`|` or `▎`).

use super::{normalize, normalized_text};
use crate::model::{Callout, CalloutType, ContentElement, Table, TextRun};
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

/// Keywords and the callout kind each one selects.
pub const CALLOUT_KEYWORDS: [(&str, CalloutType); 8] = [
    ("attention", CalloutType::Warning),
    ("important", CalloutType::Warning),
    ("conseil", CalloutType::Tip),
    ("bon à savoir", CalloutType::Tip),
    ("note", CalloutType::Note),
    ("warning", CalloutType::Warning),
    ("tip", CalloutType::Tip),
    ("info", CalloutType::Info),
];

const BORDER_MARKERS: [char; 2] = ['|', '\u{258E}'];

static KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    let mut keywords: Vec<&str> = CALLOUT_KEYWORDS.iter().map(|(k, _)| *k).collect();
    // Longest first so multi-word keywords win over their prefixes.
    keywords.sort_by_key(|k| std::cmp::Reverse(k.chars().count()));
    let alternation = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?is)^(?P<keyword>{})\s*:\s*(?P<body>.*)", alternation))
        .expect("valid callout keyword regex")
});

static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*:\s*").expect("valid separator regex"));

/// A keyword prefix found at the start of a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMatch {
    /// Keyword as written in the text
    pub keyword: String,
    /// Stripped text after the separator
    pub body: String,
}

impl KeywordMatch {
    /// Callout kind for the keyword.
    pub fn callout_type(&self) -> CalloutType {
        callout_type_for_keyword(&self.keyword)
    }

    /// Keyword with its first letter upper-cased and the rest lower-cased.
    pub fn title(&self) -> String {
        capitalize(&self.keyword)
    }
}

/// Match a callout keyword prefix.
pub fn match_keyword(text: &str) -> Option<KeywordMatch> {
    let caps = KEYWORD_RE.captures(text)?;
    Some(KeywordMatch {
        keyword: caps["keyword"].to_string(),
        body: caps["body"].trim().to_string(),
    })
}

/// Kind for a keyword; unknown keywords are informational.
pub fn callout_type_for_keyword(keyword: &str) -> CalloutType {
    let lower = keyword.to_lowercase();
    CALLOUT_KEYWORDS
        .iter()
        .find(|(k, _)| *k == lower)
        .map(|(_, t)| *t)
        .unwrap_or(CalloutType::Info)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

type CalloutStrategy = fn(&ContentElement) -> Option<Callout>;

const CALLOUT_STRATEGIES: [(&str, CalloutStrategy); 3] = [
    ("single-cell table", table_callout),
    ("keyword", keyword_callout),
    ("border marker", border_callout),
];

/// Replace elements that look like callouts.
pub fn detect_callouts(elements: Vec<ContentElement>) -> Vec<ContentElement> {
    elements
        .into_iter()
        .map(|element| {
            let found = CALLOUT_STRATEGIES.iter().find_map(|(name, strategy)| {
                let callout = strategy(&element)?;
                log::debug!(
                    "Detected {} callout ({}): '{}'",
                    name,
                    callout.callout_type.as_str(),
                    preview(&callout)
                );
                Some(callout)
            });
            found.map(ContentElement::Callout).unwrap_or(element)
        })
        .collect()
}

fn preview(callout: &Callout) -> String {
    if callout.title.is_empty() {
        callout.body.chars().take(40).collect()
    } else {
        callout.title.clone()
    }
}

/// One header and no rows, one 1-cell row and no headers, or both.
pub fn is_single_cell_table(table: &Table) -> bool {
    let single_row = table.rows.len() == 1 && table.rows[0].len() == 1;
    match (table.headers.len(), table.rows.len()) {
        (1, 0) => true,
        (0, _) | (1, _) => single_row,
        _ => false,
    }
}

fn single_cell_text(table: &Table) -> &str {
    table
        .rows
        .first()
        .and_then(|row| row.first())
        .or_else(|| table.headers.first())
        .map(String::as_str)
        .unwrap_or("")
}

fn single_cell_runs(table: &Table) -> Vec<TextRun> {
    table
        .data_cell_runs(0, 0)
        .or_else(|| table.header_cell_runs(0))
        .map(<[TextRun]>::to_vec)
        .unwrap_or_default()
}

fn table_callout(element: &ContentElement) -> Option<Callout> {
    let ContentElement::Table(table) = element else {
        return None;
    };
    if !is_single_cell_table(table) {
        return None;
    }
    let text = normalize(single_cell_text(table));
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let (callout_type, title, body) = match match_keyword(text) {
        Some(m) => (m.callout_type(), m.title(), m.body),
        None => (CalloutType::Info, String::new(), text.to_string()),
    };
    let mut body_runs = single_cell_runs(table);
    if body_runs.is_empty() {
        body_runs.push(TextRun::new(body.clone()));
    }
    Some(Callout {
        callout_type,
        title,
        body,
        body_runs,
    })
}

fn keyword_callout(element: &ContentElement) -> Option<Callout> {
    let ContentElement::Paragraph(paragraph) = element else {
        return None;
    };
    let text = normalized_text(paragraph);
    let m = match_keyword(text.trim())?;
    Some(Callout {
        callout_type: m.callout_type(),
        title: m.title(),
        body_runs: body_runs_after_keyword(&paragraph.runs, &m.keyword),
        body: m.body,
    })
}

fn border_callout(element: &ContentElement) -> Option<Callout> {
    let ContentElement::Paragraph(paragraph) = element else {
        return None;
    };
    let text = normalized_text(paragraph);
    let inner = strip_border_marker(&text)?;
    if inner.is_empty() {
        return None;
    }

    let (callout_type, title, body) = match match_keyword(inner) {
        Some(m) => (m.callout_type(), m.title(), m.body),
        None => (CalloutType::Note, String::new(), inner.to_string()),
    };
    Some(Callout {
        callout_type,
        title,
        body,
        body_runs: body_runs_without_marker(&paragraph.runs),
    })
}

/// Text after a leading border marker, or `None` when there is no marker.
fn strip_border_marker(text: &str) -> Option<&str> {
    let rest = text.trim_start().strip_prefix(BORDER_MARKERS)?;
    Some(rest.trim())
}

/// Runs with the keyword and its colon removed, formatting preserved.
///
/// Text is accumulated run by run until the keyword shows up. If the colon
/// is not in that run, it is stripped from the next non-blank run instead.
/// What follows the separator keeps its formatting and every later run is
/// kept as is. When nothing survives, a single plain run with the keyword
/// body is returned.
pub fn body_runs_after_keyword(runs: &[TextRun], keyword: &str) -> Vec<TextRun> {
    let keyword_re = RegexBuilder::new(&regex::escape(keyword))
        .case_insensitive(true)
        .build();
    let mut body_runs = Vec::new();

    if let Ok(keyword_re) = keyword_re {
        let mut accumulated = String::new();
        let mut separator_pending = false;
        let mut iter = runs.iter();
        for run in iter.by_ref() {
            accumulated.push_str(&normalize(&run.text));
            let Some(found) = keyword_re.find(&accumulated) else {
                continue;
            };
            let after = &accumulated[found.end()..];
            match SEPARATOR_RE.find(after) {
                Some(sep) => push_non_blank(&mut body_runs, run, &after[sep.end()..]),
                None if after.trim().is_empty() => separator_pending = true,
                None => push_non_blank(&mut body_runs, run, after),
            }
            break;
        }
        if separator_pending {
            for run in iter.by_ref() {
                let text = normalize(&run.text);
                if text.trim().is_empty() {
                    continue;
                }
                let rest = match SEPARATOR_RE.find(&text) {
                    Some(sep) => &text[sep.end()..],
                    None => text.as_str(),
                };
                push_non_blank(&mut body_runs, run, rest);
                break;
            }
        }
        body_runs.extend(iter.cloned());
    }

    if body_runs.is_empty() {
        let full: String = runs.iter().map(|r| r.text.as_str()).collect();
        let full = normalize(&full);
        let body = match match_keyword(full.trim()) {
            Some(m) => m.body,
            None => full.trim().to_string(),
        };
        return vec![TextRun::new(body)];
    }
    body_runs
}

fn push_non_blank(body_runs: &mut Vec<TextRun>, run: &TextRun, text: &str) {
    if !text.trim().is_empty() {
        body_runs.push(run.with_text(text));
    }
}

/// Runs with the border marker removed from the first run.
pub fn body_runs_without_marker(runs: &[TextRun]) -> Vec<TextRun> {
    let Some((first, rest)) = runs.split_first() else {
        return Vec::new();
    };
    let mut text = first.text.trim_start();
    if let Some(stripped) = text.strip_prefix(BORDER_MARKERS) {
        text = stripped.trim_start();
    }

    let mut result = Vec::with_capacity(runs.len());
    if !text.is_empty() {
        result.push(first.with_text(text));
    }
    result.extend(rest.iter().cloned());
    result
}
