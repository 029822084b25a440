//! Step sequence detection.
//!
//! A step head is a paragraph opening with `Étape N`, `Etape N`, `Step N`
//! or `N. `. Consecutive heads are grouped into one [`StepsBlock`]; a plain
//! paragraph right after a head is absorbed as its description.

use super::{normalize, normalized_text};
use crate::model::{ContentElement, Paragraph, Step, StepsBlock, TextRun};
use regex::Regex;
use std::sync::LazyLock;

static STEP_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:(?:[EÉ]tape|Step)\s+(?P<named_num>\d+))|^(?P<dotted_num>\d+)\.\s")
        .expect("valid step prefix regex")
});

/// Separators allowed between a step prefix and its title.
const TITLE_SEPARATORS: [char; 4] = [':', '-', '\u{2013}', '\u{2014}'];

/// Step number of a text, if it opens with a step prefix. Numbers too
/// large for `u32` saturate.
pub fn step_number(text: &str) -> Option<u32> {
    let caps = STEP_PREFIX_RE.captures(text.trim())?;
    let digits = caps.name("named_num").or_else(|| caps.name("dotted_num"))?.as_str();
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse().unwrap_or(u32::MAX))
}

/// Text after the step prefix and any title separator, stripped.
pub fn strip_step_prefix(text: &str) -> &str {
    let trimmed = text.trim();
    match STEP_PREFIX_RE.find(trimmed) {
        Some(m) => {
            let rest = trimmed[m.end()..].trim();
            match rest.strip_prefix(TITLE_SEPARATORS) {
                Some(after) => after.trim(),
                None => rest,
            }
        }
        None => text,
    }
}

/// Leading bold span of a paragraph, NFC-normalized; leading non-bold runs
/// are skipped.
fn bold_title(paragraph: &Paragraph) -> String {
    let mut parts = String::new();
    let mut started = false;
    for run in &paragraph.runs {
        if run.bold {
            parts.push_str(&run.text);
            started = true;
        } else if started {
            break;
        }
    }
    normalize(parts.trim())
}

/// Try to read a step at `index`. Returns the step and how many elements it used.
fn parse_step(elements: &[ContentElement], index: usize) -> Option<(Step, usize)> {
    let paragraph = elements.get(index)?.as_paragraph()?;
    let text = normalized_text(paragraph);
    let text = text.trim();
    let number = step_number(text)?;
    let remainder = strip_step_prefix(text);

    let (title, inline_description) = if paragraph.starts_bold() {
        let bold = bold_title(paragraph);
        // A bold span that carries the step prefix itself is compared without it.
        let bold = if step_number(&bold).is_some() {
            strip_step_prefix(&bold)
        } else {
            bold.as_str()
        };
        match remainder.strip_prefix(bold) {
            Some(inline) if !bold.is_empty() => (bold.to_string(), inline.trim().to_string()),
            _ => (remainder.to_string(), String::new()),
        }
    } else {
        (remainder.to_string(), String::new())
    };

    let mut consumed = 1;
    let mut description = inline_description;
    let mut description_runs: Vec<TextRun> = Vec::new();

    if let Some(next) = elements.get(index + 1).and_then(ContentElement::as_paragraph) {
        let next_text = normalized_text(next);
        let next_text = next_text.trim();
        if !next_text.is_empty() && step_number(next_text).is_none() {
            if description.is_empty() {
                description = next_text.to_string();
            } else {
                description = format!("{} {}", description, next_text);
            }
            description_runs = next.runs.clone();
            consumed = 2;
        }
    }

    if description_runs.is_empty() && !description.is_empty() {
        description_runs.push(TextRun::new(description.clone()));
    }

    Some((
        Step {
            number,
            title,
            description,
            description_runs,
        },
        consumed,
    ))
}

/// Group consecutive step paragraphs into steps blocks.
pub fn detect_steps(elements: Vec<ContentElement>) -> Vec<ContentElement> {
    let mut result = Vec::with_capacity(elements.len());
    let mut index = 0;

    while index < elements.len() {
        let Some((first, consumed)) = parse_step(&elements, index) else {
            result.push(elements[index].clone());
            index += 1;
            continue;
        };

        let mut steps = vec![first];
        index += consumed;
        while let Some((step, consumed)) = parse_step(&elements, index) {
            steps.push(step);
            index += consumed;
        }

        log::debug!(
            "Detected steps block with {} step(s) starting at '{}'",
            steps.len(),
            steps[0].title
        );
        result.push(ContentElement::Steps(StepsBlock { steps }));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(text: &str) -> ContentElement {
        ContentElement::Paragraph(Paragraph::with_text(text))
    }

    #[test]
    fn test_step_number_patterns() {
        assert_eq!(step_number("Step 1: Configure"), Some(1));
        assert_eq!(step_number("étape 12 Installer"), Some(12));
        assert_eq!(step_number("Etape 3"), Some(3));
        assert_eq!(step_number("4. Deploy"), Some(4));
        assert_eq!(step_number("4.Deploy"), None);
        assert_eq!(step_number("Stepping 1"), None);
        assert_eq!(step_number("Plain text"), None);
        assert_eq!(step_number("Step 99999999999 Overflow"), Some(u32::MAX));
        assert_eq!(step_number("99999999999999999999999. Overflow"), Some(u32::MAX));
    }

    #[test]
    fn test_strip_prefix_and_separator() {
        assert_eq!(strip_step_prefix("Step 1: Configure"), "Configure");
        assert_eq!(strip_step_prefix("Étape 2 \u{2014} Déployer"), "Déployer");
        assert_eq!(strip_step_prefix("3. Verify"), "Verify");
        assert_eq!(strip_step_prefix("no prefix"), "no prefix");
    }

    #[test]
    fn test_two_steps_with_descriptions() {
        let elements = vec![
            para("Step 1: Configure"),
            para("Description one."),
            para("Step 2: Deploy"),
            para("Description two."),
        ];
        let result = detect_steps(elements);
        assert_eq!(result.len(), 1);
        let ContentElement::Steps(block) = &result[0] else {
            panic!("expected a steps block");
        };
        assert_eq!(block.steps.len(), 2);
        assert_eq!(block.steps[0].number, 1);
        assert_eq!(block.steps[0].title, "Configure");
        assert_eq!(block.steps[0].description, "Description one.");
        assert_eq!(block.steps[1].title, "Deploy");
        assert_eq!(block.steps[1].description_runs, vec![TextRun::new("Description two.")]);
    }

    #[test]
    fn test_bold_title_with_inline_description() {
        let paragraph = Paragraph::from_runs(vec![
            TextRun::new("1. "),
            TextRun::bold("Install"),
            TextRun::new(" the package"),
        ]);
        // Leading plain "1. " is not bold, so the head has no bold start.
        let result = detect_steps(vec![ContentElement::Paragraph(paragraph)]);
        let ContentElement::Steps(block) = &result[0] else {
            panic!("expected a steps block");
        };
        assert_eq!(block.steps[0].title, "Install the package");

        let bold_head = Paragraph::from_runs(vec![TextRun::bold("Step 5"), TextRun::new(" then reboot")]);
        let result = detect_steps(vec![ContentElement::Paragraph(bold_head)]);
        let ContentElement::Steps(block) = &result[0] else {
            panic!("expected a steps block");
        };
        // The bold span is only the prefix, so the remainder is the title.
        assert_eq!(block.steps[0].title, "then reboot");
        assert!(block.steps[0].description.is_empty());
        assert!(block.steps[0].description_runs.is_empty());

        let titled = Paragraph::from_runs(vec![
            TextRun::bold("Step 2: Configure"),
            TextRun::new(" the proxy"),
        ]);
        let result = detect_steps(vec![ContentElement::Paragraph(titled)]);
        let ContentElement::Steps(block) = &result[0] else {
            panic!("expected a steps block");
        };
        assert_eq!(block.steps[0].title, "Configure");
        assert_eq!(block.steps[0].description, "the proxy");
    }

    #[test]
    fn test_fully_bold_head_has_no_duplicate_description() {
        for (head, title) in [("Step 1: Configure", "Configure"), ("1. Install", "Install")] {
            let paragraph = Paragraph::from_runs(vec![TextRun::bold(head)]);
            let result = detect_steps(vec![ContentElement::Paragraph(paragraph)]);
            let ContentElement::Steps(block) = &result[0] else {
                panic!("expected a steps block for '{}'", head);
            };
            assert_eq!(block.steps[0].title, title);
            assert!(block.steps[0].description.is_empty());
            assert!(block.steps[0].description_runs.is_empty());
        }
    }

    #[test]
    fn test_bold_title_with_decomposed_accents() {
        // "Étape" and "Créer" written with combining acute accents.
        let bold_head = Paragraph::from_runs(vec![
            TextRun::bold("E\u{301}tape 2 : Cre\u{301}er"),
            TextRun::new(" le compte"),
        ]);
        let result = detect_steps(vec![ContentElement::Paragraph(bold_head)]);
        let ContentElement::Steps(block) = &result[0] else {
            panic!("expected a steps block");
        };
        assert_eq!(block.steps[0].title, "Créer");
        assert_eq!(block.steps[0].description, "le compte");
    }

    #[test]
    fn test_non_step_breaks_block() {
        let elements = vec![
            para("1. First"),
            ContentElement::PageBreak,
            para("2. Second"),
        ];
        let result = detect_steps(elements);
        assert_eq!(result.len(), 3);
        assert!(matches!(result[0], ContentElement::Steps(_)));
        assert!(matches!(result[1], ContentElement::PageBreak));
        assert!(matches!(result[2], ContentElement::Steps(_)));
    }

    #[test]
    fn test_following_step_is_not_absorbed() {
        let result = detect_steps(vec![para("Step 1 Prepare"), para("Step 2 Run")]);
        let ContentElement::Steps(block) = &result[0] else {
            panic!("expected a steps block");
        };
        assert_eq!(block.steps.len(), 2);
        assert!(block.steps[0].description.is_empty());
        assert!(block.steps[0].description_runs.is_empty());
    }
}
