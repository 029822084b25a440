//! Builds the document tree from flat extractor records.

use super::extractor::RawElement;
use crate::model::{
    ContentElement, DocumentMetadata, DocumentTree, ListBlock, ListItem, ListType, Section, TextRun,
};

/// Assembles sections, the preamble and nested lists.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    infer_title: bool,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self { infer_title: true }
    }
}

impl TreeBuilder {
    /// Create a tree builder with title inference enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable title inference.
    pub fn with_title_inference(mut self, infer: bool) -> Self {
        self.infer_title = infer;
        self
    }

    /// Build the tree.
    ///
    /// Every heading opens a section numbered in encounter order; content
    /// before the first heading lands in the preamble.
    pub fn build(&self, metadata: DocumentMetadata, elements: Vec<RawElement>) -> DocumentTree {
        let mut tree = DocumentTree {
            metadata,
            ..Default::default()
        };
        let mut counter = 0;

        for element in group_list_items(elements) {
            let content = match element {
                Grouped::Raw(RawElement::Heading { level, text, .. }) => {
                    counter += 1;
                    tree.sections.push(Section::new(text, level).with_number(counter));
                    continue;
                }
                Grouped::Raw(RawElement::Paragraph(p)) => ContentElement::Paragraph(p),
                Grouped::Raw(RawElement::Table(t)) => ContentElement::Table(t),
                Grouped::Raw(RawElement::Image(i)) => ContentElement::Image(i),
                Grouped::Raw(RawElement::PageBreak) => ContentElement::PageBreak,
                Grouped::Raw(RawElement::ListItem { .. }) => continue,
                Grouped::List(block) => ContentElement::List(block),
            };
            match tree.sections.last_mut() {
                Some(section) => section.children.push(content),
                None => tree.preamble.push(content),
            }
        }

        if self.infer_title && !tree.metadata.has_title() {
            if let Some(title) = infer_title(&tree) {
                log::debug!("Inferred document title '{}'", title);
                tree.metadata.title = Some(title);
            }
        }

        log::info!(
            "Built tree: {} section(s), {} preamble element(s)",
            tree.sections.len(),
            tree.preamble.len()
        );
        tree
    }
}

/// A record after list grouping.
enum Grouped {
    Raw(RawElement),
    List(ListBlock),
}

/// Merge consecutive list items of one kind into list blocks.
fn group_list_items(elements: Vec<RawElement>) -> Vec<Grouped> {
    let mut grouped = Vec::with_capacity(elements.len());
    let mut buffer: Vec<(Vec<TextRun>, u32)> = Vec::new();
    let mut buffer_type = ListType::Bullet;

    fn flush(buffer: &mut Vec<(Vec<TextRun>, u32)>, list_type: ListType, grouped: &mut Vec<Grouped>) {
        if !buffer.is_empty() {
            let items = nest_list_items(std::mem::take(buffer));
            grouped.push(Grouped::List(ListBlock::new(list_type, items)));
        }
    }

    for element in elements {
        match element {
            RawElement::ListItem {
                runs,
                level,
                list_type,
            } => {
                if !buffer.is_empty() && list_type != buffer_type {
                    flush(&mut buffer, buffer_type, &mut grouped);
                }
                buffer.push((runs, level));
                buffer_type = list_type;
            }
            other => {
                flush(&mut buffer, buffer_type, &mut grouped);
                grouped.push(Grouped::Raw(other));
            }
        }
    }
    flush(&mut buffer, buffer_type, &mut grouped);
    grouped
}

/// Nest flat `(runs, level)` items.
///
/// A level-0 item always starts a new root. Any other item becomes a child
/// of the nearest open item with a strictly lower level, or a root when
/// there is none.
pub fn nest_list_items(items: Vec<(Vec<TextRun>, u32)>) -> Vec<ListItem> {
    let mut roots: Vec<ListItem> = Vec::new();
    // Levels of the open items along the rightmost path of `roots`.
    let mut open_levels: Vec<u32> = Vec::new();

    for (runs, level) in items {
        let item = ListItem::new(runs, level);

        if open_levels.is_empty() || level == 0 {
            roots.push(item);
            open_levels.clear();
            open_levels.push(level);
            continue;
        }

        while open_levels.last().is_some_and(|&top| top >= level) {
            open_levels.pop();
        }

        if open_levels.is_empty() {
            roots.push(item);
        } else if let Some(parent) = rightmost_at_depth(&mut roots, open_levels.len()) {
            parent.children.push(item);
        }
        open_levels.push(level);
    }

    roots
}

/// The last item at `depth` along the rightmost path (depth 1 = last root).
fn rightmost_at_depth(roots: &mut [ListItem], depth: usize) -> Option<&mut ListItem> {
    let mut node = roots.last_mut()?;
    for _ in 1..depth {
        node = node.children.last_mut()?;
    }
    Some(node)
}

/// Guess a title: the first heading, else the first preamble paragraph that
/// opens with bold text.
pub fn infer_title(tree: &DocumentTree) -> Option<String> {
    if let Some(section) = tree.sections.first() {
        return Some(section.heading.clone());
    }
    tree.preamble
        .iter()
        .filter_map(ContentElement::as_paragraph)
        .filter(|p| !p.is_blank())
        .find(|p| p.starts_bold())
        .map(|p| p.text().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Paragraph;

    fn item(text: &str, level: u32) -> RawElement {
        RawElement::ListItem {
            runs: vec![TextRun::new(text)],
            level,
            list_type: ListType::Bullet,
        }
    }

    fn heading(text: &str, level: u32) -> RawElement {
        RawElement::Heading {
            level,
            text: text.to_string(),
            runs: vec![TextRun::new(text)],
        }
    }

    fn para(text: &str) -> RawElement {
        RawElement::Paragraph(Paragraph::with_text(text))
    }

    #[test]
    fn test_no_headings_goes_to_preamble() {
        let tree = TreeBuilder::new().build(
            DocumentMetadata::default(),
            vec![para("one"), para("two"), RawElement::PageBreak],
        );
        assert!(tree.sections.is_empty());
        assert_eq!(tree.preamble.len(), 3);
    }

    #[test]
    fn test_sections_numbered_in_encounter_order() {
        let tree = TreeBuilder::new().build(
            DocumentMetadata::default(),
            vec![
                para("intro"),
                heading("A", 1),
                para("a"),
                heading("A.1", 2),
                heading("B", 1),
            ],
        );
        assert_eq!(tree.preamble.len(), 1);
        let numbers: Vec<Option<u32>> = tree.sections.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(tree.sections[0].children.len(), 1);
        assert_eq!(tree.metadata.title.as_deref(), Some("A"));
    }

    #[test]
    fn test_list_nesting_stack() {
        // a(0) b(1) c(2) d(1) e(0) f(2)
        let items = vec![
            (vec![TextRun::new("a")], 0),
            (vec![TextRun::new("b")], 1),
            (vec![TextRun::new("c")], 2),
            (vec![TextRun::new("d")], 1),
            (vec![TextRun::new("e")], 0),
            (vec![TextRun::new("f")], 2),
        ];
        let roots = nest_list_items(items);
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].text(), "a");
        assert_eq!(roots[0].children.len(), 2);
        assert_eq!(roots[0].children[0].children[0].text(), "c");
        assert_eq!(roots[0].children[1].text(), "d");
        assert_eq!(roots[1].children[0].text(), "f");
    }

    #[test]
    fn test_list_without_root_level() {
        let roots = nest_list_items(vec![
            (vec![TextRun::new("x")], 2),
            (vec![TextRun::new("y")], 1),
        ]);
        // y pops x and finds no lower level, so it becomes a root.
        assert_eq!(roots.len(), 2);
        assert!(roots[0].children.is_empty());
    }

    #[test]
    fn test_list_kind_change_splits_blocks() {
        let numbered = RawElement::ListItem {
            runs: vec![TextRun::new("1")],
            level: 0,
            list_type: ListType::Numbered,
        };
        let tree = TreeBuilder::new().build(
            DocumentMetadata::default(),
            vec![item("a", 0), item("b", 0), numbered, para("after")],
        );
        let kinds: Vec<_> = tree
            .preamble
            .iter()
            .map(|e| match e {
                ContentElement::List(block) => Some((block.list_type, block.items.len())),
                _ => None,
            })
            .collect();
        assert_eq!(
            kinds,
            vec![Some((ListType::Bullet, 2)), Some((ListType::Numbered, 1)), None]
        );
    }

    #[test]
    fn test_infer_title_from_bold_preamble() {
        let plain = RawElement::Paragraph(Paragraph::with_text("Just text"));
        let bold = RawElement::Paragraph(Paragraph::from_runs(vec![
            TextRun::new(" "),
            TextRun::bold("Annual Report"),
        ]));
        let tree = TreeBuilder::new().build(DocumentMetadata::default(), vec![plain, bold]);
        assert_eq!(tree.metadata.title.as_deref(), Some("Annual Report"));
    }

    #[test]
    fn test_existing_title_is_kept() {
        let metadata = DocumentMetadata {
            title: Some("From properties".to_string()),
            ..Default::default()
        };
        let tree = TreeBuilder::new().build(metadata, vec![heading("First", 1)]);
        assert_eq!(tree.metadata.title.as_deref(), Some("From properties"));

        let tree = TreeBuilder::new()
            .with_title_inference(false)
            .build(DocumentMetadata::default(), vec![heading("First", 1)]);
        assert!(tree.metadata.title.is_none());
    }
}
