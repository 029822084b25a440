//! Block-level content elements.

use super::{Image, Paragraph, Table, TextRun};
use serde::{Deserialize, Serialize};

/// A block of content inside a section or the preamble.
///
/// The set of variants is closed: every consumer matches exhaustively so a
/// new kind cannot be silently ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentElement {
    /// A body paragraph
    Paragraph(Paragraph),
    /// A table
    Table(Table),
    /// An embedded image
    Image(Image),
    /// A detected callout box
    Callout(Callout),
    /// A bullet or numbered list
    List(ListBlock),
    /// A detected step sequence
    Steps(StepsBlock),
    /// An explicit page break
    PageBreak,
}

/// Discriminator for [`ContentElement`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Paragraph
    Paragraph,
    /// Table
    Table,
    /// Image
    Image,
    /// Callout
    Callout,
    /// List
    List,
    /// Steps
    Steps,
    /// Page break
    PageBreak,
}

impl ElementKind {
    /// All element kinds, in declaration order.
    pub const ALL: [ElementKind; 7] = [
        ElementKind::Paragraph,
        ElementKind::Table,
        ElementKind::Image,
        ElementKind::Callout,
        ElementKind::List,
        ElementKind::Steps,
        ElementKind::PageBreak,
    ];

    /// Stable snake_case name, also used as the style `type` discriminator.
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Paragraph => "paragraph",
            ElementKind::Table => "table",
            ElementKind::Image => "image",
            ElementKind::Callout => "callout",
            ElementKind::List => "list",
            ElementKind::Steps => "steps",
            ElementKind::PageBreak => "page_break",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ContentElement {
    /// The variant discriminator.
    pub fn kind(&self) -> ElementKind {
        match self {
            ContentElement::Paragraph(_) => ElementKind::Paragraph,
            ContentElement::Table(_) => ElementKind::Table,
            ContentElement::Image(_) => ElementKind::Image,
            ContentElement::Callout(_) => ElementKind::Callout,
            ContentElement::List(_) => ElementKind::List,
            ContentElement::Steps(_) => ElementKind::Steps,
            ContentElement::PageBreak => ElementKind::PageBreak,
        }
    }

    /// Borrow the paragraph, if this is one.
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            ContentElement::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    /// Plain text carried by the element, for search and summaries.
    pub fn plain_text(&self) -> String {
        match self {
            ContentElement::Paragraph(p) => p.text(),
            ContentElement::Table(t) => t.plain_text(),
            ContentElement::Image(i) => i.alt_text.clone(),
            ContentElement::Callout(c) => {
                if c.title.is_empty() {
                    c.body.clone()
                } else {
                    format!("{}: {}", c.title, c.body)
                }
            }
            ContentElement::List(l) => l.plain_text(),
            ContentElement::Steps(s) => s
                .steps
                .iter()
                .map(|step| {
                    if step.description.is_empty() {
                        step.title.clone()
                    } else {
                        format!("{}\n{}", step.title, step.description)
                    }
                })
                .collect::<Vec<_>>()
                .join("\n"),
            ContentElement::PageBreak => String::new(),
        }
    }
}

impl From<Paragraph> for ContentElement {
    fn from(p: Paragraph) -> Self {
        ContentElement::Paragraph(p)
    }
}

impl From<Table> for ContentElement {
    fn from(t: Table) -> Self {
        ContentElement::Table(t)
    }
}

impl From<Image> for ContentElement {
    fn from(i: Image) -> Self {
        ContentElement::Image(i)
    }
}

impl From<Callout> for ContentElement {
    fn from(c: Callout) -> Self {
        ContentElement::Callout(c)
    }
}

impl From<ListBlock> for ContentElement {
    fn from(l: ListBlock) -> Self {
        ContentElement::List(l)
    }
}

impl From<StepsBlock> for ContentElement {
    fn from(s: StepsBlock) -> Self {
        ContentElement::Steps(s)
    }
}

/// Callout flavor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalloutType {
    /// Informational box (default)
    #[default]
    Info,
    /// Warning box
    Warning,
    /// Note box
    Note,
    /// Tip box
    Tip,
}

impl CalloutType {
    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            CalloutType::Info => "info",
            CalloutType::Warning => "warning",
            CalloutType::Note => "note",
            CalloutType::Tip => "tip",
        }
    }

    /// Title shown when the callout carries none.
    pub fn default_title(self) -> &'static str {
        match self {
            CalloutType::Info => "Information",
            CalloutType::Warning => "Attention",
            CalloutType::Note => "Note",
            CalloutType::Tip => "Conseil",
        }
    }
}

/// A highlighted box detected from text patterns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Callout {
    /// Callout flavor
    pub callout_type: CalloutType,
    /// Title (capitalized keyword or empty)
    pub title: String,
    /// Body as plain text
    pub body: String,
    /// Body with original formatting
    pub body_runs: Vec<TextRun>,
}

impl Callout {
    /// Create a callout with a plain body.
    pub fn new(callout_type: CalloutType, body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            callout_type,
            title: String::new(),
            body_runs: vec![TextRun::new(body.clone())],
            body,
        }
    }

    /// Title to display, falling back to the type's default.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            self.callout_type.default_title()
        } else {
            &self.title
        }
    }
}

/// List flavor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListType {
    /// Bulleted list
    #[default]
    Bullet,
    /// Numbered list
    Numbered,
}

impl ListType {
    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            ListType::Bullet => "bullet",
            ListType::Numbered => "numbered",
        }
    }
}

/// A list item owning its nested children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    /// Styled runs
    pub runs: Vec<TextRun>,
    /// Source nesting level (0 = top level)
    pub level: u32,
    /// Nested items
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ListItem>,
}

impl ListItem {
    /// Create a leaf item.
    pub fn new(runs: Vec<TextRun>, level: u32) -> Self {
        Self {
            runs,
            level,
            children: Vec::new(),
        }
    }

    /// Concatenated run text.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Number of items in this subtree, including this one.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(ListItem::count).sum::<usize>()
    }
}

/// A typed sequence of top-level list items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListBlock {
    /// List flavor
    pub list_type: ListType,
    /// Top-level items
    pub items: Vec<ListItem>,
}

impl ListBlock {
    /// Create a list block.
    pub fn new(list_type: ListType, items: Vec<ListItem>) -> Self {
        Self { list_type, items }
    }

    /// Total number of items including nested ones.
    pub fn total_items(&self) -> usize {
        self.items.iter().map(ListItem::count).sum()
    }

    fn plain_text(&self) -> String {
        fn walk(items: &[ListItem], out: &mut Vec<String>) {
            for item in items {
                out.push(item.text());
                walk(&item.children, out);
            }
        }
        let mut lines = Vec::new();
        walk(&self.items, &mut lines);
        lines.join("\n")
    }
}

/// A single step of a procedure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Ordinal number from the source text
    pub number: u32,
    /// Step title
    pub title: String,
    /// Description as plain text
    pub description: String,
    /// Description with formatting
    pub description_runs: Vec<TextRun>,
}

/// An ordered sequence of steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepsBlock {
    /// Steps in order
    pub steps: Vec<Step>,
}
