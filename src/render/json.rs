//! JSON rendering of the intermediate representation.

use crate::error::{Error, Result};
use crate::model::DocumentTree;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a document tree to JSON.
///
/// Image payloads are omitted; only their dimensions, filename and alt text
/// are kept.
pub fn to_json(tree: &DocumentTree, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(tree),
        JsonFormat::Compact => serde_json::to_string(tree),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Image, Paragraph, Section};

    #[test]
    fn test_to_json_pretty() {
        let mut tree = DocumentTree::new();
        tree.metadata.title = Some("Test".to_string());
        let mut section = Section::new("Intro", 1).with_number(1);
        section.push(Paragraph::with_text("Hello"));
        tree.sections.push(section);

        let json = to_json(&tree, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\""));
        assert!(json.contains("\"type\": \"paragraph\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let mut tree = DocumentTree::new();
        tree.preamble.push(Image::new(vec![0xFF; 64]).with_alt_text("logo").into());

        let json = to_json(&tree, JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"alt_text\":\"logo\""));
        assert!(!json.contains("\"data\""));
    }

    #[test]
    fn test_json_round_trip() {
        let mut tree = DocumentTree::new();
        tree.preamble.push(Paragraph::with_text("x").into());
        let json = to_json(&tree, JsonFormat::Compact).unwrap();
        let back: DocumentTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }
}
