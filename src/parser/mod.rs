//! DOCX parsing module.

mod docx_parser;
pub mod extractor;
mod options;
pub mod package;
pub mod tree_builder;
mod wml;

pub use docx_parser::DocxParser;
pub use extractor::{Extractor, RawElement};
pub use options::{ErrorMode, ParseOptions};
pub use package::{DocxPackage, NumberingCatalog, Relationship, Relationships, StyleCatalog, StyleInfo};
pub use tree_builder::{infer_title, nest_list_items, TreeBuilder};
