//! Document model types for DOCX content representation.
//!
//! This module defines the intermediate representation (IR) that bridges
//! DOCX extraction, structure detection and styled rendering. Every stage of
//! the pipeline reads or writes these types; none of them depends on the
//! container format.

mod block;
mod document;
mod image;
mod paragraph;
mod table;

pub use block::{
    Callout, CalloutType, ContentElement, ElementKind, ListBlock, ListItem, ListType, Step,
    StepsBlock,
};
pub use document::{DocumentMetadata, DocumentSummary, DocumentTree, Section};
pub use image::Image;
pub use paragraph::{Paragraph, TextRun};
pub use table::Table;
