//! Design-system resolution and element style mapping.

pub mod fonts;
pub mod mapper;
pub mod merge;
pub mod tokens;

pub use fonts::{FixedFontLocator, FontLocator, FontLookup, FontRole, SystemFontLocator};
pub use mapper::{callout_component, list_component, StyleMapper};
pub use merge::deep_merge;
pub use tokens::{is_hex_color, DesignSystem, Margins, PageConfig, Style};
