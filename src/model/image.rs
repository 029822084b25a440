//! Embedded image type.

use serde::{Deserialize, Serialize};

/// Default filename for images whose part name is unknown.
pub const DEFAULT_IMAGE_FILENAME: &str = "image.png";

/// An embedded image.
///
/// Empty `data` marks an image that cannot be rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// Raw binary data
    #[serde(skip_serializing, default)]
    pub data: Vec<u8>,

    /// Declared width in DXA (twentieths of a point)
    pub width: Option<u32>,

    /// Declared height in DXA
    pub height: Option<u32>,

    /// Filename of the source part (e.g., "image1.png")
    pub filename: String,

    /// Alternative text (description, falling back to the shape name)
    pub alt_text: String,
}

impl Image {
    /// Create a new image from its payload.
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            width: None,
            height: None,
            filename: DEFAULT_IMAGE_FILENAME.to_string(),
            alt_text: String::new(),
        }
    }

    /// Set the declared dimensions (DXA).
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set the filename.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Set the alternative text.
    pub fn with_alt_text(mut self, alt_text: impl Into<String>) -> Self {
        self.alt_text = alt_text.into();
        self
    }

    /// Whether the image carries a renderable payload.
    pub fn is_renderable(&self) -> bool {
        !self.data.is_empty()
    }

    /// Size of the payload in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

impl Default for Image {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
