//! In-memory `.docx` fixtures for integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const IMAGE_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// Builds a minimal WordprocessingML package.
#[derive(Default)]
pub struct DocxFixture {
    body: String,
    core: Option<String>,
    numbering: Option<String>,
    images: Vec<(String, Vec<u8>)>,
}

impl DocxFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heading(mut self, level: u32, text: &str) -> Self {
        self.body.push_str(&format!(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading{}"/></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>"#,
            level, text
        ));
        self
    }

    pub fn para(mut self, text: &str) -> Self {
        self.body.push_str(&format!(
            r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
            text
        ));
        self
    }

    /// A list paragraph; `num_id` 1 is a bullet list, 2 a numbered one.
    pub fn list_item(mut self, num_id: u32, level: u32, text: &str) -> Self {
        self.ensure_numbering();
        self.body.push_str(&format!(
            r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="{}"/><w:numId w:val="{}"/></w:numPr></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>"#,
            level, num_id, text
        ));
        self
    }

    pub fn table(mut self, rows: &[&[&str]]) -> Self {
        self.body.push_str("<w:tbl>");
        for row in rows {
            self.body.push_str("<w:tr>");
            for cell in *row {
                self.body.push_str(&format!(
                    "<w:tc><w:p><w:r><w:t>{}</w:t></w:r></w:p></w:tc>",
                    cell
                ));
            }
            self.body.push_str("</w:tr>");
        }
        self.body.push_str("</w:tbl>");
        self
    }

    pub fn page_break(mut self) -> Self {
        self.body
            .push_str(r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#);
        self
    }

    /// An inline image referencing `word/media/{name}`.
    pub fn image(mut self, name: &str, data: Vec<u8>, alt: &str) -> Self {
        let rel_id = format!("rIdImg{}", self.images.len() + 1);
        self.body.push_str(&format!(
            r#"<w:p><w:r><w:drawing><wp:inline xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing"><wp:extent cx="1270000" cy="635000"/><wp:docPr id="1" name="Picture" descr="{alt}"/><a:graphic xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><a:graphicData><a:blip r:embed="{rel_id}"/></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"#,
        ));
        self.images.push((name.to_string(), data));
        self
    }

    /// An image whose relationship points at no part.
    pub fn dangling_image(mut self) -> Self {
        self.body.push_str(r#"<w:p><w:r><w:drawing><a:blip xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" r:embed="rIdMissing"/></w:drawing></w:r></w:p>"#);
        self
    }

    pub fn core(mut self, title: &str, creator: &str, created: &str) -> Self {
        self.core = Some(format!(
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/"><dc:title>{}</dc:title><dc:creator>{}</dc:creator><dcterms:created>{}</dcterms:created></cp:coreProperties>"#,
            title, creator, created
        ));
        self
    }

    fn ensure_numbering(&mut self) {
        if self.numbering.is_none() {
            self.numbering = Some(format!(
                r#"<w:numbering xmlns:w="{W_NS}"><w:abstractNum w:abstractNumId="0"><w:lvl w:ilvl="0"><w:numFmt w:val="bullet"/></w:lvl></w:abstractNum><w:abstractNum w:abstractNumId="1"><w:lvl w:ilvl="0"><w:numFmt w:val="decimal"/></w:lvl></w:abstractNum><w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num><w:num w:numId="2"><w:abstractNumId w:val="1"/></w:num></w:numbering>"#
            ));
        }
    }

    pub fn build(self) -> Vec<u8> {
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="{W_NS}" xmlns:r="{R_NS}"><w:body>{}<w:sectPr/></w:body></w:document>"#,
            self.body
        );

        let mut rels = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (idx, (name, _)) in self.images.iter().enumerate() {
            rels.push_str(&format!(
                r#"<Relationship Id="rIdImg{}" Type="{IMAGE_REL}" Target="media/{}"/>"#,
                idx + 1,
                name
            ));
        }
        rels.push_str("</Relationships>");

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        let mut put = |name: &str, data: &[u8]| {
            writer.start_file(name, options).unwrap();
            writer.write_all(data).unwrap();
        };
        put("word/document.xml", document.as_bytes());
        put("word/_rels/document.xml.rels", rels.as_bytes());
        if let Some(core) = &self.core {
            put("docProps/core.xml", core.as_bytes());
        }
        if let Some(numbering) = &self.numbering {
            put("word/numbering.xml", numbering.as_bytes());
        }
        for (name, data) in &self.images {
            put(&format!("word/media/{}", name), data);
        }
        writer.finish().unwrap().into_inner()
    }

    /// Write the package into `dir` and return its path.
    pub fn write_to(self, dir: &std::path::Path, name: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.build()).unwrap();
        path
    }
}

/// A solid PNG of the given size.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([0, 113, 227]));
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, image::ImageFormat::Png).unwrap();
    cursor.into_inner()
}

/// Text content of a part of a rendered package.
pub fn part_text(bytes: &[u8], name: &str) -> String {
    use std::io::Read;
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut text = String::new();
    file.read_to_string(&mut text).unwrap();
    text
}
