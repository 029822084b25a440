//! DOCX package writer.
//!
//! Collects the body, header, footer and embedded media of a document and
//! serializes them into a WordprocessingML ZIP container.

use super::xml::{ParagraphXml, TableXml};
use crate::error::{Error, Result};
use crate::style::PageConfig;
use image::{ImageFormat, ImageReader};
use quick_xml::escape::escape;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const WP_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const A_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const PIC_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";

const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
const REL_HYPERLINK: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
const REL_HEADER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
const REL_FOOTER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";

/// Distance of header and footer from the page edge, in DXA.
const HEADER_FOOTER_DISTANCE: u32 = 720;

/// An image stored in the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    /// Relationship id referenced by the drawing
    pub rel_id: String,
    /// Unique drawing object id
    pub id: usize,
    /// Part name under `word/media/`
    pub name: String,
    /// Native pixel size, when the payload could be decoded
    pub pixels: Option<(u32, u32)>,
}

#[derive(Debug, Clone)]
struct Relationship {
    id: String,
    rel_type: &'static str,
    target: String,
    external: bool,
}

/// Document-wide formatting defaults written to the styles part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDefaults {
    /// Body font family
    pub body_font: String,
    /// Heading font family
    pub display_font: String,
    /// Body size in half-points
    pub body_size: u32,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            body_font: "Arial".to_string(),
            display_font: "Arial".to_string(),
            body_size: 21,
        }
    }
}

/// Builds a `.docx` package in memory.
#[derive(Debug)]
pub struct DocxWriter {
    page: PageConfig,
    defaults: StyleDefaults,
    title: Option<String>,
    author: Option<String>,
    body: String,
    header: Option<String>,
    footer: Option<String>,
    title_page: bool,
    relationships: Vec<Relationship>,
    hyperlinks: HashMap<String, String>,
    media: Vec<(String, Vec<u8>)>,
    next_drawing_id: usize,
}

impl DocxWriter {
    /// Create an empty document with the given page geometry.
    pub fn new(page: PageConfig) -> Self {
        Self {
            page,
            defaults: StyleDefaults::default(),
            title: None,
            author: None,
            body: String::new(),
            header: None,
            footer: None,
            title_page: false,
            relationships: Vec::new(),
            hyperlinks: HashMap::new(),
            media: Vec::new(),
            next_drawing_id: 1,
        }
    }

    /// Set the formatting defaults of the styles part.
    pub fn set_defaults(&mut self, defaults: StyleDefaults) {
        self.defaults = defaults;
    }

    /// Set the core properties.
    pub fn set_properties(&mut self, title: Option<&str>, author: Option<&str>) {
        self.title = title.filter(|t| !t.is_empty()).map(str::to_string);
        self.author = author.filter(|a| !a.is_empty()).map(str::to_string);
    }

    /// Suppress the running header and footer on the first page.
    pub fn set_title_page(&mut self, title_page: bool) {
        self.title_page = title_page;
    }

    /// Page geometry of the document.
    pub fn page(&self) -> &PageConfig {
        &self.page
    }

    /// Append a paragraph to the body.
    pub fn push_paragraph(&mut self, paragraph: &ParagraphXml) {
        paragraph.to_xml(&mut self.body);
    }

    /// Append a table to the body.
    pub fn push_table(&mut self, table: &TableXml) {
        table.to_xml(&mut self.body);
    }

    /// Replace the default header content.
    pub fn set_header(&mut self, paragraphs: &[ParagraphXml]) {
        self.header = Some(part_content(paragraphs));
    }

    /// Replace the default footer content.
    pub fn set_footer(&mut self, paragraphs: &[ParagraphXml]) {
        self.footer = Some(part_content(paragraphs));
    }

    /// Whether the body is still empty.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Store an image in the package.
    ///
    /// The format is sniffed from the payload; payloads that are not PNG,
    /// JPEG, GIF or BMP are rejected.
    pub fn add_image(&mut self, data: &[u8]) -> Result<EmbeddedImage> {
        let format = image::guess_format(data)
            .map_err(|e| Error::Render(format!("Unrecognized image data: {}", e)))?;
        let extension = match format {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
            ImageFormat::Bmp => "bmp",
            other => {
                return Err(Error::Render(format!(
                    "Unsupported image format: {:?}",
                    other
                )))
            }
        };
        let pixels = ImageReader::with_format(Cursor::new(data), format)
            .into_dimensions()
            .map_err(|e| log::debug!("Could not read image dimensions: {}", e))
            .ok();

        let id = self.next_drawing_id;
        self.next_drawing_id += 1;
        let name = format!("image{}.{}", self.media.len() + 1, extension);
        let rel_id = self.add_relationship(REL_IMAGE, format!("media/{}", name), false);
        self.media.push((name.clone(), data.to_vec()));

        Ok(EmbeddedImage {
            rel_id,
            id,
            name,
            pixels,
        })
    }

    /// Relationship id of an external hyperlink, reused per target.
    pub fn add_hyperlink(&mut self, target: &str) -> String {
        if let Some(id) = self.hyperlinks.get(target) {
            return id.clone();
        }
        let id = self.add_relationship(REL_HYPERLINK, target.to_string(), true);
        self.hyperlinks.insert(target.to_string(), id.clone());
        id
    }

    fn add_relationship(&mut self, rel_type: &'static str, target: String, external: bool) -> String {
        // rId1 and rId2 are the styles and settings parts.
        let id = format!("rId{}", self.relationships.len() + 3);
        self.relationships.push(Relationship {
            id: id.clone(),
            rel_type,
            target,
            external,
        });
        id
    }

    /// Serialize the package.
    pub fn to_bytes(mut self) -> Result<Vec<u8>> {
        let header_rel = self
            .header
            .is_some()
            .then(|| self.add_relationship(REL_HEADER, "header1.xml".to_string(), false));
        let footer_rel = self
            .footer
            .is_some()
            .then(|| self.add_relationship(REL_FOOTER, "footer1.xml".to_string(), false));

        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        fn put(
            zip: &mut ZipWriter<Cursor<Vec<u8>>>,
            options: SimpleFileOptions,
            name: &str,
            data: &[u8],
        ) -> Result<()> {
            zip.start_file(name, options)?;
            zip.write_all(data)?;
            Ok(())
        }

        put(&mut zip, options, "[Content_Types].xml", self.content_types().as_bytes())?;
        put(&mut zip, options, "_rels/.rels", PACKAGE_RELS.as_bytes())?;
        put(&mut zip, options, "docProps/core.xml", self.core_properties().as_bytes())?;
        put(&mut zip, options, "docProps/app.xml", APP_PROPERTIES.as_bytes())?;
        put(
            &mut zip,
            options,
            "word/document.xml",
            self.document(header_rel.as_deref(), footer_rel.as_deref())
                .as_bytes(),
        )?;
        put(&mut zip, options, "word/styles.xml", self.styles().as_bytes())?;
        put(&mut zip, options, "word/settings.xml", SETTINGS.as_bytes())?;
        put(
            &mut zip,
            options,
            "word/_rels/document.xml.rels",
            self.document_rels().as_bytes(),
        )?;
        if let Some(header) = &self.header {
            put(&mut zip, options, "word/header1.xml", wrap_part("w:hdr", header).as_bytes())?;
        }
        if let Some(footer) = &self.footer {
            put(&mut zip, options, "word/footer1.xml", wrap_part("w:ftr", footer).as_bytes())?;
        }
        for (name, data) in &self.media {
            put(&mut zip, options, &format!("word/media/{}", name), data)?;
        }

        Ok(zip.finish()?.into_inner())
    }

    /// Serialize the package to a file.
    pub fn save(self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn content_types(&self) -> String {
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
             <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
             <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
             <Default Extension=\"xml\" ContentType=\"application/xml\"/>",
        );
        let mut extensions: Vec<&str> = self
            .media
            .iter()
            .filter_map(|(name, _)| name.rsplit_once('.').map(|(_, ext)| ext))
            .collect();
        extensions.sort_unstable();
        extensions.dedup();
        for ext in extensions {
            let _ = write!(
                xml,
                "<Default Extension=\"{}\" ContentType=\"image/{}\"/>",
                ext, ext
            );
        }
        let overrides = [
            ("/word/document.xml", "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"),
            ("/word/styles.xml", "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"),
            ("/word/settings.xml", "application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml"),
            ("/docProps/core.xml", "application/vnd.openxmlformats-package.core-properties+xml"),
            ("/docProps/app.xml", "application/vnd.openxmlformats-officedocument.extended-properties+xml"),
        ];
        for (part, content_type) in overrides {
            let _ = write!(
                xml,
                "<Override PartName=\"{}\" ContentType=\"{}\"/>",
                part, content_type
            );
        }
        if self.header.is_some() {
            xml.push_str("<Override PartName=\"/word/header1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml\"/>");
        }
        if self.footer.is_some() {
            xml.push_str("<Override PartName=\"/word/footer1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml\"/>");
        }
        xml.push_str("</Types>");
        xml
    }

    fn core_properties(&self) -> String {
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
             <cp:coreProperties xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
             xmlns:dc=\"http://purl.org/dc/elements/1.1/\" xmlns:dcterms=\"http://purl.org/dc/terms/\" \
             xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">",
        );
        if let Some(title) = &self.title {
            let _ = write!(xml, "<dc:title>{}</dc:title>", escape(title.as_str()));
        }
        if let Some(author) = &self.author {
            let _ = write!(xml, "<dc:creator>{}</dc:creator>", escape(author.as_str()));
        }
        let now = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        let _ = write!(
            xml,
            "<dcterms:created xsi:type=\"dcterms:W3CDTF\">{0}</dcterms:created>\
             <dcterms:modified xsi:type=\"dcterms:W3CDTF\">{0}</dcterms:modified>",
            now
        );
        xml.push_str("</cp:coreProperties>");
        xml
    }

    fn document(&self, header_rel: Option<&str>, footer_rel: Option<&str>) -> String {
        let mut xml = String::with_capacity(self.body.len() + 1024);
        let _ = write!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
             <w:document xmlns:w=\"{}\" xmlns:r=\"{}\" xmlns:wp=\"{}\" xmlns:a=\"{}\" xmlns:pic=\"{}\"><w:body>",
            W_NS, R_NS, WP_NS, A_NS, PIC_NS
        );
        xml.push_str(&self.body);
        xml.push_str("<w:sectPr>");
        if let Some(id) = header_rel {
            let _ = write!(xml, "<w:headerReference w:type=\"default\" r:id=\"{}\"/>", id);
        }
        if let Some(id) = footer_rel {
            let _ = write!(xml, "<w:footerReference w:type=\"default\" r:id=\"{}\"/>", id);
        }
        let margins = &self.page.margins;
        let _ = write!(
            xml,
            "<w:pgSz w:w=\"{}\" w:h=\"{}\"/>\
             <w:pgMar w:top=\"{}\" w:right=\"{}\" w:bottom=\"{}\" w:left=\"{}\" w:header=\"{}\" w:footer=\"{}\" w:gutter=\"0\"/>",
            self.page.width,
            self.page.height,
            margins.top,
            margins.right,
            margins.bottom,
            margins.left,
            HEADER_FOOTER_DISTANCE,
            HEADER_FOOTER_DISTANCE
        );
        if self.title_page {
            xml.push_str("<w:titlePg/>");
        }
        xml.push_str("</w:sectPr></w:body></w:document>");
        xml
    }

    fn styles(&self) -> String {
        let body_font = escape(self.defaults.body_font.as_str());
        let display_font = escape(self.defaults.display_font.as_str());
        let mut xml = String::new();
        let _ = write!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
             <w:styles xmlns:w=\"{ns}\">\
             <w:docDefaults><w:rPrDefault><w:rPr>\
             <w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\" w:cs=\"{font}\"/>\
             <w:sz w:val=\"{size}\"/><w:szCs w:val=\"{size}\"/>\
             </w:rPr></w:rPrDefault>\
             <w:pPrDefault><w:pPr><w:spacing w:after=\"0\"/></w:pPr></w:pPrDefault>\
             </w:docDefaults>\
             <w:style w:type=\"paragraph\" w:default=\"1\" w:styleId=\"Normal\"><w:name w:val=\"Normal\"/><w:qFormat/></w:style>",
            ns = W_NS,
            font = body_font,
            size = self.defaults.body_size
        );
        for level in 1..=3 {
            let _ = write!(
                xml,
                "<w:style w:type=\"paragraph\" w:styleId=\"Heading{n}\">\
                 <w:name w:val=\"heading {n}\"/><w:basedOn w:val=\"Normal\"/><w:next w:val=\"Normal\"/><w:qFormat/>\
                 <w:pPr><w:keepNext/><w:outlineLvl w:val=\"{lvl}\"/></w:pPr>\
                 <w:rPr><w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\" w:cs=\"{font}\"/><w:b/></w:rPr>\
                 </w:style>",
                n = level,
                lvl = level - 1,
                font = display_font
            );
        }
        xml.push_str(
            "<w:style w:type=\"character\" w:styleId=\"Hyperlink\"><w:name w:val=\"Hyperlink\"/><w:rPr><w:u w:val=\"single\"/></w:rPr></w:style>\
             <w:style w:type=\"table\" w:default=\"1\" w:styleId=\"TableNormal\"><w:name w:val=\"Normal Table\"/>\
             <w:tblPr><w:tblInd w:w=\"0\" w:type=\"dxa\"/><w:tblCellMar><w:top w:w=\"0\" w:type=\"dxa\"/>\
             <w:left w:w=\"108\" w:type=\"dxa\"/><w:bottom w:w=\"0\" w:type=\"dxa\"/><w:right w:w=\"108\" w:type=\"dxa\"/>\
             </w:tblCellMar></w:tblPr></w:style>",
        );
        xml.push_str("</w:styles>");
        xml
    }

    fn document_rels(&self) -> String {
        let mut xml = String::new();
        let _ = write!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
             <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
             <Relationship Id=\"rId1\" Type=\"{base}/styles\" Target=\"styles.xml\"/>\
             <Relationship Id=\"rId2\" Type=\"{base}/settings\" Target=\"settings.xml\"/>",
            base = REL_BASE
        );
        for rel in &self.relationships {
            let _ = write!(
                xml,
                "<Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"{}/>",
                rel.id,
                rel.rel_type,
                escape(rel.target.as_str()),
                if rel.external {
                    " TargetMode=\"External\""
                } else {
                    ""
                }
            );
        }
        xml.push_str("</Relationships>");
        xml
    }
}

/// Encode a blank PNG of the given size.
#[cfg(test)]
pub(crate) fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    image::RgbImage::new(width, height)
        .write_to(&mut bytes, ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

fn part_content(paragraphs: &[ParagraphXml]) -> String {
    let mut xml = String::new();
    for paragraph in paragraphs {
        paragraph.to_xml(&mut xml);
    }
    if xml.is_empty() {
        ParagraphXml::new().to_xml(&mut xml);
    }
    xml
}

fn wrap_part(root: &str, content: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<{root} xmlns:w=\"{w}\" xmlns:r=\"{r}\">{content}</{root}>",
        root = root,
        w = W_NS,
        r = R_NS,
        content = content
    )
}

const PACKAGE_RELS: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"word/document.xml\"/>\
<Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties\" Target=\"docProps/core.xml\"/>\
<Relationship Id=\"rId3\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties\" Target=\"docProps/app.xml\"/>\
</Relationships>";

const APP_PROPERTIES: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
<Properties xmlns=\"http://schemas.openxmlformats.org/officeDocument/2006/extended-properties\">\
<Application>docstyle</Application></Properties>";

const SETTINGS: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
<w:settings xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
<w:defaultTabStop w:val=\"720\"/><w:characterSpacingControl w:val=\"doNotCompress\"/>\
<w:compat><w:compatSetting w:name=\"compatibilityMode\" w:uri=\"http://schemas.microsoft.com/office/word\" w:val=\"15\"/></w:compat>\
</w:settings>";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::xml::RunProps;
    use std::io::Read;
    use zip::ZipArchive;

    fn read_part(bytes: &[u8], name: &str) -> Option<String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).ok()?;
        let mut text = String::new();
        file.read_to_string(&mut text).unwrap();
        Some(text)
    }

    #[test]
    fn test_minimal_package() {
        let mut writer = DocxWriter::new(PageConfig::default());
        writer.set_properties(Some("Guide & Co"), None);
        writer.push_paragraph(&ParagraphXml::new().run("Hello", RunProps::new()));
        let bytes = writer.to_bytes().unwrap();

        let document = read_part(&bytes, "word/document.xml").unwrap();
        assert!(document.contains(">Hello</w:t>"));
        assert!(document.contains("<w:pgSz w:w=\"12240\" w:h=\"15840\"/>"));
        assert!(!document.contains("titlePg"));
        assert!(!document.contains("headerReference"));

        let core = read_part(&bytes, "docProps/core.xml").unwrap();
        assert!(core.contains("<dc:title>Guide &amp; Co</dc:title>"));
        assert!(!core.contains("dc:creator"));

        let styles = read_part(&bytes, "word/styles.xml").unwrap();
        assert!(styles.contains("w:styleId=\"Heading2\""));
        assert!(styles.contains("<w:outlineLvl w:val=\"1\"/>"));
        assert!(read_part(&bytes, "word/header1.xml").is_none());
    }

    #[test]
    fn test_header_footer_parts() {
        let mut writer = DocxWriter::new(PageConfig::default());
        writer.set_title_page(true);
        writer.set_header(&[ParagraphXml::new().run("Top", RunProps::new())]);
        writer.set_footer(&[]);
        let bytes = writer.to_bytes().unwrap();

        let document = read_part(&bytes, "word/document.xml").unwrap();
        assert!(document.contains("<w:headerReference w:type=\"default\" r:id=\"rId3\"/>"));
        assert!(document.contains("<w:footerReference w:type=\"default\" r:id=\"rId4\"/>"));
        assert!(document.contains("<w:titlePg/>"));

        let header = read_part(&bytes, "word/header1.xml").unwrap();
        assert!(header.contains("<w:hdr"));
        assert!(header.contains(">Top</w:t>"));
        let footer = read_part(&bytes, "word/footer1.xml").unwrap();
        assert!(footer.contains("<w:p></w:p>"));

        let types = read_part(&bytes, "[Content_Types].xml").unwrap();
        assert!(types.contains("/word/footer1.xml"));
    }

    #[test]
    fn test_add_image() {
        let mut writer = DocxWriter::new(PageConfig::default());
        let image = writer.add_image(&sample_png(1, 1)).unwrap();
        assert_eq!(image.rel_id, "rId3");
        assert_eq!(image.name, "image1.png");
        assert_eq!(image.pixels, Some((1, 1)));

        let bytes = writer.to_bytes().unwrap();
        let rels = read_part(&bytes, "word/_rels/document.xml.rels").unwrap();
        assert!(rels.contains("Target=\"media/image1.png\""));
        let types = read_part(&bytes, "[Content_Types].xml").unwrap();
        assert!(types.contains("Extension=\"png\" ContentType=\"image/png\""));
    }

    #[test]
    fn test_add_image_rejects_garbage() {
        let mut writer = DocxWriter::new(PageConfig::default());
        assert!(matches!(writer.add_image(b"not an image"), Err(Error::Render(_))));
    }

    #[test]
    fn test_hyperlinks_are_shared() {
        let mut writer = DocxWriter::new(PageConfig::default());
        let first = writer.add_hyperlink("https://example.com/?a=1&b=2");
        let second = writer.add_hyperlink("https://example.com/?a=1&b=2");
        assert_eq!(first, second);

        let bytes = writer.to_bytes().unwrap();
        let rels = read_part(&bytes, "word/_rels/document.xml.rels").unwrap();
        assert!(rels.contains("a=1&amp;b=2\" TargetMode=\"External\""));
    }
}
