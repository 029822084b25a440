//! DOCX document parser.

use std::io::Read;
use std::path::Path;

use crate::detect::check_input_path;
use crate::error::Result;
use crate::model::DocumentTree;

use super::extractor::{Extractor, RawElement};
use super::options::ParseOptions;
use super::package::DocxPackage;
use super::tree_builder::TreeBuilder;

/// DOCX document parser.
pub struct DocxParser {
    package: DocxPackage,
    options: ParseOptions,
}

impl DocxParser {
    /// Open a DOCX file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a DOCX file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();

        // Existence and extension first, container second
        check_input_path(path)?;
        log::info!("Parsing document: {}", path.display());

        let package = DocxPackage::open(path)?;
        Ok(Self { package, options })
    }

    /// Parse a DOCX from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a DOCX from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let package = DocxPackage::from_bytes(data)?;
        Ok(Self { package, options })
    }

    /// Parse a DOCX from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Parse a DOCX from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// The underlying package.
    pub fn package(&self) -> &DocxPackage {
        &self.package
    }

    /// Flat extractor records, before tree building.
    pub fn extract(&self) -> Result<Vec<RawElement>> {
        Extractor::new(&self.package, &self.options)?.extract()
    }

    /// Parse the document into a tree (no structure detection).
    pub fn parse(&self) -> Result<DocumentTree> {
        let metadata = self.package.core_properties()?;
        let elements = self.extract()?;
        let tree = TreeBuilder::new()
            .with_title_inference(self.options.infer_title)
            .build(metadata, elements);
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn docx(body: &str) -> Vec<u8> {
        let document = format!(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><w:body>{}</w:body></w:document>"#,
            body
        );
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(document.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_parse_sections_and_preamble() {
        let data = docx(
            r#"<w:p><w:r><w:t>Before</w:t></w:r></w:p>
               <w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Intro</w:t></w:r></w:p>
               <w:p><w:r><w:t>Body</w:t></w:r></w:p>
               <w:p/>
               <w:sectPr/>"#,
        );
        let tree = DocxParser::from_bytes(&data).unwrap().parse().unwrap();
        assert_eq!(tree.preamble.len(), 1);
        assert_eq!(tree.sections.len(), 1);
        assert_eq!(tree.sections[0].heading, "Intro");
        assert_eq!(tree.sections[0].children.len(), 1);
        assert_eq!(tree.metadata.title.as_deref(), Some("Intro"));
    }

    #[test]
    fn test_structured_document_tags_are_walked() {
        let data = docx(
            r#"<w:sdt><w:sdtContent><w:p><w:r><w:t>Inside</w:t></w:r></w:p></w:sdtContent></w:sdt>"#,
        );
        let records = DocxParser::from_bytes(&data).unwrap().extract().unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_page_break_precedes_paragraph() {
        let data = docx(r#"<w:p><w:r><w:br w:type="page"/></w:r><w:r><w:t>Next</w:t></w:r></w:p>"#);
        let records = DocxParser::from_bytes(&data).unwrap().extract().unwrap();
        assert!(matches!(records[0], RawElement::PageBreak));
        assert!(matches!(records[1], RawElement::Paragraph(_)));
    }

    #[test]
    fn test_missing_image_lenient_and_strict() {
        let body = r#"<w:p><w:r><w:drawing><a:blip xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" r:embed="rId9"/></w:drawing></w:r></w:p>"#;
        let data = docx(body);

        let records = DocxParser::from_bytes(&data).unwrap().extract().unwrap();
        assert!(records.is_empty());

        let strict = DocxParser::from_bytes_with_options(&data, ParseOptions::new().strict()).unwrap();
        assert!(matches!(strict.extract(), Err(Error::ResourceNotFound(_))));
    }

    #[test]
    fn test_open_rejects_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();
        assert!(matches!(DocxParser::open(&path), Err(Error::UnsupportedFormat(_))));

        let missing = dir.path().join("missing.docx");
        assert!(matches!(DocxParser::open(&missing), Err(Error::FileNotFound(_))));
    }

    #[test]
    fn test_table_first_row_is_header() {
        let data = docx(
            r#"<w:tbl>
                 <w:tr><w:tc><w:p><w:r><w:rPr><w:b/></w:rPr><w:t>Name</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>Age</w:t></w:r></w:p></w:tc></w:tr>
                 <w:tr><w:tc><w:p><w:r><w:t> Alice </w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>30</w:t></w:r></w:p></w:tc></w:tr>
               </w:tbl>"#,
        );
        let records = DocxParser::from_bytes(&data).unwrap().extract().unwrap();
        let RawElement::Table(table) = &records[0] else {
            panic!("expected a table");
        };
        assert_eq!(table.headers, vec!["Name", "Age"]);
        assert_eq!(table.rows, vec![vec!["Alice".to_string(), "30".to_string()]]);
        assert!(table.header_runs[0][0].bold);
        assert_eq!(table.cell_runs[0][0][0].text, " Alice ");
    }
}
