//! DOCX package access.
//!
//! The package is read once into memory: every part is kept as raw bytes,
//! and XML parts are parsed on demand by the lookups below.

use super::wml::{is_w, w_attr, w_child, w_children, w_val, CP_NS, DCTERMS_NS, DC_NS, PKG_REL_NS};
use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};
use crate::model::{DocumentMetadata, ListType};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

const DEFAULT_MAIN_PART: &str = "word/document.xml";
const DEFAULT_CORE_PART: &str = "docProps/core.xml";
const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const CORE_PROPERTIES_REL: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";

/// Number formats that make a list numbered; anything else is a bullet list.
const NUMBERED_FORMATS: [&str; 8] = [
    "decimal",
    "lowerLetter",
    "upperLetter",
    "lowerRoman",
    "upperRoman",
    "ordinal",
    "cardinalText",
    "ordinalText",
];

/// An opened `.docx` package.
#[derive(Debug)]
pub struct DocxPackage {
    parts: HashMap<String, Vec<u8>>,
    main_part: String,
}

impl DocxPackage {
    /// Open a package from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes(&data)
    }

    /// Open a package from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        detect_format_from_bytes(data)?;

        let mut archive = ZipArchive::new(Cursor::new(data))
            .map_err(|e| Error::Corrupted(format!("cannot open container: {}", e)))?;

        let mut parts = HashMap::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut entry = archive
                .by_index(index)
                .map_err(|e| Error::Corrupted(format!("unreadable entry #{}: {}", index, e)))?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().trim_start_matches('/').to_string();
            let mut buf = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut buf)?;
            parts.insert(name, buf);
        }

        let mut package = Self {
            parts,
            main_part: DEFAULT_MAIN_PART.to_string(),
        };
        if let Some(main) = package.package_target(OFFICE_DOCUMENT_REL)? {
            package.main_part = main;
        }
        if !package.has_part(&package.main_part) {
            return Err(Error::Corrupted(format!(
                "missing main document part '{}'",
                package.main_part
            )));
        }

        log::debug!(
            "Opened package: {} parts, main part '{}'",
            package.parts.len(),
            package.main_part
        );
        Ok(package)
    }

    /// Name of the main document part (usually `word/document.xml`).
    pub fn main_part_name(&self) -> &str {
        &self.main_part
    }

    /// Check whether a part exists.
    pub fn has_part(&self, name: &str) -> bool {
        self.parts.contains_key(name)
    }

    /// Raw bytes of a part.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts.get(name).map(Vec::as_slice)
    }

    /// Names of all parts, in no particular order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(String::as_str)
    }

    /// A part decoded as UTF-8 text with any byte-order mark removed.
    pub fn part_text(&self, name: &str) -> Result<Option<&str>> {
        match self.parts.get(name) {
            Some(bytes) => {
                let text = std::str::from_utf8(bytes)
                    .map_err(|e| Error::Corrupted(format!("part '{}' is not UTF-8: {}", name, e)))?;
                Ok(Some(text.trim_start_matches('\u{feff}')))
            }
            None => Ok(None),
        }
    }

    /// XML of the main document part.
    pub fn main_document(&self) -> Result<&str> {
        self.part_text(&self.main_part)?
            .ok_or_else(|| Error::Corrupted(format!("missing part '{}'", self.main_part)))
    }

    /// Relationships of a part (`word/document.xml` reads `word/_rels/document.xml.rels`).
    pub fn relationships(&self, part: &str) -> Result<Relationships> {
        let rels_path = rels_path_for(part);
        match self.part_text(&rels_path)? {
            Some(xml) => Relationships::parse(xml, part_dir(part)),
            None => Ok(Relationships::empty(part_dir(part))),
        }
    }

    /// Relationships of the main document part.
    pub fn document_relationships(&self) -> Result<Relationships> {
        self.relationships(&self.main_part)
    }

    /// Style catalog from `styles.xml` next to the main part.
    pub fn styles(&self) -> Result<StyleCatalog> {
        let path = sibling_part(&self.main_part, "styles.xml");
        match self.part_text(&path)? {
            Some(xml) => StyleCatalog::parse(xml),
            None => Ok(StyleCatalog::default()),
        }
    }

    /// Numbering catalog from `numbering.xml` next to the main part.
    pub fn numbering(&self) -> Result<NumberingCatalog> {
        let path = sibling_part(&self.main_part, "numbering.xml");
        match self.part_text(&path)? {
            Some(xml) => NumberingCatalog::parse(xml),
            None => Ok(NumberingCatalog::default()),
        }
    }

    /// Document metadata from the core properties part.
    ///
    /// The date is the creation date, falling back to the modification date.
    pub fn core_properties(&self) -> Result<DocumentMetadata> {
        let path = self
            .package_target(CORE_PROPERTIES_REL)?
            .unwrap_or_else(|| DEFAULT_CORE_PART.to_string());
        let Some(xml) = self.part_text(&path)? else {
            log::debug!("No core properties part");
            return Ok(DocumentMetadata::default());
        };

        let doc = roxmltree::Document::parse(xml)?;
        let root = doc.root_element();
        let field = |ns: &str, name: &str| -> Option<String> {
            root.children()
                .find(|n| n.is_element() && n.tag_name().name() == name && n.tag_name().namespace() == Some(ns))
                .and_then(|n| n.text())
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
        };

        let date = field(DCTERMS_NS, "created")
            .and_then(|d| format_core_date(&d))
            .or_else(|| field(DCTERMS_NS, "modified").and_then(|d| format_core_date(&d)));

        Ok(DocumentMetadata {
            title: field(DC_NS, "title"),
            author: field(DC_NS, "creator"),
            date,
            version: field(CP_NS, "version"),
            reference: None,
        })
    }

    /// Target of a package-level relationship of the given type.
    fn package_target(&self, rel_type: &str) -> Result<Option<String>> {
        let Some(xml) = self.part_text("_rels/.rels")? else {
            return Ok(None);
        };
        let rels = Relationships::parse(xml, "")?;
        Ok(rels.of_type(rel_type).and_then(|rel| rels.part_name(&rel.id)))
    }
}

/// Parse a core-property timestamp into `YYYY-MM-DD`.
fn format_core_date(value: &str) -> Option<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.format("%Y-%m-%d").to_string());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.format("%Y-%m-%d").to_string());
    }
    let date_part = value.get(..10).unwrap_or(value);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(d) => Some(d.format("%Y-%m-%d").to_string()),
        Err(_) => {
            log::debug!("Ignoring unparseable core date '{}'", value);
            None
        }
    }
}

/// Directory of a part name, without trailing slash.
fn part_dir(part: &str) -> &str {
    part.rfind('/').map(|i| &part[..i]).unwrap_or("")
}

fn sibling_part(part: &str, name: &str) -> String {
    match part_dir(part) {
        "" => name.to_string(),
        dir => format!("{}/{}", dir, name),
    }
}

fn rels_path_for(part: &str) -> String {
    let file = part.rsplit('/').next().unwrap_or(part);
    match part_dir(part) {
        "" => format!("_rels/{}.rels", file),
        dir => format!("{}/_rels/{}.rels", dir, file),
    }
}

/// Resolve a relationship target against the directory of its source part.
fn resolve_part_path(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// A single relationship entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship id (`rId7`)
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Raw target as written in the part
    pub target: String,
    /// Whether the target lives outside the package (hyperlinks)
    pub external: bool,
}

/// Relationships of one source part.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    by_id: HashMap<String, Relationship>,
    order: Vec<String>,
    base_dir: String,
}

impl Relationships {
    fn empty(base_dir: &str) -> Self {
        Self {
            base_dir: base_dir.to_string(),
            ..Default::default()
        }
    }

    /// Parse a `.rels` part.
    pub fn parse(xml: &str, base_dir: &str) -> Result<Self> {
        let doc = roxmltree::Document::parse(xml)?;
        let mut rels = Self::empty(base_dir);
        for node in doc.root_element().children().filter(|n| {
            n.is_element()
                && n.tag_name().name() == "Relationship"
                && n.tag_name().namespace() == Some(PKG_REL_NS)
        }) {
            let (Some(id), Some(target)) = (node.attribute("Id"), node.attribute("Target")) else {
                continue;
            };
            let rel = Relationship {
                id: id.to_string(),
                rel_type: node.attribute("Type").unwrap_or_default().to_string(),
                target: target.to_string(),
                external: node
                    .attribute("TargetMode")
                    .map(|m| m.eq_ignore_ascii_case("External"))
                    .unwrap_or(false),
            };
            rels.order.push(rel.id.clone());
            rels.by_id.insert(rel.id.clone(), rel);
        }
        Ok(rels)
    }

    /// Look up a relationship by id.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id)
    }

    /// Raw target of a relationship.
    pub fn target(&self, id: &str) -> Option<&str> {
        self.by_id.get(id).map(|r| r.target.as_str())
    }

    /// Package part name of an internal relationship target.
    pub fn part_name(&self, id: &str) -> Option<String> {
        self.by_id
            .get(id)
            .filter(|r| !r.external)
            .map(|r| resolve_part_path(&self.base_dir, &r.target))
    }

    /// First relationship of a given type, in document order.
    pub fn of_type(&self, rel_type: &str) -> Option<&Relationship> {
        self.order
            .iter()
            .filter_map(|id| self.by_id.get(id))
            .find(|r| r.rel_type == rel_type)
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Check if there are no relationships.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// A paragraph style definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleInfo {
    /// Style id (`Heading1`)
    pub id: String,
    /// Display name (`heading 1`)
    pub name: Option<String>,
    /// Outline level declared on the style's paragraph properties
    pub outline_level: Option<u32>,
}

/// Style definitions keyed by style id.
#[derive(Debug, Clone, Default)]
pub struct StyleCatalog {
    styles: HashMap<String, StyleInfo>,
}

impl StyleCatalog {
    /// Parse `styles.xml`.
    pub fn parse(xml: &str) -> Result<Self> {
        let doc = roxmltree::Document::parse(xml)?;
        let mut catalog = Self::default();
        for style in w_children(doc.root_element(), "style") {
            let Some(id) = w_attr(style, "styleId") else {
                continue;
            };
            let outline_level = w_child(style, "pPr")
                .and_then(|ppr| w_val(ppr, "outlineLvl"))
                .and_then(|v| v.parse().ok());
            catalog.styles.insert(
                id.to_string(),
                StyleInfo {
                    id: id.to_string(),
                    name: w_val(style, "name").map(str::to_string),
                    outline_level,
                },
            );
        }
        Ok(catalog)
    }

    /// Look up a style by id.
    pub fn get(&self, id: &str) -> Option<&StyleInfo> {
        self.styles.get(id)
    }

    /// Number of styles.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

/// Level-0 number formats keyed by `numId`.
#[derive(Debug, Clone, Default)]
pub struct NumberingCatalog {
    formats: HashMap<String, String>,
}

impl NumberingCatalog {
    /// Parse `numbering.xml`.
    pub fn parse(xml: &str) -> Result<Self> {
        let doc = roxmltree::Document::parse(xml)?;
        let root = doc.root_element();

        let mut abstract_formats: HashMap<&str, &str> = HashMap::new();
        for abs in w_children(root, "abstractNum") {
            let Some(abs_id) = w_attr(abs, "abstractNumId") else {
                continue;
            };
            let level_zero = w_children(abs, "lvl").find(|lvl| w_attr(*lvl, "ilvl") == Some("0"));
            if let Some(fmt) = level_zero.and_then(|lvl| w_val(lvl, "numFmt")) {
                abstract_formats.insert(abs_id, fmt);
            }
        }

        let mut formats = HashMap::new();
        for num in root.children().filter(|n| is_w(*n, "num")) {
            let Some(num_id) = w_attr(num, "numId") else {
                continue;
            };
            let format = w_val(num, "abstractNumId").and_then(|abs| abstract_formats.get(abs));
            if let Some(format) = format {
                formats.insert(num_id.to_string(), (*format).to_string());
            }
        }
        Ok(Self { formats })
    }

    /// Level-0 number format of a numbering instance.
    pub fn format(&self, num_id: &str) -> Option<&str> {
        self.formats.get(num_id).map(String::as_str)
    }

    /// List kind of a numbering instance; unknown instances are bullets.
    pub fn list_type(&self, num_id: &str) -> ListType {
        match self.format(num_id) {
            Some(fmt) if NUMBERED_FORMATS.contains(&fmt) => ListType::Numbered,
            _ => ListType::Bullet,
        }
    }
}
