//! End-to-end tests for parse, detect and render.

mod common;

use common::{png, DocxFixture};
use docstyle::{
    detect_structure, parse_bytes, parse_bytes_with_options, parse_file, transform_file,
    CalloutType, ContentElement, DocStyle, Error, ListType, ParseOptions, RenderOptions,
};

fn manual() -> DocxFixture {
    DocxFixture::new()
        .core("Guide technique : Architecture Cloud", "Équipe Plateforme", "2024-03-15T09:30:00Z")
        .para("Ce document décrit le déploiement.")
        .heading(1, "Installation")
        .para("Warning: do not proceed")
        .para("Step 1: Configure")
        .para("Description one.")
        .para("Step 2: Deploy")
        .para("Description two.")
        .heading(2, "Prérequis")
        .list_item(1, 0, "Un compte")
        .list_item(1, 1, "Avec les droits")
        .list_item(1, 0, "Un terminal")
        .table(&[&["Some important note."]])
        .heading(1, "Exploitation")
        .table(&[&["Service", "Port"], &["api", "8080"], &["web", "443"]])
        .page_break()
        .para("Fin.")
}

#[test]
fn test_tree_without_headings_is_all_preamble() {
    let data = DocxFixture::new().para("Un").para("Deux").build();
    let tree = parse_bytes(&data).unwrap();
    assert!(tree.sections.is_empty());
    assert_eq!(tree.preamble.len(), 2);
}

#[test]
fn test_metadata_from_core_properties() {
    let tree = parse_bytes(&manual().build()).unwrap();
    assert_eq!(
        tree.metadata.title.as_deref(),
        Some("Guide technique : Architecture Cloud")
    );
    assert_eq!(tree.metadata.author.as_deref(), Some("Équipe Plateforme"));
    assert_eq!(tree.metadata.date.as_deref(), Some("2024-03-15"));
}

#[test]
fn test_sections_and_numbering() {
    let tree = detect_structure(parse_bytes(&manual().build()).unwrap());
    let headings: Vec<(&str, u32, Option<u32>)> = tree
        .sections
        .iter()
        .map(|s| (s.heading.as_str(), s.level, s.number))
        .collect();
    assert_eq!(
        headings,
        vec![
            ("Installation", 1, Some(1)),
            ("Prérequis", 2, None),
            ("Exploitation", 1, Some(2)),
        ]
    );
    assert_eq!(tree.preamble.len(), 1);
}

#[test]
fn test_detected_callouts_and_steps() {
    let tree = detect_structure(parse_bytes(&manual().build()).unwrap());

    let install = &tree.sections[0].children;
    let ContentElement::Callout(warning) = &install[0] else {
        panic!("expected a callout, got {:?}", install[0]);
    };
    assert_eq!(warning.callout_type, CalloutType::Warning);
    assert_eq!(warning.body, "do not proceed");

    let ContentElement::Steps(block) = &install[1] else {
        panic!("expected steps, got {:?}", install[1]);
    };
    assert_eq!(block.steps.len(), 2);
    assert_eq!(block.steps[0].title, "Configure");
    assert_eq!(block.steps[1].description, "Description two.");

    let prereq = &tree.sections[1].children;
    let single_cell = prereq
        .iter()
        .find_map(|e| match e {
            ContentElement::Callout(c) => Some(c),
            _ => None,
        })
        .unwrap();
    assert_eq!(single_cell.callout_type, CalloutType::Info);
    assert!(single_cell.title.is_empty());
    assert_eq!(single_cell.body, "Some important note.");
}

#[test]
fn test_list_nesting() {
    let tree = parse_bytes(&manual().build()).unwrap();
    let ContentElement::List(list) = &tree.sections[1].children[0] else {
        panic!("expected a list");
    };
    assert_eq!(list.list_type, ListType::Bullet);
    assert_eq!(list.items.len(), 2);
    assert_eq!(list.items[0].children.len(), 1);
    assert_eq!(list.items[0].children[0].text(), "Avec les droits");
    assert_eq!(list.total_items(), 3);
}

#[test]
fn test_numbered_list_splits_from_bullets() {
    let data = DocxFixture::new()
        .list_item(1, 0, "a")
        .list_item(2, 0, "b")
        .list_item(2, 0, "c")
        .build();
    let tree = parse_bytes(&data).unwrap();
    let kinds: Vec<ListType> = tree
        .preamble
        .iter()
        .filter_map(|e| match e {
            ContentElement::List(l) => Some(l.list_type),
            _ => None,
        })
        .collect();
    assert_eq!(kinds, vec![ListType::Bullet, ListType::Numbered]);
}

#[test]
fn test_images_are_extracted() {
    let data = DocxFixture::new()
        .image("image1.png", png(40, 20), "Schéma réseau")
        .build();
    let tree = parse_bytes(&data).unwrap();
    let ContentElement::Image(image) = &tree.preamble[0] else {
        panic!("expected an image");
    };
    assert_eq!(image.filename, "image1.png");
    assert_eq!(image.alt_text, "Schéma réseau");
    assert_eq!(image.width, Some(2000));
    assert_eq!(image.height, Some(1000));
    assert!(!image.data.is_empty());
}

#[test]
fn test_missing_image_strict_and_lenient() {
    let data = DocxFixture::new().para("Avant").dangling_image().build();

    let lenient = parse_bytes_with_options(&data, ParseOptions::new().lenient()).unwrap();
    assert_eq!(lenient.summary().images, 0);

    let strict = parse_bytes_with_options(&data, ParseOptions::new().strict());
    assert!(matches!(strict, Err(Error::ResourceNotFound(_))));
}

#[test]
fn test_transform_writes_styled_document() {
    let dir = tempfile::tempdir().unwrap();
    let input = manual().write_to(dir.path(), "manual.docx");
    let output = dir.path().join("styled/manual_transformed.docx");

    let result = transform_file(&input, &output, &RenderOptions::default()).unwrap();
    assert!(result.output.exists());
    assert_eq!(result.summary.sections, 3);
    assert_eq!(result.summary.callouts, 2);
    assert_eq!(result.summary.steps_blocks, 1);
    assert_eq!(result.stats.heading_count, 3);
    assert_eq!(result.stats.table_count, 1);
    assert_eq!(result.stats.step_count, 2);
    assert_eq!(result.stats.list_item_count, 3);
    assert_eq!(result.stats.toc_entries, 3);
    assert!(result.stats.cover);

    let bytes = std::fs::read(&result.output).unwrap();
    let document = common::part_text(&bytes, "word/document.xml");
    assert!(document.contains(">Guide technique</w:t>"));
    assert!(document.contains(">Architecture Cloud</w:t>"));
    assert!(document.contains("Section 01"));
    assert!(document.contains("<w:pStyle w:val=\"Heading2\"/>"));
    let header = common::part_text(&bytes, "word/header1.xml");
    assert!(header.contains("Guide technique : Architecture Cloud"));
}

#[test]
fn test_transform_output_parses_back() {
    let dir = tempfile::tempdir().unwrap();
    let input = manual().write_to(dir.path(), "manual.docx");
    let output = dir.path().join("out.docx");
    DocStyle::new()
        .with_cover(false)
        .with_toc(false)
        .transform(&input, &output)
        .unwrap();

    let tree = parse_file(&output).unwrap();
    // Large bold step numbers also read back as headings.
    let expected = ["Installation", "Prérequis", "Exploitation"];
    let headings: Vec<&str> = tree
        .sections
        .iter()
        .map(|s| s.heading.as_str())
        .filter(|h| expected.contains(h))
        .collect();
    assert_eq!(headings, expected);
    let text = tree.plain_text();
    assert!(text.contains("Description two."));
    assert!(text.contains("8080"));
}

#[test]
fn test_transform_with_theme() {
    let dir = tempfile::tempdir().unwrap();
    let input = manual().write_to(dir.path(), "manual.docx");
    let theme = dir.path().join("theme.yaml");
    std::fs::write(
        &theme,
        "colors:\n  accent_blue: \"#C0392B\"\nheader_footer:\n  footer:\n    left_text: Interne\n",
    )
    .unwrap();

    let result = DocStyle::new()
        .with_theme(&theme)
        .unwrap()
        .transform(&input, dir.path().join("themed.docx"))
        .unwrap();
    let bytes = std::fs::read(&result.output).unwrap();
    assert!(common::part_text(&bytes, "word/document.xml").contains("C0392B"));
    assert!(common::part_text(&bytes, "word/footer1.xml").contains(">Interne</w:t>"));
}

#[test]
fn test_transform_rejects_non_docx() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    std::fs::write(&input, "plain text").unwrap();
    let result = transform_file(&input, dir.path().join("out.docx"), &RenderOptions::default());
    assert!(matches!(result, Err(Error::UnsupportedFormat(_))));

    let fake = dir.path().join("fake.docx");
    std::fs::write(&fake, "plain text").unwrap();
    let result = transform_file(&fake, dir.path().join("out.docx"), &RenderOptions::default());
    assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
}
