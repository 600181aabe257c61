//! Whole-document conversions through the format registry.

use crate::common::{decode, encode, image_block, paragraph};
use dast_babel::{EditorNode, FormatRegistry, Mark, WireNode};
use insta::assert_snapshot;

#[test]
fn test_hello_world_paragraph() {
    let value = vec![paragraph(vec![
        EditorNode::text("Hello "),
        EditorNode::marked("world", [Mark::Strong]),
    ])];

    let doc = encode(&value).unwrap();
    assert_eq!(
        doc.value.document.children,
        vec![WireNode::Paragraph {
            style: None,
            children: vec![
                WireNode::span("Hello ", []),
                WireNode::span("world", [Mark::Strong]),
            ],
        }]
    );
    assert_eq!(decode(&doc).unwrap(), value);
}

#[test]
fn test_hello_world_paragraph_as_json() {
    let registry = FormatRegistry::default();
    let value = registry
        .parse(
            r#"[{"type":"paragraph","children":[{"text":"Hello "},{"text":"world","marks":["strong"]}]}]"#,
            "editor",
        )
        .unwrap();
    let dast = registry.serialize(&value, "dast").unwrap();
    assert_snapshot!(dast, @r#"{"value":{"schema":"dast","document":{"type":"root","children":[{"type":"paragraph","children":[{"type":"span","value":"Hello "},{"type":"span","value":"world","marks":["strong"]}]}]}},"blocks":[]}"#);
}

#[test]
fn test_mixed_document_survives_both_directions() {
    let source = r#"[{"type":"heading","level":2,"children":[{"text":"Release notes"}]},{"type":"paragraph","children":[{"text":"See "},{"type":"link","url":"https://example.com/notes","children":[{"text":"the notes","marks":["emphasis"]}]},{"text":"."}]},{"type":"list","style":"numbered","children":[{"type":"listItem","children":[{"type":"paragraph","children":[{"text":"First"}]}]},{"type":"listItem","children":[{"type":"paragraph","children":[{"text":"Second"}]},{"type":"list","style":"bulleted","children":[{"type":"listItem","children":[{"type":"paragraph","children":[{"text":"Nested"}]}]}]}]}]},{"type":"thematicBreak","children":[{"text":""}]},{"type":"code","code":"let x = 1;","language":"rust","children":[{"text":""}]},{"type":"blockquote","children":[{"type":"paragraph","children":[{"text":"Quoted"}]}]}]"#;

    let registry = FormatRegistry::default();
    let value = registry.parse(source, "editor").unwrap();
    let dast = registry.serialize(&value, "dast").unwrap();
    let back = registry.parse(&dast, "dast").unwrap();

    assert_eq!(back, value);
    assert_eq!(registry.serialize(&back, "editor").unwrap(), source);
}

#[test]
fn test_image_block_side_table() {
    let value = vec![
        paragraph(vec![EditorNode::text("Before")]),
        image_block(Some("img-1"), "42"),
    ];
    let registry = FormatRegistry::default();
    let dast = registry.serialize(&value, "dast").unwrap();
    assert_snapshot!(dast, @r#"{"value":{"schema":"dast","document":{"type":"root","children":[{"type":"paragraph","children":[{"type":"span","value":"Before"}]},{"type":"block","item":"img-1"}]}},"blocks":[{"id":"img-1","blockModelId":"ImageRecord","content":{"imageId":"42","responsiveImage":{"alt":"","height":600,"src":"https://www.datocms-assets.com/42/photo.jpg","width":800}}}]}"#);

    assert_eq!(registry.parse(&dast, "dast").unwrap(), value);
}

#[test]
fn test_void_children_are_normalised_on_read() {
    let registry = FormatRegistry::default();
    let value = registry
        .parse(
            r#"[{"type":"thematicBreak","children":[{"text":"junk"},{"type":"paragraph","children":[]}]}]"#,
            "editor",
        )
        .unwrap();
    assert_eq!(
        registry.serialize(&value, "editor").unwrap(),
        r#"[{"type":"thematicBreak","children":[{"text":""}]}]"#
    );

    let dast = registry.serialize(&value, "dast").unwrap();
    assert!(dast.contains(r#"{"type":"thematicBreak"}"#));
}

#[test]
fn test_html_import_then_encode() {
    let registry = FormatRegistry::default();
    let value = registry
        .parse("<h2>Title</h2><p>Some <b>bold</b> text</p><hr>", "html")
        .unwrap();
    let dast = registry.serialize(&value, "dast").unwrap();
    assert_snapshot!(dast, @r#"{"value":{"schema":"dast","document":{"type":"root","children":[{"type":"heading","level":2,"children":[{"type":"span","value":"Title"}]},{"type":"paragraph","children":[{"type":"span","value":"Some "},{"type":"span","value":"bold","marks":["strong"]},{"type":"span","value":" text"}]},{"type":"thematicBreak"}]}},"blocks":[]}"#);
}
