//! Decoding Dast documents as they come from the CMS.
//!
//! The wire path is strict: anything outside the vocabulary, and any broken
//! block reference, fails the whole document.

use dast_babel::{EditorNode, Element, Format, FormatError, Mark};
use dast_babel::formats::DastFormat;

fn parse(source: &str) -> Result<Vec<EditorNode>, FormatError> {
    DastFormat::default().parse(source)
}

fn bundle(children: &str, blocks: &str) -> String {
    format!(
        r#"{{"value":{{"schema":"dast","document":{{"type":"root","children":[{children}]}}}},"blocks":[{blocks}]}}"#
    )
}

const IMAGE_RECORD: &str = r#"{"id":"img","blockModelId":"ImageRecord","content":{"imageId":"1","responsiveImage":{"src":"https://cdn.example/1.jpg","width":1,"height":1}}}"#;

#[test]
fn test_bare_document_is_accepted() {
    let value = parse(
        r#"{"schema":"dast","document":{"type":"root","children":[{"type":"paragraph","children":[{"type":"span","value":"Hi","marks":["emphasis","strong"]}]}]}}"#,
    )
    .unwrap();
    assert_eq!(
        value,
        vec![EditorNode::from(Element::paragraph(vec![EditorNode::marked(
            "Hi",
            [Mark::Strong, Mark::Emphasis]
        )]))]
    );
}

#[test]
fn test_spans_without_type() {
    let value = parse(&bundle(
        r#"{"type":"paragraph","children":[{"value":"untyped"}]}"#,
        "",
    ))
    .unwrap();
    assert_eq!(value[0].text_content(), "untyped");
}

#[test]
fn test_empty_element_gets_a_leaf() {
    let value = parse(&bundle(r#"{"type":"paragraph","children":[]}"#, "")).unwrap();
    assert_eq!(value[0].children(), &[EditorNode::empty_leaf()]);
}

#[test]
fn test_unknown_node_type() {
    assert_eq!(
        parse(&bundle(r#"{"type":"table","children":[]}"#, "")),
        Err(FormatError::UnsupportedNodeType("table".to_string()))
    );
}

#[test]
fn test_unknown_mark() {
    assert_eq!(
        parse(&bundle(
            r#"{"type":"paragraph","children":[{"type":"span","value":"x","marks":["blink"]}]}"#,
            ""
        )),
        Err(FormatError::UnsupportedMark("blink".to_string()))
    );
}

#[test]
fn test_wrong_schema() {
    assert_eq!(
        parse(r#"{"value":{"schema":"html","document":{"type":"root","children":[]}},"blocks":[]}"#),
        Err(FormatError::UnsupportedSchema("html".to_string()))
    );
}

#[test]
fn test_dangling_block_reference() {
    assert_eq!(
        parse(&bundle(r#"{"type":"block","item":"nope"}"#, IMAGE_RECORD)),
        Err(FormatError::MissingBlockEntry("nope".to_string()))
    );
}

#[test]
fn test_duplicate_side_table_entries() {
    let blocks = format!("{IMAGE_RECORD},{IMAGE_RECORD}");
    assert_eq!(
        parse(&bundle(r#"{"type":"block","item":"img"}"#, &blocks)),
        Err(FormatError::DuplicateBlockEntry("img".to_string()))
    );
}

#[test]
fn test_orphan_record_is_ignored() {
    let value = parse(&bundle(
        r#"{"type":"paragraph","children":[{"type":"span","value":"no images"}]}"#,
        IMAGE_RECORD,
    ))
    .unwrap();
    assert_eq!(value.len(), 1);
    assert_eq!(value[0].text_content(), "no images");
}

#[test]
fn test_misplaced_nodes_are_rejected() {
    let err = parse(&bundle(r#"{"type":"span","value":"loose"}"#, "")).unwrap_err();
    assert!(matches!(err, FormatError::StructuralInvariantViolation { .. }));

    let err = parse(&bundle(
        r#"{"type":"listItem","children":[{"type":"paragraph","children":[]}]}"#,
        "",
    ))
    .unwrap_err();
    assert!(matches!(err, FormatError::StructuralInvariantViolation { .. }));
}

#[test]
fn test_invalid_heading_level() {
    assert!(matches!(
        parse(&bundle(r#"{"type":"heading","level":9,"children":[]}"#, "")),
        Err(FormatError::InvalidAttribute { attribute, .. }) if attribute == "level"
    ));
}

#[test]
fn test_not_json() {
    assert!(matches!(parse("<p>html?</p>"), Err(FormatError::ParseError(_))));
}
