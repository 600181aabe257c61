//! Import tests for HTML documents (HTML → editor value)
//!
//! These tests check the resulting editor tree against hand-built values.

use crate::common::{heading, paragraph};
use dast_babel::{
    import_html, EditorNode, Element, FormatOptions, FormatRegistry, ImportOptions, ListStyle,
    Mark,
};

fn import(html: &str) -> Vec<EditorNode> {
    import_html(html, &ImportOptions::default()).expect("Should import html")
}

fn item(children: Vec<EditorNode>) -> EditorNode {
    Element::list_item(children).into()
}

fn list(style: ListStyle, items: Vec<EditorNode>) -> EditorNode {
    Element::list(style, items).into()
}

#[test]
fn test_exported_document_whitespace() {
    let html = r#"<html>
  <body>
    <h1>Quarterly   report</h1>
    <p>
      Revenue grew <i>again</i>.
    </p>
    <blockquote><p>Best quarter yet</p></blockquote>
  </body>
</html>"#;

    assert_eq!(
        import(html),
        vec![
            heading(1, vec![EditorNode::text("Quarterly report")]),
            paragraph(vec![
                EditorNode::text("Revenue grew "),
                EditorNode::marked("again", [Mark::Emphasis]),
                EditorNode::text("."),
            ]),
            Element::blockquote(vec![paragraph(vec![EditorNode::text("Best quarter yet")])])
                .into(),
        ]
    );
}

#[test]
fn test_nested_list_inside_item() {
    let html = "<ol><li>One<ul><li>Nested</li></ul></li><li>Two</li></ol>";
    assert_eq!(
        import(html),
        vec![list(
            ListStyle::Numbered,
            vec![
                item(vec![
                    paragraph(vec![EditorNode::text("One")]),
                    list(
                        ListStyle::Bulleted,
                        vec![item(vec![paragraph(vec![EditorNode::text("Nested")])])]
                    ),
                ]),
                item(vec![paragraph(vec![EditorNode::text("Two")])]),
            ]
        )]
    );
}

#[test]
fn test_list_directly_in_list_joins_previous_item() {
    // Word processors emit sub-lists as siblings of the items.
    let html = "<ul>\n  <li>One</li>\n  <ul><li>Nested</li></ul>\n  <li>Two</li>\n</ul>";
    assert_eq!(
        import(html),
        vec![list(
            ListStyle::Bulleted,
            vec![
                item(vec![
                    paragraph(vec![EditorNode::text("One")]),
                    list(
                        ListStyle::Bulleted,
                        vec![item(vec![paragraph(vec![EditorNode::text("Nested")])])]
                    ),
                ]),
                item(vec![paragraph(vec![EditorNode::text("Two")])]),
            ]
        )]
    );
}

#[test]
fn test_mark_elements() {
    let value = import("<p><mark>hi</mark> <s>old</s> <code>x</code></p>");
    assert_eq!(
        value,
        vec![paragraph(vec![
            EditorNode::marked("hi", [Mark::Highlight]),
            EditorNode::text(" "),
            EditorNode::marked("old", [Mark::Strikethrough]),
            EditorNode::text(" "),
            EditorNode::marked("x", [Mark::Code]),
        ])]
    );
}

#[test]
fn test_style_marks_on_spans() {
    let value = import(
        r#"<p><span style="font-weight: bold; text-decoration: underline">both</span></p>"#,
    );
    assert_eq!(
        value,
        vec![paragraph(vec![EditorNode::marked(
            "both",
            [Mark::Strong, Mark::Underline]
        )])]
    );
}

#[test]
fn test_horizontal_rule_is_void() {
    let value = import("<p>a</p><hr><p>b</p>");
    assert_eq!(
        value[1],
        EditorNode::from(Element::thematic_break())
    );
    assert_eq!(value[1].children(), &[EditorNode::empty_leaf()]);
}

#[test]
fn test_empty_input_yields_one_empty_paragraph() {
    assert_eq!(import(""), vec![paragraph(Vec::new())]);
    assert_eq!(import("<div>   </div>"), vec![paragraph(Vec::new())]);
}

#[test]
fn test_registry_passes_import_options() {
    let options = FormatOptions {
        import: ImportOptions {
            base_url: Some("https://example.com/blog/".to_string()),
            ..ImportOptions::default()
        },
        ..FormatOptions::default()
    };
    let registry = FormatRegistry::with_options(options);
    let value = registry
        .parse(r#"<p><a href="/about">About</a></p>"#, "html")
        .unwrap();
    assert_eq!(
        value,
        vec![paragraph(vec![Element::link(
            "https://example.com/about",
            vec![EditorNode::text("About")]
        )
        .into()])]
    );
}
