//! Malformed and unexpected markup never fails the import.
//!
//! Whatever the source, the imported value must satisfy the nesting rules so
//! the serializer accepts it with validation turned on.

use crate::common::paragraph;
use dast_babel::validate::check_editor;
use dast_babel::{
    encode, import_html, BlockRegistry, EditorNode, Element, EncodeOptions, ImportOptions,
    ListStyle,
};

fn import_checked(html: &str) -> Vec<EditorNode> {
    let value = import_html(html, &ImportOptions::default()).expect("Should import html");
    check_editor(&value).unwrap_or_else(|e| panic!("{html:?} imported into an invalid tree: {e}"));
    value
}

#[test]
fn test_unknown_uppercase_tag() {
    assert_eq!(
        import_checked("<P><FOOBAR>hello</FOOBAR></P>"),
        vec![paragraph(vec![EditorNode::text("hello")])]
    );
}

#[test]
fn test_orphan_list_items_get_a_list() {
    assert_eq!(
        import_checked("<li>orphan</li><li>second</li>"),
        vec![Element::list(
            ListStyle::Bulleted,
            vec![
                Element::list_item(vec![paragraph(vec![EditorNode::text("orphan")])]).into(),
                Element::list_item(vec![paragraph(vec![EditorNode::text("second")])]).into(),
            ]
        )
        .into()]
    );
}

#[test]
fn test_blocks_inside_a_link_keep_their_text() {
    let value = import_checked(r#"<a href="https://x.example/"><p>linked <b>para</b></p></a>"#);
    assert_eq!(value.len(), 1);
    assert_eq!(value[0].text_content(), "linked para");
}

#[test]
fn test_messy_documents_stay_valid() {
    let sources = [
        "<ul>text<li>item</li></ul>",
        "<blockquote><ul><li>quoted item</li></ul></blockquote>",
        "<h2><p>heading</p><hr></h2>",
        "<p><a href=\"https://a.example/\">outer <a href=\"https://b.example/\">inner</a></a></p>",
        "<table><tr><td>cell</td></tr></table>",
        "<p>unclosed <b>bold <i>both</p><p>next",
        "plain text, no tags",
        "<ol></ol>",
        "<div><div><span>deep</span></div></div>",
    ];

    for source in sources {
        let value = import_checked(source);
        let options = EncodeOptions {
            validate_structure: true,
        };
        encode(&value, &BlockRegistry::with_defaults(), &options)
            .unwrap_or_else(|e| panic!("{source:?} failed to encode: {e}"));
    }
}

#[test]
fn test_scripts_are_dropped_with_content() {
    assert_eq!(
        import_checked(
            "<p>kept</p><script>document.write('gone')</script><noscript>gone</noscript>"
        ),
        vec![paragraph(vec![EditorNode::text("kept")])]
    );
}

#[test]
fn test_unclosed_spans_do_not_exhaust_the_stack() {
    let value = import_checked(&"<span>".repeat(100_000));
    assert_eq!(value, vec![paragraph(Vec::new())]);
}

#[test]
fn test_deeply_nested_markup_keeps_its_text() {
    let source = format!(
        "<p>{}deep<br>text{}</p>",
        "<span>".repeat(50_000),
        "</span>".repeat(50_000)
    );
    let value = import_checked(&source);
    assert_eq!(value.len(), 1);
    assert_eq!(value[0].text_content(), "deep\ntext");

    let options = EncodeOptions {
        validate_structure: true,
    };
    assert!(encode(&value, &BlockRegistry::with_defaults(), &options).is_ok());
}
