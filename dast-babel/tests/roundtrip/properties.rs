//! Property tests over generated editor values.
//!
//! The generated trees follow the nesting rules, so decoding with validation
//! on must accept everything the encoder produces.

use crate::common::{decode, encode, image_block};
use dast_babel::{EditorNode, Element, HeadingLevel, ListStyle, Mark};
use proptest::prelude::*;
use proptest::sample::subsequence;
use proptest::test_runner::Config;

fn leaf() -> impl Strategy<Value = EditorNode> {
    ("[a-zA-Z ,.]{0,12}", subsequence(Mark::ALL.to_vec(), 0..=3))
        .prop_map(|(text, marks)| EditorNode::marked(text, marks))
}

fn inline() -> impl Strategy<Value = EditorNode> {
    prop_oneof![
        4 => leaf(),
        1 => ("[a-z]{1,8}", prop::collection::vec(leaf(), 1..3)).prop_map(|(host, children)| {
            EditorNode::from(Element::link(format!("https://{host}.example/"), children))
        }),
    ]
}

fn paragraph() -> impl Strategy<Value = EditorNode> {
    prop::collection::vec(inline(), 1..4)
        .prop_map(|children| EditorNode::from(Element::paragraph(children)))
}

fn list_style() -> impl Strategy<Value = ListStyle> {
    prop_oneof![Just(ListStyle::Bulleted), Just(ListStyle::Numbered)]
}

fn list(depth: u32) -> BoxedStrategy<EditorNode> {
    let item = if depth == 0 {
        prop::collection::vec(paragraph(), 1..3).boxed()
    } else {
        (paragraph(), prop::option::of(list(depth - 1)))
            .prop_map(|(first, nested)| std::iter::once(first).chain(nested).collect::<Vec<_>>())
            .boxed()
    };
    (list_style(), prop::collection::vec(item, 1..3))
        .prop_map(|(style, items)| {
            let items = items
                .into_iter()
                .map(|children| EditorNode::from(Element::list_item(children)))
                .collect();
            EditorNode::from(Element::list(style, items))
        })
        .boxed()
}

fn top_level() -> impl Strategy<Value = EditorNode> {
    prop_oneof![
        4 => paragraph(),
        1 => (1u8..=6, prop::collection::vec(inline(), 1..3)).prop_map(|(level, children)| {
            EditorNode::from(Element::heading(HeadingLevel::new(level).unwrap(), children))
        }),
        1 => list(1),
        1 => prop::collection::vec(paragraph(), 1..3)
            .prop_map(|children| EditorNode::from(Element::blockquote(children))),
        1 => Just(EditorNode::from(Element::thematic_break())),
        1 => ("[ -~]{0,20}", prop::option::of("[a-z]{1,6}"))
            .prop_map(|(code, language)| EditorNode::from(Element::code(code, language))),
        1 => "[0-9]{1,3}".prop_map(|image_id| {
            image_block(Some(format!("img-{image_id}").as_str()), &image_id)
        }),
    ]
}

fn anonymous_image() -> impl Strategy<Value = EditorNode> {
    "[0-9]{1,2}".prop_map(|image_id| image_block(None, &image_id))
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn decode_inverts_encode(value in prop::collection::vec(top_level(), 0..6)) {
        let doc = encode(&value).unwrap();
        prop_assert_eq!(decode(&doc).unwrap(), value);
    }

    #[test]
    fn encoding_is_idempotent_through_decode(
        value in prop::collection::vec(prop_oneof![3 => top_level(), 1 => anonymous_image()], 0..6)
    ) {
        let first = encode(&value).unwrap();
        let second = encode(&decode(&first).unwrap()).unwrap();
        prop_assert_eq!(second, first);
    }

    #[test]
    fn encoding_is_deterministic(
        value in prop::collection::vec(prop_oneof![3 => top_level(), 1 => anonymous_image()], 0..6)
    ) {
        let a = serde_json::to_string(&encode(&value).unwrap()).unwrap();
        let b = serde_json::to_string(&encode(&value).unwrap()).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn every_block_reference_has_one_record(
        value in prop::collection::vec(prop_oneof![1 => top_level(), 1 => anonymous_image()], 0..8)
    ) {
        let doc = encode(&value).unwrap();
        let mut ids: Vec<&str> = doc.blocks.iter().map(|record| record.id.as_str()).collect();
        ids.sort_unstable();
        let before = ids.len();
        ids.dedup();
        prop_assert_eq!(ids.len(), before);

        let json = serde_json::to_value(&doc.value).unwrap();
        let mut stack = vec![&json];
        while let Some(node) = stack.pop() {
            if node["type"] == "block" {
                let item = node["item"].as_str().unwrap();
                prop_assert!(doc.block(item).is_some(), "dangling reference {}", item);
            }
            if let Some(children) = node["children"].as_array() {
                stack.extend(children);
            }
            if let Some(document) = node.get("document") {
                stack.push(document);
            }
        }
    }

    #[test]
    fn marks_are_written_in_canonical_order(
        marks in subsequence(Mark::ALL.to_vec(), 0..=6).prop_shuffle()
    ) {
        let leaf = EditorNode::marked("x", marks.clone());
        let value = vec![EditorNode::from(Element::paragraph(vec![leaf]))];
        let json = serde_json::to_value(&encode(&value).unwrap().value).unwrap();
        let written: Vec<String> = json["document"]["children"][0]["children"][0]["marks"]
            .as_array()
            .map(|names| names.iter().map(|n| n.as_str().unwrap().to_string()).collect())
            .unwrap_or_default();

        let mut expected = marks;
        expected.sort();
        let expected: Vec<String> = expected.iter().map(|m| m.to_string()).collect();
        prop_assert_eq!(written, expected);
    }
}
