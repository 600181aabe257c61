//! Image blocks from upload to side-table and back.

use crate::common::{decode, encode, image_block, image_payload, paragraph};
use dast_babel::{
    BlockNode, EditorNode, Element, FormatError, ImagePayload, UploadedImage, WireNode,
};
use serde_json::json;

#[test]
fn test_uploaded_image_encodes() {
    let upload = UploadedImage {
        image_id: "9001".to_string(),
        url: "https://www.datocms-assets.com/9001/cat.png".to_string(),
        width: 1024,
        height: 768,
        blur_up_thumb: Some("data:image/jpeg;base64,AAAA".to_string()),
    };
    let payload = ImagePayload::from_upload(upload, "A cat").to_value();
    let value = vec![EditorNode::from(Element::block(BlockNode {
        id: Some("cat".to_string()),
        block_model_id: "ImageRecord".to_string(),
        payload: payload.clone(),
    }))];

    let doc = encode(&value).unwrap();
    let record = doc.block("cat").expect("record for the image");
    assert_eq!(record.payload["content"], payload);
    assert_eq!(record.payload["content"]["responsiveImage"]["alt"], "A cat");
    assert_eq!(decode(&doc).unwrap(), value);
}

#[test]
fn test_pending_upload_fails_whole_encode() {
    let value = vec![
        paragraph(vec![EditorNode::text("Caption follows")]),
        EditorNode::from(Element::block(BlockNode {
            id: None,
            block_model_id: "ImageRecord".to_string(),
            payload: json!({"imageId": "", "responsiveImage": {"src": "blob:local", "width": 1, "height": 1}}),
        })),
    ];
    match encode(&value) {
        Err(FormatError::UnresolvedBlockReference { model, .. }) => {
            assert_eq!(model, "ImageRecord")
        }
        other => panic!("Expected UnresolvedBlockReference, got {other:?}"),
    }
}

#[test]
fn test_blocks_inside_list_items_are_collected() {
    let value = vec![EditorNode::from(Element::list(
        dast_babel::ListStyle::Bulleted,
        vec![Element::list_item(vec![
            paragraph(vec![EditorNode::text("Figure:")]),
            image_block(Some("fig-1"), "1"),
        ])
        .into()],
    ))];
    let doc = encode(&value).unwrap();
    assert_eq!(doc.blocks.len(), 1);
    assert_eq!(
        doc.value.document.children[0].children()[0].children()[1],
        WireNode::Block {
            item: "fig-1".to_string()
        }
    );
}

#[test]
fn test_synthetic_ids_survive_a_round_trip() {
    let value = vec![image_block(None, "7"), image_block(None, "7"), image_block(None, "8")];
    let doc = encode(&value).unwrap();
    assert_eq!(doc.blocks.len(), 3);

    let decoded = decode(&doc).unwrap();
    for (node, record) in decoded.iter().zip(&doc.blocks) {
        match node {
            EditorNode::Element(Element {
                kind: dast_babel::ElementKind::Block(block),
                ..
            }) => {
                assert_eq!(block.id.as_deref(), Some(record.id.as_str()));
                assert_eq!(block.payload, record.payload["content"]);
            }
            other => panic!("Expected a block, got {other:?}"),
        }
    }
    assert_eq!(encode(&decoded).unwrap(), doc);
}

#[test]
fn test_record_without_content_is_rejected() {
    let mut doc = encode(&[image_block(Some("a"), "1")]).unwrap();
    doc.blocks[0].payload.remove("content");
    assert!(matches!(
        decode(&doc),
        Err(FormatError::InvalidAttribute { attribute, .. }) if attribute == "content"
    ));
}

#[test]
fn test_payload_fields_are_kept() {
    let mut payload = image_payload("5");
    payload["focalPoint"] = json!({"x": 0.5, "y": 0.25});
    let value = vec![EditorNode::from(Element::block(BlockNode {
        id: Some("focal".to_string()),
        block_model_id: "ImageRecord".to_string(),
        payload,
    }))];
    assert_eq!(decode(&encode(&value).unwrap()).unwrap(), value);
}
