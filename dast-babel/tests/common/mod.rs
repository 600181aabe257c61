//! Builders shared by the integration tests.

use dast_babel::{
    BlockNode, BlockRegistry, DecodeOptions, EditorNode, Element, EncodeOptions, FormatError,
    HeadingLevel, StructuredText,
};
use serde_json::{json, Value};

pub fn paragraph(children: Vec<EditorNode>) -> EditorNode {
    Element::paragraph(children).into()
}

pub fn heading(level: u8, children: Vec<EditorNode>) -> EditorNode {
    Element::heading(HeadingLevel::new(level).unwrap(), children).into()
}

pub fn image_payload(image_id: &str) -> Value {
    json!({
        "imageId": image_id,
        "responsiveImage": {
            "src": format!("https://www.datocms-assets.com/{image_id}/photo.jpg"),
            "alt": "",
            "width": 800,
            "height": 600
        }
    })
}

pub fn image_block(id: Option<&str>, image_id: &str) -> EditorNode {
    Element::block(BlockNode {
        id: id.map(str::to_string),
        block_model_id: "ImageRecord".to_string(),
        payload: image_payload(image_id),
    })
    .into()
}

pub fn encode(value: &[EditorNode]) -> Result<StructuredText, FormatError> {
    dast_babel::encode(value, &BlockRegistry::with_defaults(), &EncodeOptions::default())
}

pub fn decode(doc: &StructuredText) -> Result<Vec<EditorNode>, FormatError> {
    dast_babel::decode(doc, &BlockRegistry::with_defaults(), &DecodeOptions::default())
}
