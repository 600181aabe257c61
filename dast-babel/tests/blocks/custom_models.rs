//! Block models registered by the caller.

use dast_babel::{
    decode, encode, BlockHandler, BlockNode, BlockRegistry, DecodeOptions, EditorNode, Element,
    EncodeOptions, FormatError, FormatOptions, FormatRegistry, PassthroughBlock,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::thread;

/// Editor payload `{"url": ...}`, record `{"video": {"url": ..., "provider": ...}}`.
struct VideoBlock;

impl BlockHandler for VideoBlock {
    fn model_id(&self) -> &str {
        "VideoRecord"
    }

    fn encode(&self, payload: &Value) -> Result<Map<String, Value>, FormatError> {
        let url = payload["url"].as_str().ok_or_else(|| FormatError::UnresolvedBlockReference {
            model: "VideoRecord".to_string(),
            reason: "url is missing".to_string(),
        })?;
        let provider = if url.contains("youtube") { "youtube" } else { "vimeo" };
        let mut record = Map::new();
        record.insert("video".to_string(), json!({"url": url, "provider": provider}));
        Ok(record)
    }

    fn decode(&self, record: &Map<String, Value>) -> Result<Value, FormatError> {
        Ok(json!({"url": record["video"]["url"]}))
    }
}

fn block(id: &str, model: &str, payload: Value) -> EditorNode {
    Element::block(BlockNode {
        id: Some(id.to_string()),
        block_model_id: model.to_string(),
        payload,
    })
    .into()
}

fn registry() -> BlockRegistry {
    let mut blocks = BlockRegistry::with_defaults();
    blocks.register(VideoBlock);
    blocks.register_namespace("Cta", PassthroughBlock::new("Cta*"));
    blocks
}

#[test]
fn test_custom_handler_shapes_the_record() {
    let blocks = registry();
    let value = vec![block("v1", "VideoRecord", json!({"url": "https://youtube.com/watch?v=1"}))];

    let doc = encode(&value, &blocks, &EncodeOptions::default()).unwrap();
    assert_eq!(
        serde_json::to_value(&doc.blocks).unwrap(),
        json!([{
            "id": "v1",
            "blockModelId": "VideoRecord",
            "video": {"url": "https://youtube.com/watch?v=1", "provider": "youtube"}
        }])
    );
    assert_eq!(decode(&doc, &blocks, &DecodeOptions::default()).unwrap(), value);
}

#[test]
fn test_namespace_handler() {
    let blocks = registry();
    assert!(blocks.has("CtaButtonRecord"));
    assert!(!blocks.has("QuoteRecord"));
    assert_eq!(blocks.list_namespaces(), vec!["Cta".to_string()]);

    let value = vec![block("c1", "CtaButtonRecord", json!({"label": "Subscribe"}))];
    let doc = encode(&value, &blocks, &EncodeOptions::default()).unwrap();
    assert_eq!(doc.blocks[0].block_model_id, "CtaButtonRecord");
    assert_eq!(doc.blocks[0].payload["label"], "Subscribe");
}

#[test]
fn test_unknown_model_on_decode() {
    let blocks = registry();
    let value = vec![block("v1", "VideoRecord", json!({"url": "https://vimeo.com/1"}))];
    let doc = encode(&value, &blocks, &EncodeOptions::default()).unwrap();

    let defaults = BlockRegistry::with_defaults();
    assert_eq!(
        decode(&doc, &defaults, &DecodeOptions::default()),
        Err(FormatError::UnknownBlockModel("VideoRecord".to_string()))
    );
}

#[test]
fn test_registry_is_shared_across_threads() {
    let blocks = Arc::new(registry());
    let formats = Arc::new(FormatRegistry::with_blocks(FormatOptions::default(), blocks));

    let handles: Vec<_> = (0..4)
        .map(|n| {
            let formats = Arc::clone(&formats);
            thread::spawn(move || {
                let url = format!("https://vimeo.com/{n}");
                let value = vec![block(&format!("v{n}"), "VideoRecord", json!({ "url": url }))];
                let dast = formats.serialize(&value, "dast").unwrap();
                formats.parse(&dast, "dast").unwrap() == value
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
