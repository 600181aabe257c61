use super::BlockHandler;
use crate::error::FormatError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const IMAGE_MODEL_ID: &str = "ImageRecord";

/// Key under which the image payload sits in a side-table record.
const CONTENT_KEY: &str = "content";

/// Rendering data for an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsiveImage {
    pub src: String,
    #[serde(default)]
    pub alt: String,
    pub width: u32,
    pub height: u32,
}

/// Payload of an `ImageRecord` block, identical in the editor and inside the
/// record's `content` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub image_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur_up_thumb: Option<String>,
    pub responsive_image: ResponsiveImage,
}

/// What the image upload collaborator hands back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub image_id: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub blur_up_thumb: Option<String>,
}

impl ImagePayload {
    pub fn from_upload(upload: UploadedImage, alt: impl Into<String>) -> Self {
        Self {
            image_id: upload.image_id,
            blur_up_thumb: upload.blur_up_thumb,
            responsive_image: ResponsiveImage {
                src: upload.url,
                alt: alt.into(),
                width: upload.width,
                height: upload.height,
            },
        }
    }

    pub fn to_value(&self) -> Value {
        // A struct of strings and integers always serializes.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    fn check(value: &Value) -> Result<ImagePayload, String> {
        let payload: ImagePayload =
            serde_json::from_value(value.clone()).map_err(|e| e.to_string())?;
        if payload.image_id.is_empty() {
            return Err("imageId is empty".to_string());
        }
        if payload.responsive_image.src.is_empty() {
            return Err("responsiveImage.src is empty".to_string());
        }
        Ok(payload)
    }
}

/// Handler for inline images.
///
/// The editor payload is stored unchanged under `content`, so fields this
/// handler does not know about survive a round trip.
pub struct ImageBlock;

impl BlockHandler for ImageBlock {
    fn model_id(&self) -> &str {
        IMAGE_MODEL_ID
    }

    fn description(&self) -> &str {
        "Inline image with responsive rendering data"
    }

    fn encode(&self, payload: &Value) -> Result<Map<String, Value>, FormatError> {
        if payload.is_null() {
            return Err(FormatError::unresolved(IMAGE_MODEL_ID, "payload is missing"));
        }
        ImagePayload::check(payload)
            .map_err(|reason| FormatError::unresolved(IMAGE_MODEL_ID, reason))?;

        let mut record = Map::new();
        record.insert(CONTENT_KEY.to_string(), payload.clone());
        Ok(record)
    }

    fn decode(&self, record: &Map<String, Value>) -> Result<Value, FormatError> {
        let content = record.get(CONTENT_KEY).ok_or_else(|| {
            FormatError::invalid_attribute(
                IMAGE_MODEL_ID,
                CONTENT_KEY,
                "missing required attribute",
            )
        })?;
        ImagePayload::check(content)
            .map_err(|reason| FormatError::invalid_attribute(IMAGE_MODEL_ID, CONTENT_KEY, reason))?;
        Ok(content.clone())
    }
}
