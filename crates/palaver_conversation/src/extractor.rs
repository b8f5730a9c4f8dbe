//! Embedded response metadata.

use palaver_core::Metadata;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static METADATA_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<metadata>(.*?)</metadata>").expect("valid metadata pattern")
});

/// Model output split into visible text and structured metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedResponse {
    /// Text with the metadata tag removed, trimmed
    pub content: String,
    /// Parsed metadata object, if the tag held one
    pub metadata: Option<Metadata>,
}

/// Splits the first `<metadata>{...}</metadata>` tag out of generated text.
///
/// The tag is removed even when its body is not a JSON object; in that case
/// the failure is logged and `metadata` is `None`.
///
/// # Examples
///
/// ```
/// use palaver_conversation::extract_metadata;
/// use serde_json::json;
///
/// let extracted = extract_metadata("<metadata>{\"k\":1}</metadata>Hello");
/// assert_eq!(extracted.content, "Hello");
/// assert_eq!(extracted.metadata.map(serde_json::Value::Object), Some(json!({"k": 1})));
/// ```
pub fn extract_metadata(raw: &str) -> ExtractedResponse {
    let Some(captures) = METADATA_TAG.captures(raw) else {
        return ExtractedResponse {
            content: raw.trim().to_string(),
            metadata: None,
        };
    };

    let metadata = match serde_json::from_str::<Value>(&captures[1]) {
        Ok(Value::Object(map)) => Some(map),
        Ok(other) => {
            tracing::warn!(found = %other, "Response metadata is not a JSON object; dropping it");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to parse response metadata JSON; dropping it");
            None
        }
    };

    ExtractedResponse {
        content: METADATA_TAG.replace(raw, "").trim().to_string(),
        metadata,
    }
}
