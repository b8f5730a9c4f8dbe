//! Free-form conversation metadata.

/// Accumulated key/value data attached to a conversation or a message.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Shallow-merges `delta` into `target`; keys from `delta` win.
///
/// # Examples
///
/// ```
/// use palaver_core::{Metadata, merge_metadata};
/// use serde_json::json;
///
/// let mut target: Metadata = serde_json::from_value(json!({"a": 1, "b": {"x": 1}})).unwrap();
/// let delta: Metadata = serde_json::from_value(json!({"b": {"y": 2}, "c": 3})).unwrap();
/// merge_metadata(&mut target, &delta);
///
/// assert_eq!(target["a"], json!(1));
/// assert_eq!(target["b"], json!({"y": 2}));
/// assert_eq!(target["c"], json!(3));
/// ```
pub fn merge_metadata(target: &mut Metadata, delta: &Metadata) {
    for (key, value) in delta {
        target.insert(key.clone(), value.clone());
    }
}
