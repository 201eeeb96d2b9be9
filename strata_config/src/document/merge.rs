//! Deep merge of ordered documents.

use serde_json::{Map, Value};

use super::{Document, MergeLayer, empty_document};

/// Overlay `layer` onto `target`, updating `target` in place.
///
/// Behaviour:
/// - Objects merge recursively: keys only on one side pass through, keys on
///   both sides recurse, and existing keys keep their position.
/// - Any other combination (scalars, arrays, or an object meeting a
///   non-object) replaces `target` wholesale with `layer`.
///
/// # Examples
///
/// ```rust
/// use strata_config::document::merge_value;
/// use serde_json::json;
///
/// let mut acc = json!({"a": 1, "b": {"x": 1}});
/// merge_value(&mut acc, json!({"b": {"y": 2}, "c": 3}));
/// assert_eq!(acc, json!({"a": 1, "b": {"x": 1, "y": 2}, "c": 3}));
///
/// // A scalar discards the whole sub-tree it lands on.
/// merge_value(&mut acc, json!({"b": "disabled"}));
/// assert_eq!(acc["b"], json!("disabled"));
/// ```
pub fn merge_value(target: &mut Value, layer: Value) {
    match layer {
        Value::Object(map) => merge_object(target, map),
        _ => *target = layer,
    }
}

/// Merge the object `map` into `target`.
///
/// A non-object target is replaced by an empty object first, which makes the
/// incoming object a wholesale replacement of whatever was there.
fn merge_object(target: &mut Value, map: Map<String, Value>) {
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }

    let Some(target_map) = target.as_object_mut() else {
        return;
    };

    for (key, value) in map {
        match target_map.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                target_map.insert(key, value);
            }
        }
    }
}

/// Fold `documents` left to right into one tree; later documents win.
///
/// An empty sequence yields an empty object.
#[must_use]
pub fn merge_documents<I>(documents: I) -> Document
where
    I: IntoIterator<Item = Document>,
{
    documents
        .into_iter()
        .fold(empty_document(), |mut acc, next| {
            merge_value(&mut acc, next);
            acc
        })
}

/// Fold parsed layers in order, returning the merged tree.
#[must_use]
pub fn merge_layers<I>(layers: I) -> Document
where
    I: IntoIterator<Item = MergeLayer>,
{
    merge_documents(layers.into_iter().map(MergeLayer::into_value))
}
