//! The canonical tree every configuration source is normalised into.
//!
//! Documents are plain [`serde_json::Value`] trees. Objects keep first-seen
//! key order, so a merged document lists keys in the order sources first
//! introduced them.
//!
//! # Example
//!
//! ```rust
//! use strata_config::document::{merge_documents, Document};
//! use serde_json::json;
//!
//! let merged = merge_documents([
//!     json!({"server": {"port": 8080, "threads": 10}}),
//!     json!({"server": {"threads": 20}}),
//! ]);
//! assert_eq!(merged, json!({"server": {"port": 8080, "threads": 20}}));
//! # let _: Document = merged;
//! ```

mod layer;
mod merge;

use serde_json::{Map, Value};

pub use layer::{MergeLayer, SourceKind};
pub use merge::{merge_documents, merge_layers, merge_value};

/// A node of the configuration tree: object, array or scalar.
pub type Document = Value;

/// Returns an empty object node, the identity element of merging.
#[must_use]
pub fn empty_document() -> Document {
    Value::Object(Map::new())
}

/// Insert `value` at the nested `segments` path below `root`.
///
/// Intermediate objects are created as needed. A non-object encountered
/// along the path is replaced by an object, and an existing node at the leaf
/// is overwritten, so the most recent insertion always wins.
///
/// Empty `segments` leave `root` untouched.
///
/// # Examples
///
/// ```rust
/// use serde_json::{json, Map, Value};
/// use strata_config::document::insert_path;
///
/// let mut root = Map::new();
/// insert_path(&mut root, &["server".into(), "port".into()], json!("8080"));
/// insert_path(&mut root, &["server".into(), "threads".into()], json!("10"));
/// assert_eq!(Value::Object(root), json!({"server": {"port": "8080", "threads": "10"}}));
/// ```
pub fn insert_path(root: &mut Map<String, Value>, segments: &[String], value: Value) {
    let Some((leaf, parents)) = segments.split_last() else {
        return;
    };
    let mut current = root;
    for segment in parents {
        let slot = current
            .entry(segment.clone())
            .or_insert_with(empty_document);
        if !slot.is_object() {
            *slot = empty_document();
        }
        let Value::Object(next) = slot else {
            return;
        };
        current = next;
    }
    current.insert(leaf.clone(), value);
}

/// Resolve a JSON pointer against `document`.
///
/// `None` and the empty pointer address the root.
#[must_use]
pub fn node_at<'a>(document: &'a Document, pointer: Option<&str>) -> Option<&'a Document> {
    match pointer {
        None | Some("") => Some(document),
        Some(p) => document.pointer(p),
    }
}
