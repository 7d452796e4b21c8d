//! Codec between the typed node tree and the persisted content string.
//!
//! Serialization is canonical: field order is fixed by the struct layout,
//! attribute keys are sorted, and absent fields are omitted. Two
//! structurally equal trees therefore serialize to the same string, which
//! is what lets the adapter compare snapshots without string games.

use crate::error::ContentError;
use crate::node::Node;

/// Parse a persisted content string into a node tree.
///
/// The root must be a `doc` node; anything else is rejected rather than
/// silently wrapped.
pub fn parse_content(raw: &str) -> Result<Node, ContentError> {
    let node: Node = serde_json::from_str(raw)?;
    if !node.is_doc() {
        return Err(ContentError::NotADocument(node.kind));
    }
    Ok(node)
}

/// Serialize a node tree to its canonical persisted form.
pub fn serialize_content(node: &Node) -> String {
    // The node tree contains only string keys and finite numbers, so
    // serialization cannot fail.
    serde_json::to_string(node).expect("node tree serialization is infallible")
}

/// Turn an optional persisted blob into an editable tree.
///
/// `None` and the empty string both mean a fresh page.
pub fn hydrate(persisted: Option<&str>) -> Result<Node, ContentError> {
    match persisted {
        None => Ok(Node::empty_doc()),
        Some(raw) if raw.trim().is_empty() => Ok(Node::empty_doc()),
        Some(raw) => parse_content(raw),
    }
}
