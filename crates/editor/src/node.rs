use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Inline formatting applied to a text node (bold, italic, link, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    /// Mark type name, e.g. `"bold"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Mark attributes, e.g. `{"href": ...}` for links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Map<String, Value>>,
}

/// One node of the rich-text tree.
///
/// The shape mirrors the persisted JSON: every node has a type name and
/// optionally attributes, marks, literal text (leaf text nodes) and child
/// nodes. The root of a page is always a node of kind `doc`.
///
/// Equality is structural. `attrs` is a [`serde_json::Map`], which keeps
/// keys sorted, so two trees that differ only in attribute insertion order
/// compare equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marks: Option<Vec<Mark>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Node>,
}

pub const DOC_KIND: &str = "doc";

impl Node {
    /// Bare node of the given kind with no attributes or children.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attrs: None,
            marks: None,
            text: None,
            content: Vec::new(),
        }
    }

    /// Root document node wrapping the given blocks.
    pub fn doc(content: Vec<Node>) -> Self {
        Self {
            content,
            ..Self::new(DOC_KIND)
        }
    }

    /// The empty page: a document holding a single empty paragraph.
    pub fn empty_doc() -> Self {
        Self::doc(vec![Self::paragraph(Vec::new())])
    }

    pub fn paragraph(content: Vec<Node>) -> Self {
        Self {
            content,
            ..Self::new("paragraph")
        }
    }

    pub fn heading(level: u8, content: Vec<Node>) -> Self {
        let mut attrs = Map::new();
        attrs.insert("level".to_string(), Value::from(level));
        Self {
            attrs: Some(attrs),
            content,
            ..Self::new("heading")
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new("text")
        }
    }

    pub fn with_mark(mut self, mark: Mark) -> Self {
        self.marks.get_or_insert_with(Vec::new).push(mark);
        self
    }

    pub fn is_doc(&self) -> bool {
        self.kind == DOC_KIND
    }

    /// Concatenated text of this subtree, in document order.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.content {
            child.collect_text(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_produce_expected_shape() {
        let doc = Node::doc(vec![Node::heading(1, vec![Node::text("Hello")])]);
        assert!(doc.is_doc());
        assert_eq!(doc.content.len(), 1);
        let heading = &doc.content[0];
        assert_eq!(heading.kind, "heading");
        assert_eq!(
            heading.attrs.as_ref().unwrap().get("level"),
            Some(&Value::from(1))
        );
        assert_eq!(heading.content[0].text.as_deref(), Some("Hello"));
    }

    #[test]
    fn equality_ignores_attr_insertion_order() {
        let mut a = Map::new();
        a.insert("level".into(), Value::from(2));
        a.insert("id".into(), Value::from("h1"));
        let mut b = Map::new();
        b.insert("id".into(), Value::from("h1"));
        b.insert("level".into(), Value::from(2));

        let left = Node {
            attrs: Some(a),
            ..Node::new("heading")
        };
        let right = Node {
            attrs: Some(b),
            ..Node::new("heading")
        };
        assert_eq!(left, right);
    }

    #[test]
    fn empty_doc_holds_one_empty_paragraph() {
        let doc = Node::empty_doc();
        assert_eq!(doc.content.len(), 1);
        assert_eq!(doc.content[0].kind, "paragraph");
        assert!(doc.content[0].content.is_empty());
    }

    #[test]
    fn plain_text_walks_the_tree_in_order() {
        let doc = Node::doc(vec![
            Node::heading(1, vec![Node::text("Title")]),
            Node::paragraph(vec![Node::text("one "), Node::text("two")]),
        ]);
        assert_eq!(doc.plain_text(), "Titleone two");
    }
}
