//! Editing session for a single page.
//!
//! The adapter owns the native node tree for the page being edited. It is
//! created for exactly one document identity; when the active page changes
//! the caller tears the adapter down and mounts a fresh one instead of
//! mutating it in place, so no editor state survives a switch.

use uuid::Uuid;

use crate::codec::{hydrate, parse_content, serialize_content};
use crate::node::Node;

type ChangeSink = Box<dyn FnMut(&str) + Send>;

pub struct EditorAdapter {
    document_id: Uuid,
    doc: Node,
    sink: Option<ChangeSink>,
}

impl EditorAdapter {
    /// Mount an adapter for one document, hydrating its persisted content.
    ///
    /// A blob that fails to decode is logged and replaced with the empty
    /// page rather than poisoning the session.
    pub fn mount(document_id: Uuid, persisted: Option<&str>) -> Self {
        let doc = match hydrate(persisted) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!(%document_id, %err, "discarding undecodable page content");
                Node::empty_doc()
            }
        };
        Self {
            document_id,
            doc,
            sink: None,
        }
    }

    /// Identity of the document this adapter was mounted for.
    pub fn document_id(&self) -> Uuid {
        self.document_id
    }

    /// Current native tree.
    pub fn snapshot(&self) -> &Node {
        &self.doc
    }

    /// Canonical serialized form of the current tree.
    pub fn serialized(&self) -> String {
        serialize_content(&self.doc)
    }

    /// Register the one-directional change sink. Every native edit pushes
    /// the serialized snapshot through it; nothing ever flows back.
    pub fn set_sink(&mut self, sink: impl FnMut(&str) + Send + 'static) {
        self.sink = Some(Box::new(sink));
    }

    /// Apply a native content change, push the serialized snapshot through
    /// the sink, and return it.
    pub fn apply(&mut self, doc: Node) -> String {
        self.doc = doc;
        let serialized = serialize_content(&self.doc);
        if let Some(sink) = &mut self.sink {
            sink(&serialized);
        }
        serialized
    }

    /// Re-hydrate from persisted state if it diverges from the current
    /// snapshot. Divergence is structural, so a persisted string that is
    /// formatted differently but encodes the same tree is a no-op — that
    /// is what keeps a save echo from ping-ponging the editor.
    ///
    /// Returns `true` when the tree was replaced.
    pub fn sync_persisted(&mut self, persisted: Option<&str>) -> bool {
        let incoming = match persisted {
            None => return false,
            Some(raw) => match parse_content(raw) {
                Ok(doc) => doc,
                Err(err) => {
                    tracing::warn!(
                        document_id = %self.document_id,
                        %err,
                        "ignoring undecodable persisted content during sync"
                    );
                    return false;
                }
            },
        };
        if incoming == self.doc {
            return false;
        }
        self.doc = incoming;
        true
    }
}
