//! Materialized sidebar tree.
//!
//! An explicit adjacency index over the flat document list: ordered roots
//! plus an ordered child list per parent, maintained incrementally on
//! create / reparent / archive instead of re-filtering the whole list for
//! every rendered node.
//!
//! A document whose parent is not in the index (its parent was archived)
//! is kept under that absent parent: it stays in the flat listing but is
//! not reachable from the roots, which is exactly how the sidebar treats
//! children of archived pages.

use std::collections::HashMap;

use uuid::Uuid;

use crate::document::model::Document;
use crate::document::validate::ValidationError;
use crate::tree::expand::ExpandedState;

#[derive(Debug, Clone, Default)]
pub struct TreeIndex {
    roots: Vec<Uuid>,
    children: HashMap<Uuid, Vec<Uuid>>,
    parents: HashMap<Uuid, Option<Uuid>>,
}

/// One row of the rendered sidebar: a reachable document, its indentation
/// depth, and whether it gets an expand toggle (leaves get a spacer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    pub id: Uuid,
    pub depth: usize,
    pub has_children: bool,
}

impl TreeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from a flat, creation-ordered document list.
    pub fn from_documents(documents: &[Document]) -> Self {
        let mut index = Self::new();
        for doc in documents {
            index.insert(doc.id, doc.parent_document_id);
        }
        index
    }

    /// Add a newly created document at the end of its sibling list.
    pub fn insert(&mut self, id: Uuid, parent: Option<Uuid>) {
        self.parents.insert(id, parent);
        match parent {
            None => self.roots.push(id),
            Some(parent) => self.children.entry(parent).or_default().push(id),
        }
    }

    /// Move a document under a new parent (or to the root).
    pub fn reparent(&mut self, id: Uuid, new_parent: Option<Uuid>) -> Result<(), ValidationError> {
        let Some(&old_parent) = self.parents.get(&id) else {
            return Ok(()); // not indexed; nothing to move
        };
        if let Some(parent) = new_parent {
            if parent == id {
                return Err(ValidationError::SelfParent(id));
            }
            if !self.parents.contains_key(&parent) {
                return Err(ValidationError::UnknownParent(parent));
            }
            if self.is_descendant(id, parent) {
                return Err(ValidationError::Cycle {
                    document: id,
                    parent,
                });
            }
        }
        self.detach(id, old_parent);
        self.insert(id, new_parent);
        Ok(())
    }

    /// Drop a document from the index (archive). Its descendants keep
    /// their edges and simply become unreachable.
    pub fn remove(&mut self, id: Uuid) {
        if let Some(parent) = self.parents.remove(&id) {
            self.detach(id, parent);
        }
    }

    fn detach(&mut self, id: Uuid, parent: Option<Uuid>) {
        match parent {
            None => self.roots.retain(|&r| r != id),
            Some(parent) => {
                if let Some(siblings) = self.children.get_mut(&parent) {
                    siblings.retain(|&c| c != id);
                }
            }
        }
    }

    pub fn roots(&self) -> &[Uuid] {
        &self.roots
    }

    pub fn children(&self, id: Uuid) -> &[Uuid] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_children(&self, id: Uuid) -> bool {
        !self.children(id).is_empty()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.parents.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Whether `node` sits somewhere below `ancestor`.
    pub fn is_descendant(&self, ancestor: Uuid, node: Uuid) -> bool {
        let mut cursor = self.parents.get(&node).copied().flatten();
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.parents.get(&id).copied().flatten();
        }
        false
    }

    /// The sidebar rows in render order: depth-first from the roots,
    /// descending only into expanded nodes.
    pub fn visible_rows(&self, expanded: &ExpandedState) -> Vec<VisibleRow> {
        let mut rows = Vec::new();
        for &root in &self.roots {
            self.walk(root, 0, expanded, &mut rows);
        }
        rows
    }

    fn walk(&self, id: Uuid, depth: usize, expanded: &ExpandedState, rows: &mut Vec<VisibleRow>) {
        let has_children = self.has_children(id);
        rows.push(VisibleRow {
            id,
            depth,
            has_children,
        });
        if has_children && expanded.is_expanded(id) {
            for &child in self.children(id) {
                self.walk(child, depth + 1, expanded, rows);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn doc(id: Uuid, parent: Option<Uuid>) -> Document {
        let now = Utc::now();
        Document {
            id,
            title: crate::UNTITLED.to_string(),
            content: None,
            workspace_id: Uuid::new_v4(),
            parent_document_id: parent,
            user_id: crate::DEFAULT_USER_ID.to_string(),
            is_archived: false,
            is_published: false,
            icon: None,
            cover_image: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn forest() -> (Vec<Document>, Uuid, Uuid, Uuid, Uuid) {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let a1 = Uuid::new_v4();
        let a2 = Uuid::new_v4();
        let docs = vec![
            doc(a, None),
            doc(b, None),
            doc(a1, Some(a)),
            doc(a2, Some(a)),
        ];
        (docs, a, b, a1, a2)
    }

    #[test]
    fn every_parentless_document_is_a_root_exactly_once() {
        let (docs, a, b, ..) = forest();
        let index = TreeIndex::from_documents(&docs);
        assert_eq!(index.roots(), &[a, b]);
        for root in [a, b] {
            assert_eq!(index.roots().iter().filter(|&&r| r == root).count(), 1);
        }
    }

    #[test]
    fn children_appear_under_their_parent_and_nowhere_else() {
        let (docs, a, b, a1, a2) = forest();
        let index = TreeIndex::from_documents(&docs);
        assert_eq!(index.children(a), &[a1, a2]);
        assert_eq!(index.children(b), &[] as &[Uuid]);
        for child in [a1, a2] {
            assert!(!index.roots().contains(&child));
            assert!(!index.children(b).contains(&child));
            assert!(!index.children(child).contains(&child));
        }
    }

    #[test]
    fn insert_appends_to_sibling_order() {
        let (docs, a, _, a1, a2) = forest();
        let mut index = TreeIndex::from_documents(&docs);
        let a3 = Uuid::new_v4();
        index.insert(a3, Some(a));
        assert_eq!(index.children(a), &[a1, a2, a3]);
    }

    #[test]
    fn reparent_moves_between_sibling_lists() {
        let (docs, a, b, a1, a2) = forest();
        let mut index = TreeIndex::from_documents(&docs);
        index.reparent(a1, Some(b)).unwrap();
        assert_eq!(index.children(a), &[a2]);
        assert_eq!(index.children(b), &[a1]);

        index.reparent(a1, None).unwrap();
        assert_eq!(index.roots(), &[a, b, a1]);
    }

    #[test]
    fn reparent_under_descendant_is_rejected() {
        let (docs, a, _, a1, a2) = forest();
        let mut index = TreeIndex::from_documents(&docs);
        let err = index.reparent(a, Some(a1)).unwrap_err();
        assert!(matches!(err, ValidationError::Cycle { .. }));
        // Unchanged on failure.
        assert_eq!(index.children(a), &[a1, a2]);
        assert!(index.roots().contains(&a));
    }

    #[test]
    fn remove_detaches_but_keeps_descendants_indexed() {
        let (docs, a, b, a1, a2) = forest();
        let mut index = TreeIndex::from_documents(&docs);
        index.remove(a);

        assert_eq!(index.roots(), &[b]);
        assert!(!index.contains(a));
        // Children of the removed page keep their edge and fall out of the
        // visible tree without being re-rooted.
        assert!(index.contains(a1));
        assert_eq!(index.children(a), &[a1, a2]);
        let rows = index.visible_rows(&ExpandedState::new());
        assert!(rows.iter().all(|r| r.id != a1 && r.id != a2));
    }

    #[test]
    fn visible_rows_descend_only_into_expanded_nodes() {
        let (docs, a, b, a1, a2) = forest();
        let index = TreeIndex::from_documents(&docs);

        let collapsed = index.visible_rows(&ExpandedState::new());
        assert_eq!(
            collapsed,
            vec![
                VisibleRow { id: a, depth: 0, has_children: true },
                VisibleRow { id: b, depth: 0, has_children: false },
            ]
        );

        let mut expanded = ExpandedState::new();
        expanded.expand(a);
        let rows = index.visible_rows(&expanded);
        assert_eq!(
            rows,
            vec![
                VisibleRow { id: a, depth: 0, has_children: true },
                VisibleRow { id: a1, depth: 1, has_children: false },
                VisibleRow { id: a2, depth: 1, has_children: false },
                VisibleRow { id: b, depth: 0, has_children: false },
            ]
        );
    }

    #[test]
    fn orphaned_children_never_render() {
        // Parent archived before the list was fetched: the child arrives
        // with a dangling parent reference.
        let ghost = Uuid::new_v4();
        let child = Uuid::new_v4();
        let index = TreeIndex::from_documents(&[doc(child, Some(ghost))]);

        assert!(index.contains(child));
        assert!(index.roots().is_empty());
        assert!(index.visible_rows(&ExpandedState::new()).is_empty());
    }
}
