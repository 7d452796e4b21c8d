//! Structural validation for document writes.
//!
//! The parent relation must stay a forest: a parent has to exist, live in
//! the same workspace, and never be the document itself or one of its
//! descendants.

use thiserror::Error;
use uuid::Uuid;

use crate::document::model::Document;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("parent document {0} does not exist")]
    UnknownParent(Uuid),
    #[error("parent document {0} belongs to a different workspace")]
    ParentOutsideWorkspace(Uuid),
    #[error("document {0} cannot be its own parent")]
    SelfParent(Uuid),
    #[error("moving document {document} under {parent} would create a cycle")]
    Cycle { document: Uuid, parent: Uuid },
}

/// Collapse empty or whitespace-only titles into the placeholder.
pub fn normalize_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        crate::UNTITLED.to_string()
    } else {
        title.to_string()
    }
}

/// Check a prospective parent for a create or reparent against the flat
/// document set. `child` is `None` on create (no cycle is possible yet).
pub fn ensure_parent(
    documents: &[Document],
    workspace_id: Uuid,
    child: Option<Uuid>,
    parent: Uuid,
) -> Result<(), ValidationError> {
    if child == Some(parent) {
        return Err(ValidationError::SelfParent(parent));
    }

    let parent_doc = documents
        .iter()
        .find(|d| d.id == parent)
        .ok_or(ValidationError::UnknownParent(parent))?;
    if parent_doc.workspace_id != workspace_id {
        return Err(ValidationError::ParentOutsideWorkspace(parent));
    }

    if let Some(child) = child {
        // Walk from the prospective parent to the root; meeting the child
        // means the child is an ancestor and the move would close a loop.
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(ValidationError::Cycle {
                    document: child,
                    parent,
                });
            }
            cursor = documents
                .iter()
                .find(|d| d.id == id)
                .and_then(|d| d.parent_document_id);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn doc(id: Uuid, workspace_id: Uuid, parent: Option<Uuid>) -> Document {
        let now = Utc::now();
        Document {
            id,
            title: crate::UNTITLED.to_string(),
            content: None,
            workspace_id,
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

    #[test]
    fn normalize_title_keeps_real_titles() {
        assert_eq!(normalize_title("Roadmap"), "Roadmap");
        assert_eq!(normalize_title(""), crate::UNTITLED);
        assert_eq!(normalize_title("  \t"), crate::UNTITLED);
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let ws = Uuid::new_v4();
        let missing = Uuid::new_v4();
        let err = ensure_parent(&[], ws, None, missing).unwrap_err();
        assert_eq!(err, ValidationError::UnknownParent(missing));
    }

    #[test]
    fn cross_workspace_parent_is_rejected() {
        let ws_a = Uuid::new_v4();
        let ws_b = Uuid::new_v4();
        let parent = Uuid::new_v4();
        let docs = [doc(parent, ws_b, None)];
        let err = ensure_parent(&docs, ws_a, None, parent).unwrap_err();
        assert_eq!(err, ValidationError::ParentOutsideWorkspace(parent));
    }

    #[test]
    fn reparenting_under_own_descendant_is_a_cycle() {
        let ws = Uuid::new_v4();
        let root = Uuid::new_v4();
        let child = Uuid::new_v4();
        let grandchild = Uuid::new_v4();
        let docs = [
            doc(root, ws, None),
            doc(child, ws, Some(root)),
            doc(grandchild, ws, Some(child)),
        ];
        let err = ensure_parent(&docs, ws, Some(root), grandchild).unwrap_err();
        assert!(matches!(err, ValidationError::Cycle { .. }));
    }

    #[test]
    fn self_parent_is_rejected() {
        let ws = Uuid::new_v4();
        let id = Uuid::new_v4();
        let docs = [doc(id, ws, None)];
        let err = ensure_parent(&docs, ws, Some(id), id).unwrap_err();
        assert_eq!(err, ValidationError::SelfParent(id));
    }

    #[test]
    fn valid_reparent_passes() {
        let ws = Uuid::new_v4();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let docs = [doc(a, ws, None), doc(b, ws, None)];
        assert!(ensure_parent(&docs, ws, Some(b), a).is_ok());
    }
}
