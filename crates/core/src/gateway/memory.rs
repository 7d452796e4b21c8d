//! In-memory gateway backend.
//!
//! Holds the two relations behind an async `RwLock`. Each instance owns
//! its state outright — construct one per test (or per demo session) and
//! drop it to reset; nothing lives in module-level statics.

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use async_trait::async_trait;
use treehouse_editor::{serialize_content, Node};

use crate::document::model::{Document, DocumentPatch, Workspace};
use crate::document::validate::ensure_parent;
use crate::gateway::{Gateway, GatewayError};

#[derive(Default)]
struct State {
    workspace: Option<Workspace>,
    documents: Vec<Document>,
}

#[derive(Default)]
pub struct MemoryGateway {
    state: RwLock<State>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway pre-populated with a workspace and a welcome page, the
    /// way a fresh demo install looks.
    pub fn seeded() -> Self {
        let now = Utc::now();
        let workspace = Workspace {
            id: Uuid::new_v4(),
            name: crate::DEFAULT_WORKSPACE_NAME.to_string(),
            user_id: crate::DEFAULT_USER_ID.to_string(),
            icon: None,
            created_at: now,
            updated_at: now,
        };
        let welcome = Node::doc(vec![Node::heading(
            1,
            vec![Node::text("Welcome to Treehouse!")],
        )]);
        let page = Document {
            id: Uuid::new_v4(),
            title: "Getting Started".to_string(),
            content: Some(serialize_content(&welcome)),
            workspace_id: workspace.id,
            parent_document_id: None,
            user_id: crate::DEFAULT_USER_ID.to_string(),
            is_archived: false,
            is_published: false,
            icon: Some("🚀".to_string()),
            cover_image: None,
            created_at: now,
            updated_at: now,
        };
        Self {
            state: RwLock::new(State {
                workspace: Some(workspace),
                documents: vec![page],
            }),
        }
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn get_or_create_workspace(&self) -> Result<Workspace, GatewayError> {
        let mut state = self.state.write().await;
        if let Some(workspace) = &state.workspace {
            return Ok(workspace.clone());
        }
        let now = Utc::now();
        let workspace = Workspace {
            id: Uuid::new_v4(),
            name: crate::DEFAULT_WORKSPACE_NAME.to_string(),
            user_id: crate::DEFAULT_USER_ID.to_string(),
            icon: None,
            created_at: now,
            updated_at: now,
        };
        state.workspace = Some(workspace.clone());
        Ok(workspace)
    }

    async fn list_documents(&self, workspace_id: Uuid) -> Result<Vec<Document>, GatewayError> {
        let state = self.state.read().await;
        let mut docs: Vec<Document> = state
            .documents
            .iter()
            .filter(|d| d.workspace_id == workspace_id && !d.is_archived)
            .cloned()
            .collect();
        // Rows are appended on create, so this is already creation order;
        // the stable sort keeps ties in insertion order.
        docs.sort_by_key(|d| d.created_at);
        Ok(docs)
    }

    async fn get_document(&self, id: Uuid) -> Result<Document, GatewayError> {
        let state = self.state.read().await;
        state
            .documents
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or(GatewayError::DocumentNotFound(id))
    }

    async fn create_document(
        &self,
        workspace_id: Uuid,
        parent_id: Option<Uuid>,
    ) -> Result<Document, GatewayError> {
        let mut state = self.state.write().await;
        if let Some(parent) = parent_id {
            ensure_parent(&state.documents, workspace_id, None, parent)?;
        }
        let now = Utc::now();
        let doc = Document {
            id: Uuid::new_v4(),
            title: crate::UNTITLED.to_string(),
            content: Some(String::new()),
            workspace_id,
            parent_document_id: parent_id,
            user_id: crate::DEFAULT_USER_ID.to_string(),
            is_archived: false,
            is_published: false,
            icon: None,
            cover_image: None,
            created_at: now,
            updated_at: now,
        };
        state.documents.push(doc.clone());
        Ok(doc)
    }

    async fn update_document(
        &self,
        id: Uuid,
        patch: DocumentPatch,
    ) -> Result<Document, GatewayError> {
        let mut state = self.state.write().await;
        let index = state
            .documents
            .iter()
            .position(|d| d.id == id)
            .ok_or(GatewayError::DocumentNotFound(id))?;

        if let Some(Some(parent)) = patch.reparents() {
            let workspace_id = state.documents[index].workspace_id;
            ensure_parent(&state.documents, workspace_id, Some(id), parent)?;
        }

        let doc = &mut state.documents[index];
        patch.apply_to(doc);
        doc.updated_at = Utc::now();
        Ok(doc.clone())
    }

    async fn archive_document(&self, id: Uuid) -> Result<(), GatewayError> {
        let mut state = self.state.write().await;
        let doc = state
            .documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(GatewayError::DocumentNotFound(id))?;
        doc.is_archived = true;
        doc.updated_at = Utc::now();
        Ok(())
    }
}
