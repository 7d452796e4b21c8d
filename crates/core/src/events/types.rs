use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events emitted after successful document mutations, consumed by live
/// listeners (and by tests watching a session).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorkspaceEvent {
    DocumentCreated(DocumentEvent),
    DocumentUpdated(DocumentEvent),
    DocumentArchived(DocumentEvent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEvent {
    pub workspace_id: Uuid,
    pub document_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

impl DocumentEvent {
    pub fn now(workspace_id: Uuid, document_id: Uuid) -> Self {
        Self {
            workspace_id,
            document_id,
            timestamp: Utc::now(),
        }
    }
}

impl WorkspaceEvent {
    /// The document the event is about, whichever lifecycle step it marks.
    pub fn document_id(&self) -> Uuid {
        match self {
            WorkspaceEvent::DocumentCreated(e)
            | WorkspaceEvent::DocumentUpdated(e)
            | WorkspaceEvent::DocumentArchived(e) => e.document_id,
        }
    }
}
