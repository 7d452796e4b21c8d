//! Persistence boundary.
//!
//! UI intents cross into storage through the [`Gateway`] trait; failures
//! come back as values, never panics. Backend errors are logged where they
//! happen and surfaced with a static human-facing message, so callers can
//! show a notice without leaking driver details.

pub mod memory;
pub mod pg;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::document::model::{Document, DocumentPatch, Workspace};
use crate::document::validate::ValidationError;

// User-facing failure messages, one per operation.
pub(crate) const MSG_LOAD_WORKSPACE: &str = "Failed to load workspace";
pub(crate) const MSG_LOAD_DOCUMENTS: &str = "Failed to load documents";
pub(crate) const MSG_CREATE_DOCUMENT: &str = "Failed to create document";
pub(crate) const MSG_SAVE_CHANGES: &str = "Failed to save changes";
pub(crate) const MSG_ARCHIVE_DOCUMENT: &str = "Failed to archive document";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    /// The backing store failed; the cause was logged, the message is safe
    /// to show to the user.
    #[error("{0}")]
    Unavailable(&'static str),

    #[error("document {0} not found")]
    DocumentNotFound(Uuid),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Injectable store interface. One instance per process for the Postgres
/// backend; tests construct a fresh [`memory::MemoryGateway`] each.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Look up the single workspace of the default user, creating it on
    /// first access.
    async fn get_or_create_workspace(&self) -> Result<Workspace, GatewayError>;

    /// Non-archived documents of a workspace, oldest first.
    async fn list_documents(&self, workspace_id: Uuid) -> Result<Vec<Document>, GatewayError>;

    /// Direct lookup by id; archived documents are returned too.
    async fn get_document(&self, id: Uuid) -> Result<Document, GatewayError>;

    /// Insert a placeholder-titled, empty page, optionally under a parent
    /// in the same workspace.
    async fn create_document(
        &self,
        workspace_id: Uuid,
        parent_id: Option<Uuid>,
    ) -> Result<Document, GatewayError>;

    /// Merge the patch, stamp `updated_at`, return the updated row. Last
    /// write wins; there is no revision check.
    async fn update_document(
        &self,
        id: Uuid,
        patch: DocumentPatch,
    ) -> Result<Document, GatewayError>;

    /// Soft-delete: flips `is_archived`, leaves descendants alone.
    async fn archive_document(&self, id: Uuid) -> Result<(), GatewayError>;
}
