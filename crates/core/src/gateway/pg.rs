//! PostgreSQL gateway backend.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::document::model::{Document, DocumentPatch, Workspace};
use crate::document::validate::{normalize_title, ValidationError};
use crate::gateway::{
    Gateway, GatewayError, MSG_ARCHIVE_DOCUMENT, MSG_CREATE_DOCUMENT, MSG_LOAD_DOCUMENTS,
    MSG_LOAD_WORKSPACE, MSG_SAVE_CHANGES,
};

const WORKSPACE_COLUMNS: &str = "id, name, user_id, icon, created_at, updated_at";

const DOCUMENT_COLUMNS: &str = "id, title, content, workspace_id, parent_document_id, user_id, \
     is_archived, is_published, icon, cover_image, created_at, updated_at";

pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Log the backend failure and hand the caller the static message.
    fn unavailable(msg: &'static str) -> impl FnOnce(sqlx::Error) -> GatewayError {
        move |err| {
            tracing::error!(error = %err, "{msg}");
            GatewayError::Unavailable(msg)
        }
    }

    /// Validate a prospective parent for `child` (None on create): it must
    /// exist in `workspace_id`, and for a reparent must not be the child
    /// itself or sit below it.
    async fn check_parent(
        &self,
        workspace_id: Uuid,
        child: Option<Uuid>,
        parent: Uuid,
        msg: &'static str,
    ) -> Result<(), GatewayError> {
        if child == Some(parent) {
            return Err(ValidationError::SelfParent(parent).into());
        }

        let parent_workspace: Option<Uuid> =
            sqlx::query_scalar("SELECT workspace_id FROM documents WHERE id = $1")
                .bind(parent)
                .fetch_optional(&self.pool)
                .await
                .map_err(Self::unavailable(msg))?;
        match parent_workspace {
            None => return Err(ValidationError::UnknownParent(parent).into()),
            Some(ws) if ws != workspace_id => {
                return Err(ValidationError::ParentOutsideWorkspace(parent).into())
            }
            Some(_) => {}
        }

        if let Some(child) = child {
            // The move closes a loop exactly when the child already sits on
            // the prospective parent's ancestor chain.
            let cycle: bool = sqlx::query_scalar(
                "WITH RECURSIVE ancestors(id, parent_document_id) AS ( \
                     SELECT id, parent_document_id FROM documents WHERE id = $1 \
                     UNION ALL \
                     SELECT d.id, d.parent_document_id \
                     FROM documents d \
                     JOIN ancestors a ON d.id = a.parent_document_id \
                 ) \
                 SELECT EXISTS (SELECT 1 FROM ancestors WHERE id = $2)",
            )
            .bind(parent)
            .bind(child)
            .fetch_one(&self.pool)
            .await
            .map_err(Self::unavailable(msg))?;
            if cycle {
                return Err(ValidationError::Cycle {
                    document: child,
                    parent,
                }
                .into());
            }
        }

        Ok(())
    }
}

#[async_trait]
impl Gateway for PgGateway {
    async fn get_or_create_workspace(&self) -> Result<Workspace, GatewayError> {
        let existing = sqlx::query_as::<_, Workspace>(&format!(
            "SELECT {WORKSPACE_COLUMNS} FROM workspaces WHERE user_id = $1 LIMIT 1"
        ))
        .bind(crate::DEFAULT_USER_ID)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::unavailable(MSG_LOAD_WORKSPACE))?;

        if let Some(workspace) = existing {
            return Ok(workspace);
        }

        sqlx::query_as::<_, Workspace>(&format!(
            "INSERT INTO workspaces (name, user_id) VALUES ($1, $2) RETURNING {WORKSPACE_COLUMNS}"
        ))
        .bind(crate::DEFAULT_WORKSPACE_NAME)
        .bind(crate::DEFAULT_USER_ID)
        .fetch_one(&self.pool)
        .await
        .map_err(Self::unavailable(MSG_LOAD_WORKSPACE))
    }

    async fn list_documents(&self, workspace_id: Uuid) -> Result<Vec<Document>, GatewayError> {
        sqlx::query_as::<_, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents \
             WHERE workspace_id = $1 AND is_archived = FALSE \
             ORDER BY created_at ASC"
        ))
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Self::unavailable(MSG_LOAD_DOCUMENTS))
    }

    async fn get_document(&self, id: Uuid) -> Result<Document, GatewayError> {
        sqlx::query_as::<_, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::unavailable(MSG_LOAD_DOCUMENTS))?
        .ok_or(GatewayError::DocumentNotFound(id))
    }

    async fn create_document(
        &self,
        workspace_id: Uuid,
        parent_id: Option<Uuid>,
    ) -> Result<Document, GatewayError> {
        if let Some(parent) = parent_id {
            self.check_parent(workspace_id, None, parent, MSG_CREATE_DOCUMENT)
                .await?;
        }

        sqlx::query_as::<_, Document>(&format!(
            "INSERT INTO documents (title, content, workspace_id, parent_document_id, user_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(crate::UNTITLED)
        .bind("")
        .bind(workspace_id)
        .bind(parent_id)
        .bind(crate::DEFAULT_USER_ID)
        .fetch_one(&self.pool)
        .await
        .map_err(Self::unavailable(MSG_CREATE_DOCUMENT))
    }

    async fn update_document(
        &self,
        id: Uuid,
        patch: DocumentPatch,
    ) -> Result<Document, GatewayError> {
        let current = self.get_document(id).await?;

        if let Some(Some(parent)) = patch.reparents() {
            self.check_parent(current.workspace_id, Some(id), parent, MSG_SAVE_CHANGES)
                .await?;
        }

        // Assemble the SET list from the fields the patch names; the bind
        // order below must mirror this order.
        let mut sets = vec!["updated_at = NOW()".to_string()];
        let mut idx = 1;
        let mut push = |column: &str, sets: &mut Vec<String>| {
            sets.push(format!("{column} = ${idx}"));
            idx += 1;
        };
        if patch.title.is_some() {
            push("title", &mut sets);
        }
        if patch.content.is_some() {
            push("content", &mut sets);
        }
        if patch.parent_document_id.is_some() {
            push("parent_document_id", &mut sets);
        }
        if patch.is_published.is_some() {
            push("is_published", &mut sets);
        }
        if patch.icon.is_some() {
            push("icon", &mut sets);
        }
        if patch.cover_image.is_some() {
            push("cover_image", &mut sets);
        }

        let sql = format!(
            "UPDATE documents SET {} WHERE id = ${} RETURNING {DOCUMENT_COLUMNS}",
            sets.join(", "),
            idx
        );

        let mut query = sqlx::query_as::<_, Document>(&sql);
        if let Some(title) = &patch.title {
            query = query.bind(normalize_title(title));
        }
        if let Some(content) = &patch.content {
            query = query.bind(content.clone());
        }
        if let Some(parent) = patch.parent_document_id {
            query = query.bind(parent);
        }
        if let Some(published) = patch.is_published {
            query = query.bind(published);
        }
        if let Some(icon) = &patch.icon {
            query = query.bind(icon.clone());
        }
        if let Some(cover) = &patch.cover_image {
            query = query.bind(cover.clone());
        }

        query
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(Self::unavailable(MSG_SAVE_CHANGES))
    }

    async fn archive_document(&self, id: Uuid) -> Result<(), GatewayError> {
        let result =
            sqlx::query("UPDATE documents SET is_archived = TRUE, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(Self::unavailable(MSG_ARCHIVE_DOCUMENT))?;
        if result.rows_affected() == 0 {
            return Err(GatewayError::DocumentNotFound(id));
        }
        Ok(())
    }
}
