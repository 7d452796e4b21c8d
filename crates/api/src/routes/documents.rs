use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use treehouse_core::events::{DocumentEvent, WorkspaceEvent};
use treehouse_core::{Document, DocumentPatch};

use crate::error::ApiResult;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/workspaces/{workspace_id}/documents",
            get(list_documents).post(create_document),
        )
        .route(
            "/v1/documents/{id}",
            get(get_document).patch(update_document),
        )
        .route("/v1/documents/{id}/archive", post(archive_document))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateDocumentBody {
    parent_document_id: Option<Uuid>,
}

/// Non-archived documents of a workspace, oldest first.
async fn list_documents(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Document>>> {
    let documents = state.gateway().list_documents(workspace_id).await?;
    Ok(Json(documents))
}

/// Create a placeholder page, root or under a parent in the workspace.
async fn create_document(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
    body: Option<Json<CreateDocumentBody>>,
) -> ApiResult<(StatusCode, Json<Document>)> {
    let parent = body.and_then(|Json(body)| body.parent_document_id);
    let document = state.gateway().create_document(workspace_id, parent).await?;

    let _ = state.event_bus().publish(WorkspaceEvent::DocumentCreated(
        DocumentEvent::now(workspace_id, document.id),
    ));

    Ok((StatusCode::CREATED, Json(document)))
}

/// Direct lookup by id; archived documents are returned too.
async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Document>> {
    let document = state.gateway().get_document(id).await?;
    Ok(Json(document))
}

/// Merge a partial update; last write wins.
async fn update_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<DocumentPatch>,
) -> ApiResult<Json<Document>> {
    let document = state.gateway().update_document(id, patch).await?;

    let _ = state.event_bus().publish(WorkspaceEvent::DocumentUpdated(
        DocumentEvent::now(document.workspace_id, document.id),
    ));

    Ok(Json(document))
}

/// Soft-delete. Descendants stay listed; nothing cascades.
async fn archive_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    // Fetch first so the event can carry the workspace id.
    let document = state.gateway().get_document(id).await?;
    state.gateway().archive_document(id).await?;

    let _ = state.event_bus().publish(WorkspaceEvent::DocumentArchived(
        DocumentEvent::now(document.workspace_id, id),
    ));

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_body_accepts_a_missing_parent() {
        let body: CreateDocumentBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.parent_document_id, None);
    }

    #[test]
    fn patch_body_distinguishes_null_from_missing() {
        let patch: DocumentPatch =
            serde_json::from_str(r#"{"title":"Plans","parentDocumentId":null}"#).unwrap();
        assert_eq!(patch.title.as_deref(), Some("Plans"));
        assert_eq!(patch.parent_document_id, Some(None));
        assert_eq!(patch.content, None);
    }
}
