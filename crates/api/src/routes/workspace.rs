use axum::{extract::State, routing::get, Json, Router};

use treehouse_core::Workspace;

use crate::error::ApiResult;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/workspace", get(get_workspace))
}

/// The default user's workspace, created lazily on first access.
async fn get_workspace(State(state): State<AppState>) -> ApiResult<Json<Workspace>> {
    let workspace = state.gateway().get_or_create_workspace().await?;
    Ok(Json(workspace))
}
