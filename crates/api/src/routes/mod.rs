pub mod documents;
pub mod health;
pub mod workspace;

use axum::Router;

use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(workspace::routes())
        .merge(documents::routes())
        .with_state(state)
}
