//! Tag API endpoints.

use axum::{extract::State, Json};

use super::{success, ApiResult};
use crate::models::ToggleTagRequest;
use crate::store::toggle_tag_selection;
use crate::AppState;

/// GET /api/tags - List every tag in use, first-seen order.
pub async fn list_tags(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    let (tags, revision_id) = state.forum.all_tags().await;
    success(tags, revision_id)
}

/// POST /api/tags/toggle - Toggle one tag in a client-side selection.
pub async fn toggle_tag(
    State(state): State<AppState>,
    Json(request): Json<ToggleTagRequest>,
) -> ApiResult<Vec<String>> {
    let revision_id = state.forum.revision().await;
    success(
        toggle_tag_selection(&request.selected, &request.tag),
        revision_id,
    )
}
