//! Whole-forum API endpoints.

use axum::extract::State;

use super::{success, ApiResult};
use crate::models::{ForumSnapshot, User};
use crate::AppState;

/// GET /api/forum - Get posts, users and the current identity in one call.
pub async fn get_forum(State(state): State<AppState>) -> ApiResult<ForumSnapshot> {
    let snapshot = state.forum.snapshot().await;
    let revision_id = snapshot.revision_id;
    success(snapshot, revision_id)
}

/// GET /api/users - List registered users.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let (users, revision_id) = state.forum.users().await;
    success(users, revision_id)
}
