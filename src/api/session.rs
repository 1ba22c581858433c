//! Session API endpoints. Login and registration are stubs without credentials.

use axum::{extract::State, Json};

use super::{error, success, ApiResult};
use crate::models::{LoginRequest, RegisterRequest, User};
use crate::AppState;

/// GET /api/session - Get the current user, `null` when logged out.
pub async fn get_session(State(state): State<AppState>) -> ApiResult<Option<User>> {
    let (user, revision_id) = state.forum.session().await;
    success(user, revision_id)
}

/// POST /api/session - Log in as an existing user.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<User> {
    match state.forum.login(request.user_id).await {
        Ok((user, revision_id)) => success(user, revision_id),
        Err(e) => error(e, state.forum.revision().await),
    }
}

/// POST /api/session/register - Register a user and log them in.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<User> {
    match state.forum.register(&request.username).await {
        Ok((user, revision_id)) => success(user, revision_id),
        Err(e) => error(e, state.forum.revision().await),
    }
}

/// DELETE /api/session - Log out.
pub async fn logout(State(state): State<AppState>) -> ApiResult<()> {
    match state.forum.logout().await {
        Ok(revision_id) => success((), revision_id),
        Err(e) => error(e, state.forum.revision().await),
    }
}
