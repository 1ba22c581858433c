//! Post API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::auth::Author;
use crate::errors::AppError;
use crate::models::{AddCommentRequest, NewPost, PostQuery, PostView, VoteRequest};
use crate::AppState;

/// GET /api/posts - List posts matching the search term and tag selection.
///
/// Query pairs are taken raw so that `tag` may repeat.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Vec<PostView>> {
    let query = PostQuery::from_pairs(pairs);
    let (posts, revision_id) = state.forum.visible_posts(&query.q, &query.tags).await;
    success(posts, revision_id)
}

/// GET /api/posts/:id - Get a single post.
pub async fn get_post(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<PostView> {
    match state.forum.get_post(id).await {
        (Some(post), revision_id) => success(post, revision_id),
        (None, revision_id) => error(
            AppError::NotFound(format!("Post {} not found", id)),
            revision_id,
        ),
    }
}

/// POST /api/posts - Create a new post as the current user.
pub async fn create_post(
    State(state): State<AppState>,
    Author(author): Author,
    Json(request): Json<NewPost>,
) -> ApiResult<PostView> {
    if request.title.trim().is_empty() {
        return error(
            AppError::Validation("Title is required".to_string()),
            state.forum.revision().await,
        );
    }

    match state.forum.create_post(request, &author).await {
        Ok((post, revision_id)) => success(post, revision_id),
        Err(e) => error(e, state.forum.revision().await),
    }
}

/// POST /api/posts/:id/vote - Like or dislike a post.
///
/// Voting on an unknown post succeeds with `null` data.
pub async fn vote_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<VoteRequest>,
) -> ApiResult<Option<PostView>> {
    match state.forum.vote(id, request.direction).await {
        Ok((post, revision_id)) => success(post, revision_id),
        Err(e) => error(e, state.forum.revision().await),
    }
}

/// POST /api/posts/:id/comments - Comment on a post as the current user.
///
/// Commenting on an unknown post succeeds with `null` data.
pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Author(author): Author,
    Json(request): Json<AddCommentRequest>,
) -> ApiResult<Option<PostView>> {
    match state.forum.add_comment(id, &author, &request.content).await {
        Ok((post, revision_id)) => success(post, revision_id),
        Err(e) => error(e, state.forum.revision().await),
    }
}
