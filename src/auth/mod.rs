//! Identity extraction.
//!
//! The forum has a single current identity, set and cleared through the session
//! routes. Handlers that create content take an [`Author`], which rejects the
//! request with `NOT_AUTHENTICATED` when nobody is logged in.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::errors::{AppError, AppErrorWithRevision};
use crate::models::User;
use crate::AppState;

/// The logged-in user on whose behalf a request creates content.
#[derive(Debug, Clone)]
pub struct Author(pub User);

impl FromRequestParts<AppState> for Author {
    type Rejection = AppErrorWithRevision;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match state.forum.current_user().await {
            Some(user) => Ok(Author(user)),
            None => {
                tracing::debug!(uri = %parts.uri, "Rejected request without a current user");
                Err(AppErrorWithRevision {
                    error: AppError::NotAuthenticated,
                    revision_id: state.forum.revision().await,
                })
            }
        }
    }
}
