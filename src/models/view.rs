//! Read-side views with resolved author names.

use serde::{Deserialize, Serialize};

use super::{Comment, Post, User};

/// Display name used when a referenced user no longer exists.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// A comment together with its author's username.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: String,
}

/// A post together with the usernames it references.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: i64,
    pub title: String,
    pub prompt: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub goal: String,
    pub likes: u64,
    pub dislikes: u64,
    pub comments: Vec<CommentView>,
    pub tags: Vec<String>,
    pub user_id: i64,
    pub author: String,
}

impl PostView {
    /// Build a view, resolving user ids against `users`.
    pub fn new(post: &Post, users: &[User]) -> Self {
        let comments = post
            .comments
            .iter()
            .map(|c| CommentView {
                comment: c.clone(),
                author: author_name(users, c.user_id).to_string(),
            })
            .collect();

        Self {
            id: post.id,
            title: post.title.clone(),
            prompt: post.prompt.clone(),
            model: post.model.clone(),
            output: post.output.clone(),
            goal: post.goal.clone(),
            likes: post.likes,
            dislikes: post.dislikes,
            comments,
            tags: post.tags.clone(),
            user_id: post.user_id,
            author: author_name(users, post.user_id).to_string(),
        }
    }
}

/// Username for `user_id`, or [`UNKNOWN_AUTHOR`].
pub fn author_name(users: &[User], user_id: i64) -> &str {
    users
        .iter()
        .find(|u| u.id == user_id)
        .map(|u| u.username.as_str())
        .unwrap_or(UNKNOWN_AUTHOR)
}

/// The full forum state as seen by a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumSnapshot {
    pub revision_id: i64,
    pub generated_at: String,
    pub posts: Vec<PostView>,
    pub users: Vec<User>,
    pub current_user: Option<User>,
}
