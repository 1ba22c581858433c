//! Post and comment models.

use serde::{Deserialize, Serialize};

/// A comment attached to a post. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
}

/// A prompt troubleshooting submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub prompt: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub goal: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub dislikes: u64,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub user_id: i64,
}

impl Post {
    /// Whether the post carries every tag in `tags`.
    pub fn has_all_tags<'a>(&self, mut tags: impl Iterator<Item = &'a String>) -> bool {
        tags.all(|tag| self.tags.contains(tag))
    }
}

/// Which counter a vote increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Like,
    Dislike,
}

impl VoteDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteDirection::Like => "like",
            VoteDirection::Dislike => "dislike",
        }
    }
}

/// Request body for creating a new post.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub prompt: String,
    pub model: String,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub output: Option<String>,
    /// Raw comma separated tag list, as typed by the user.
    #[serde(default)]
    pub tags: String,
}

/// Request body for voting on a post.
#[derive(Debug, Clone, Deserialize)]
pub struct VoteRequest {
    pub direction: VoteDirection,
}

/// Request body for commenting on a post.
#[derive(Debug, Clone, Deserialize)]
pub struct AddCommentRequest {
    pub content: String,
}

/// Query parameters for listing posts.
///
/// Built from the raw query pairs so that `tag` may repeat:
/// `?q=gpt&tag=GPT-4&tag=summarization`. Each `tag` value is taken verbatim,
/// which is the only way to select the empty tag (`?tag=`). The older
/// comma separated `tags=a,b` form is still accepted; its blank tokens are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    /// Case-insensitive search term.
    pub q: String,
    /// Tags that must all be present.
    pub tags: Vec<String>,
}

impl PostQuery {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "q" => query.q = value,
                "tag" => query.push_tag(value),
                "tags" => value
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .for_each(|t| query.push_tag(t.to_string())),
                _ => {}
            }
        }
        query
    }

    fn push_tag(&mut self, tag: String) {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }
}

/// Request body for toggling one tag in a selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleTagRequest {
    #[serde(default)]
    pub selected: Vec<String>,
    pub tag: String,
}
