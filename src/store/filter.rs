//! Pure list operations behind the post listing: search, tag filter, tag cloud.

use std::sync::Arc;

use crate::models::Post;

/// Split a raw comma separated tag string into a post's tag set.
///
/// Tokens are trimmed. Empty tokens are kept; a token repeated within the
/// same string is kept once, at its first position.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for token in raw.split(',').map(str::trim) {
        if !tags.iter().any(|t| t == token) {
            tags.push(token.to_string());
        }
    }
    tags
}

/// Whether `post` matches `search_term` on title, prompt or model, ignoring case.
pub fn matches_search(post: &Post, search_term: &str) -> bool {
    let needle = search_term.to_lowercase();
    [&post.title, &post.prompt, &post.model]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Posts matching the search term and carrying every selected tag, in input order.
pub fn compute_visible_posts(
    all_posts: &[Arc<Post>],
    search_term: &str,
    selected_tags: &[String],
) -> Vec<Arc<Post>> {
    all_posts
        .iter()
        .filter(|post| matches_search(post, search_term))
        .filter(|post| selected_tags.is_empty() || post.has_all_tags(selected_tags.iter()))
        .cloned()
        .collect()
}

/// Union of all post tags without duplicates, in first-seen order.
pub fn compute_all_tags(all_posts: &[Arc<Post>]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in all_posts.iter().flat_map(|post| post.tags.iter()) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}

/// Add `tag` to the selection if absent, remove it if present.
pub fn toggle_tag_selection(selected_tags: &[String], tag: &str) -> Vec<String> {
    if selected_tags.iter().any(|t| t == tag) {
        selected_tags.iter().filter(|t| *t != tag).cloned().collect()
    } else {
        let mut next = selected_tags.to_vec();
        next.push(tag.to_string());
        next
    }
}
