//! In-memory post store.
//!
//! All operations are synchronous. The post collection is copy-on-write: an
//! effective mutation installs a new collection and a new allocation for the
//! touched post, while untouched posts keep their allocation. Consumers can
//! detect change with `Arc::ptr_eq`.

use std::sync::Arc;

use crate::errors::AppError;
use crate::models::{Comment, NewPost, Post, User, VoteDirection};

use super::filter::{compute_all_tags, compute_visible_posts, parse_tags};

/// Shared, immutable post listing, most recent first.
pub type PostList = Arc<Vec<Arc<Post>>>;

/// Posts, registered users and the logged-in identity.
#[derive(Debug, Clone)]
pub struct PostStore {
    posts: PostList,
    users: Vec<User>,
    current_user: Option<User>,
    revision: i64,
    next_post_id: i64,
    next_comment_id: i64,
    next_user_id: i64,
}

impl Default for PostStore {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new(), None)
    }
}

impl PostStore {
    /// Build a store from persisted state. `posts` must already be most recent first.
    pub fn new(posts: Vec<Post>, users: Vec<User>, current_user: Option<User>) -> Self {
        let next_post_id = posts.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let next_comment_id = posts
            .iter()
            .flat_map(|p| p.comments.iter())
            .map(|c| c.id)
            .max()
            .unwrap_or(0)
            + 1;
        let next_user_id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;

        Self {
            posts: Arc::new(posts.into_iter().map(Arc::new).collect()),
            users,
            current_user,
            revision: 0,
            next_post_id,
            next_comment_id,
            next_user_id,
        }
    }

    /// Resume counting from a previously persisted revision.
    pub fn with_revision(mut self, revision: i64) -> Self {
        self.revision = revision;
        self
    }

    pub fn posts(&self) -> &PostList {
        &self.posts
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// Incremented on every effective mutation.
    pub fn revision(&self) -> i64 {
        self.revision
    }

    pub fn get(&self, post_id: i64) -> Option<&Arc<Post>> {
        self.posts.iter().find(|p| p.id == post_id)
    }

    /// Create a post authored by `author` and insert it at the head of the listing.
    pub fn create_post(
        &mut self,
        input: NewPost,
        author: Option<&User>,
    ) -> Result<Arc<Post>, AppError> {
        let author = author.ok_or(AppError::NotAuthenticated)?;

        let post = Arc::new(Post {
            id: self.next_post_id,
            title: input.title,
            prompt: input.prompt,
            model: input.model,
            output: input.output,
            goal: input.goal,
            likes: 0,
            dislikes: 0,
            comments: Vec::new(),
            tags: parse_tags(&input.tags),
            user_id: author.id,
        });
        self.next_post_id += 1;

        let mut posts = Vec::with_capacity(self.posts.len() + 1);
        posts.push(Arc::clone(&post));
        posts.extend(self.posts.iter().cloned());
        self.install(posts);

        Ok(post)
    }

    /// Increment one counter of a post. Unknown ids are a no-op returning `None`.
    pub fn vote(&mut self, post_id: i64, direction: VoteDirection) -> Option<Arc<Post>> {
        let index = self.index_of(post_id)?;

        let mut post = Post::clone(&self.posts[index]);
        match direction {
            VoteDirection::Like => post.likes += 1,
            VoteDirection::Dislike => post.dislikes += 1,
        }

        Some(self.replace(index, post))
    }

    /// Append a comment to a post. Unknown ids are a no-op returning `Ok(None)`.
    pub fn add_comment(
        &mut self,
        post_id: i64,
        author: Option<&User>,
        content: &str,
    ) -> Result<Option<Arc<Post>>, AppError> {
        let author = author.ok_or(AppError::NotAuthenticated)?;

        if content.trim().is_empty() {
            return Err(AppError::Validation(
                "Comment must not be empty".to_string(),
            ));
        }

        let Some(index) = self.index_of(post_id) else {
            return Ok(None);
        };

        let mut post = Post::clone(&self.posts[index]);
        post.comments.push(Comment {
            id: self.next_comment_id,
            user_id: author.id,
            content: content.to_string(),
        });
        self.next_comment_id += 1;

        Ok(Some(self.replace(index, post)))
    }

    /// Posts visible under the given search term and tag selection.
    pub fn visible_posts(&self, search_term: &str, selected_tags: &[String]) -> Vec<Arc<Post>> {
        compute_visible_posts(&self.posts, search_term, selected_tags)
    }

    /// Every tag in use, first-seen order.
    pub fn all_tags(&self) -> Vec<String> {
        compute_all_tags(&self.posts)
    }

    /// Register a new user. Usernames are unique, compared case-insensitively.
    pub fn register_user(&mut self, username: &str) -> Result<User, AppError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::Validation("Username is required".to_string()));
        }
        if self
            .users
            .iter()
            .any(|u| u.username.eq_ignore_ascii_case(username))
        {
            return Err(AppError::Validation(format!(
                "Username {} is already taken",
                username
            )));
        }

        let user = User {
            id: self.next_user_id,
            username: username.to_string(),
            reputation: 0,
        };
        self.next_user_id += 1;
        self.users.push(user.clone());
        self.revision += 1;
        Ok(user)
    }

    /// Make the registered user `user_id` the current identity.
    pub fn login(&mut self, user_id: i64) -> Option<User> {
        let user = self.users.iter().find(|u| u.id == user_id)?.clone();
        self.current_user = Some(user.clone());
        self.revision += 1;
        Some(user)
    }

    /// Clear the current identity. Returns whether anybody was logged in.
    pub fn logout(&mut self) -> bool {
        let was_logged_in = self.current_user.take().is_some();
        if was_logged_in {
            self.revision += 1;
        }
        was_logged_in
    }

    fn index_of(&self, post_id: i64) -> Option<usize> {
        self.posts.iter().position(|p| p.id == post_id)
    }

    fn replace(&mut self, index: usize, post: Post) -> Arc<Post> {
        let post = Arc::new(post);
        let mut posts = (*self.posts).clone();
        posts[index] = Arc::clone(&post);
        self.install(posts);
        post
    }

    fn install(&mut self, posts: Vec<Arc<Post>>) {
        self.posts = Arc::new(posts);
        self.revision += 1;
    }
}
