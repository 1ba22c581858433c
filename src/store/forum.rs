//! Async shell around [`PostStore`].
//!
//! Serializes access to the store and writes every effective mutation through
//! to the key-value store. A failed write restores the previous in-memory state.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::db::{KvBatch, KvStore};
use crate::errors::AppError;
use crate::models::{ForumSnapshot, NewPost, Post, PostView, User, VoteDirection};

use super::post_store::PostStore;
use super::seed::{demo_posts, demo_users};

pub struct Forum {
    kv: KvStore,
    store: Mutex<PostStore>,
}

/// A value together with the revision of the state it was read from.
pub type AtRevision<T> = (T, i64);

impl Forum {
    /// Load persisted state, seeding demo content into an empty store when asked to.
    pub async fn load(kv: KvStore, seed_demo: bool) -> Result<Self, AppError> {
        let posts = kv.load_posts().await?;
        let users = kv.load_users().await?;
        let current_user = kv.load_current_user().await?;
        let revision = kv.load_revision().await?.unwrap_or(0);

        let store = if posts.is_none() && users.is_none() && seed_demo {
            let store = PostStore::new(demo_posts(), demo_users(), None).with_revision(revision);
            let batch = KvBatch::new()
                .posts(store.posts().iter().map(Arc::as_ref))?
                .users(store.users())?
                .revision(store.revision());
            kv.commit(batch).await?;
            tracing::info!(
                posts = store.posts().len(),
                users = store.users().len(),
                "Seeded demo content"
            );
            store
        } else {
            PostStore::new(
                posts.unwrap_or_default(),
                users.unwrap_or_default(),
                current_user,
            )
            .with_revision(revision)
        };

        tracing::info!(
            posts = store.posts().len(),
            users = store.users().len(),
            logged_in = store.current_user().is_some(),
            revision = store.revision(),
            "Forum loaded"
        );

        Ok(Self {
            kv,
            store: Mutex::new(store),
        })
    }

    /// Current revision of the in-memory state.
    pub async fn revision(&self) -> i64 {
        self.store.lock().await.revision()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.store.lock().await.current_user().cloned()
    }

    pub async fn session(&self) -> AtRevision<Option<User>> {
        let store = self.store.lock().await;
        (store.current_user().cloned(), store.revision())
    }

    pub async fn users(&self) -> AtRevision<Vec<User>> {
        let store = self.store.lock().await;
        (store.users().to_vec(), store.revision())
    }

    /// Full state with resolved author names.
    pub async fn snapshot(&self) -> ForumSnapshot {
        let store = self.store.lock().await;
        ForumSnapshot {
            revision_id: store.revision(),
            generated_at: Utc::now().to_rfc3339(),
            posts: views(store.posts(), store.users()),
            users: store.users().to_vec(),
            current_user: store.current_user().cloned(),
        }
    }

    pub async fn visible_posts(
        &self,
        search_term: &str,
        selected_tags: &[String],
    ) -> AtRevision<Vec<PostView>> {
        let store = self.store.lock().await;
        let posts = views(
            &store.visible_posts(search_term, selected_tags),
            store.users(),
        );
        (posts, store.revision())
    }

    pub async fn all_tags(&self) -> AtRevision<Vec<String>> {
        let store = self.store.lock().await;
        (store.all_tags(), store.revision())
    }

    pub async fn get_post(&self, post_id: i64) -> AtRevision<Option<PostView>> {
        let store = self.store.lock().await;
        let post = store
            .get(post_id)
            .map(|post| PostView::new(post, store.users()));
        (post, store.revision())
    }

    pub async fn create_post(
        &self,
        input: NewPost,
        author: &User,
    ) -> Result<AtRevision<PostView>, AppError> {
        let mut store = self.store.lock().await;
        let before = store.clone();

        let post = store.create_post(input, Some(author))?;
        self.write_through(&mut store, before, |s| {
            KvBatch::new().posts(s.posts().iter().map(Arc::as_ref))
        })
        .await?;

        tracing::info!(post_id = post.id, author = %author.username, "Post created");
        Ok((PostView::new(&post, store.users()), store.revision()))
    }

    pub async fn vote(
        &self,
        post_id: i64,
        direction: VoteDirection,
    ) -> Result<AtRevision<Option<PostView>>, AppError> {
        let mut store = self.store.lock().await;
        let before = store.clone();

        let Some(post) = store.vote(post_id, direction) else {
            tracing::debug!(post_id, "Vote on unknown post ignored");
            return Ok((None, store.revision()));
        };
        self.write_through(&mut store, before, |s| {
            KvBatch::new().posts(s.posts().iter().map(Arc::as_ref))
        })
        .await?;

        tracing::debug!(post_id, direction = direction.as_str(), "Vote recorded");
        Ok((Some(PostView::new(&post, store.users())), store.revision()))
    }

    pub async fn add_comment(
        &self,
        post_id: i64,
        author: &User,
        content: &str,
    ) -> Result<AtRevision<Option<PostView>>, AppError> {
        let mut store = self.store.lock().await;
        let before = store.clone();

        let Some(post) = store.add_comment(post_id, Some(author), content)? else {
            tracing::debug!(post_id, "Comment on unknown post ignored");
            return Ok((None, store.revision()));
        };
        self.write_through(&mut store, before, |s| {
            KvBatch::new().posts(s.posts().iter().map(Arc::as_ref))
        })
        .await?;

        tracing::info!(post_id, author = %author.username, "Comment added");
        Ok((Some(PostView::new(&post, store.users())), store.revision()))
    }

    /// Register a user and log them in.
    pub async fn register(&self, username: &str) -> Result<AtRevision<User>, AppError> {
        let mut store = self.store.lock().await;
        let before = store.clone();

        let user = store.register_user(username)?;
        store.login(user.id);
        self.write_through(&mut store, before, |s| {
            KvBatch::new().users(s.users())?.current_user(s.current_user())
        })
        .await?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok((user, store.revision()))
    }

    /// Log in as an existing user.
    pub async fn login(&self, user_id: i64) -> Result<AtRevision<User>, AppError> {
        let mut store = self.store.lock().await;
        let before = store.clone();

        let user = store
            .login(user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;
        self.write_through(&mut store, before, |s| {
            KvBatch::new().current_user(s.current_user())
        })
        .await?;

        tracing::info!(user_id, "User logged in");
        Ok((user, store.revision()))
    }

    pub async fn logout(&self) -> Result<i64, AppError> {
        let mut store = self.store.lock().await;
        let before = store.clone();

        if !store.logout() {
            return Ok(store.revision());
        }
        self.write_through(&mut store, before, |s| {
            KvBatch::new().current_user(s.current_user())
        })
        .await?;

        tracing::info!("User logged out");
        Ok(store.revision())
    }

    /// Persist the keys `build` selects plus the new revision, or restore `before`.
    async fn write_through(
        &self,
        store: &mut PostStore,
        before: PostStore,
        build: impl FnOnce(&PostStore) -> Result<KvBatch, AppError>,
    ) -> Result<(), AppError> {
        let result = match build(store) {
            Ok(batch) => self.kv.commit(batch.revision(store.revision())).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            tracing::warn!("Failed to persist forum state, rolling back: {}", e);
            *store = before;
            return Err(e);
        }
        Ok(())
    }
}

fn views(posts: &[Arc<Post>], users: &[User]) -> Vec<PostView> {
    posts.iter().map(|post| PostView::new(post, users)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use sqlx::SqlitePool;
    use tempfile::TempDir;

    async fn open(dir: &TempDir, seed_demo: bool) -> Forum {
        open_with_pool(dir, seed_demo).await.0
    }

    async fn open_with_pool(dir: &TempDir, seed_demo: bool) -> (Forum, SqlitePool) {
        let pool = init_database(&dir.path().join("forum.sqlite"))
            .await
            .unwrap();
        let forum = Forum::load(KvStore::new(pool.clone()), seed_demo)
            .await
            .unwrap();
        (forum, pool)
    }

    fn new_post(title: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            prompt: "p".to_string(),
            model: "Claude".to_string(),
            goal: "g".to_string(),
            output: None,
            tags: "persistence".to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_forum_without_seed() {
        let dir = TempDir::new().unwrap();
        let forum = open(&dir, false).await;
        let snapshot = forum.snapshot().await;
        assert!(snapshot.posts.is_empty());
        assert!(snapshot.users.is_empty());
        assert!(snapshot.current_user.is_none());
        assert_eq!(snapshot.revision_id, 0);
    }

    #[tokio::test]
    async fn test_seeded_forum_lists_demo_posts() {
        let dir = TempDir::new().unwrap();
        let forum = open(&dir, true).await;
        let (posts, _) = forum.visible_posts("", &[]).await;
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].author, "ai_enthusiast");
        assert_eq!(forum.users().await.0.len(), 3);
    }

    #[tokio::test]
    async fn test_mutations_survive_reload() {
        let dir = TempDir::new().unwrap();
        {
            let forum = open(&dir, true).await;
            let (user, _) = forum.login(2).await.unwrap();
            let (post, _) = forum
                .create_post(new_post("Persist me"), &user)
                .await
                .unwrap();
            forum.vote(post.id, VoteDirection::Like).await.unwrap();
            let (commented, _) = forum
                .add_comment(post.id, &user, "saved?")
                .await
                .unwrap();
            assert!(commented.is_some());
        }

        let forum = open(&dir, true).await;
        assert_eq!(forum.current_user().await.map(|u| u.id), Some(2));

        let (posts, _) = forum.visible_posts("persist", &[]).await;
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].likes, 1);
        assert_eq!(posts[0].comments[0].comment.content, "saved?");
        assert_eq!(posts[0].comments[0].author, "ai_enthusiast");
        assert_eq!(forum.all_tags().await.0[0], "persistence");
    }

    #[tokio::test]
    async fn test_revision_does_not_go_backwards_across_reload() {
        let dir = TempDir::new().unwrap();
        let revision_before = {
            let forum = open(&dir, true).await;
            for _ in 0..3 {
                forum.vote(1, VoteDirection::Like).await.unwrap();
            }
            forum.revision().await
        };
        assert_eq!(revision_before, 3);

        let forum = open(&dir, true).await;
        assert_eq!(forum.revision().await, revision_before);

        let (_, revision) = forum.vote(2, VoteDirection::Dislike).await.unwrap();
        assert_eq!(revision, revision_before + 1);
    }

    #[tokio::test]
    async fn test_mutations_report_their_own_revision() {
        let dir = TempDir::new().unwrap();
        let forum = open(&dir, true).await;

        let (user, after_login) = forum.login(1).await.unwrap();
        let (_, after_create) = forum.create_post(new_post("r"), &user).await.unwrap();
        let (_, after_vote) = forum.vote(1, VoteDirection::Like).await.unwrap();
        let after_logout = forum.logout().await.unwrap();

        assert_eq!(after_create, after_login + 1);
        assert_eq!(after_vote, after_create + 1);
        assert_eq!(after_logout, after_vote + 1);
        assert_eq!(forum.snapshot().await.revision_id, after_logout);
    }

    #[tokio::test]
    async fn test_failed_write_rolls_back() {
        let dir = TempDir::new().unwrap();
        let (forum, pool) = open_with_pool(&dir, true).await;
        let (user, _) = forum.login(1).await.unwrap();
        let before = forum.snapshot().await;

        pool.close().await;

        let err = forum.vote(1, VoteDirection::Like).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));

        let err = forum
            .create_post(new_post("lost"), &user)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));

        let err = forum
            .add_comment(1, &user, "lost too")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));

        let err = forum.register("ghost").await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));

        let err = forum.logout().await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));

        let after = forum.snapshot().await;
        assert_eq!(after.revision_id, before.revision_id);
        assert_eq!(
            serde_json::to_value(&after.posts).unwrap(),
            serde_json::to_value(&before.posts).unwrap()
        );
        assert_eq!(after.users.len(), 3);
        assert_eq!(after.current_user, Some(user));
    }

    #[tokio::test]
    async fn test_vote_unknown_post_keeps_revision() {
        let dir = TempDir::new().unwrap();
        let forum = open(&dir, true).await;
        let revision = forum.revision().await;
        let (post, reported) = forum.vote(1000, VoteDirection::Dislike).await.unwrap();
        assert!(post.is_none());
        assert_eq!(reported, revision);
        assert_eq!(forum.revision().await, revision);
    }

    #[tokio::test]
    async fn test_register_logs_in_and_logout_clears() {
        let dir = TempDir::new().unwrap();
        let forum = open(&dir, true).await;

        let (user, _) = forum.register("new_voice").await.unwrap();
        assert_eq!(forum.current_user().await, Some(user));

        forum.logout().await.unwrap();
        assert!(forum.session().await.0.is_none());

        let err = forum.login(999).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
