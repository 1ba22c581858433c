//! JSON key-value store over SQLite.
//!
//! Mirrors a browser profile's local storage: string keys, JSON values, last write wins.
//! Writes go through a [`KvBatch`] so that every key touched by one mutation lands in a
//! single transaction, together with the revision it produced.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{Post, User};

/// Key holding the array of posts.
pub const POSTS_KEY: &str = "posts";
/// Key holding the array of registered users.
pub const USERS_KEY: &str = "users";
/// Key holding the logged-in user, absent when logged out.
pub const CURRENT_USER_KEY: &str = "user";
/// Key holding the revision of the last committed mutation.
pub const REVISION_KEY: &str = "revision";

/// A set of key writes committed atomically. `None` removes the key.
#[derive(Debug, Default)]
pub struct KvBatch {
    entries: Vec<(&'static str, Option<String>)>,
}

impl KvBatch {
    pub fn new() -> Self {
        Self::default()
    }

    fn put<T: Serialize + ?Sized>(mut self, key: &'static str, value: &T) -> Result<Self, AppError> {
        self.entries
            .push((key, Some(serde_json::to_string(value)?)));
        Ok(self)
    }

    /// Replace the full post collection.
    pub fn posts<'a>(self, posts: impl IntoIterator<Item = &'a Post>) -> Result<Self, AppError> {
        let posts: Vec<&Post> = posts.into_iter().collect();
        self.put(POSTS_KEY, &posts)
    }

    /// Replace the full user list.
    pub fn users(self, users: &[User]) -> Result<Self, AppError> {
        self.put(USERS_KEY, users)
    }

    /// Set or clear the logged-in user.
    pub fn current_user(mut self, user: Option<&User>) -> Result<Self, AppError> {
        match user {
            Some(user) => self.put(CURRENT_USER_KEY, user),
            None => {
                self.entries.push((CURRENT_USER_KEY, None));
                Ok(self)
            }
        }
    }

    /// Record the revision this batch brings the store to.
    pub fn revision(mut self, revision: i64) -> Self {
        self.entries.push((REVISION_KEY, Some(revision.to_string())));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Key-value store for all persisted forum state.
#[derive(Clone)]
pub struct KvStore {
    pool: SqlitePool,
}

impl KvStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Read the raw JSON value stored under `key`.
    pub async fn get(&self, key: &str) -> Result<Option<Value>, AppError> {
        let row = sqlx::query("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let raw: String = row.get("value");
                let value = serde_json::from_str(&raw).map_err(|e| {
                    AppError::Database(format!("Unreadable value under key {}: {}", key, e))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Apply every write in `batch` in one transaction.
    pub async fn commit(&self, batch: KvBatch) -> Result<(), AppError> {
        if batch.is_empty() {
            return Ok(());
        }

        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        for (key, value) in &batch.entries {
            match value {
                Some(raw) => {
                    sqlx::query(
                        "INSERT INTO kv (key, value, updated_at) VALUES (?, ?, ?) \
                         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                    )
                    .bind(*key)
                    .bind(raw)
                    .bind(&now)
                    .execute(&mut *tx)
                    .await?;
                }
                None => {
                    sqlx::query("DELETE FROM kv WHERE key = ?")
                        .bind(*key)
                        .execute(&mut *tx)
                        .await?;
                }
            }
        }

        tx.commit().await?;
        tracing::debug!(keys = batch.entries.len(), "kv batch committed");
        Ok(())
    }

    async fn get_typed<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError> {
        match self.get(key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value).map_err(|e| {
                AppError::Database(format!("Corrupt value under key {}: {}", key, e))
            })?)),
            None => Ok(None),
        }
    }

    /// Load the persisted posts, `None` if nothing was ever stored.
    pub async fn load_posts(&self) -> Result<Option<Vec<Post>>, AppError> {
        self.get_typed(POSTS_KEY).await
    }

    /// Load the registered users, `None` if nothing was ever stored.
    pub async fn load_users(&self) -> Result<Option<Vec<User>>, AppError> {
        self.get_typed(USERS_KEY).await
    }

    /// Load the logged-in user.
    pub async fn load_current_user(&self) -> Result<Option<User>, AppError> {
        self.get_typed(CURRENT_USER_KEY).await
    }

    /// Load the revision of the last committed mutation.
    pub async fn load_revision(&self) -> Result<Option<i64>, AppError> {
        self.get_typed(REVISION_KEY).await
    }
}
