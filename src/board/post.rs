//! Post entity.

use rusqlite::Row;
use serde::Serialize;

use crate::db::User;

/// A message in a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    /// Unique post ID.
    pub id: i64,
    /// ID of the thread this post belongs to.
    pub thread_id: i64,
    /// ID of the user who wrote the post (column `user_id`).
    pub author_id: i64,
    /// Post body.
    pub body: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last edit timestamp.
    pub updated_at: Option<String>,
    /// Soft-delete timestamp.
    pub deleted_at: Option<String>,
    /// Author, once filled in by a `PostSource`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl Post {
    /// Column list matching [`Post::from_row`].
    pub(crate) const COLUMNS: &'static str =
        "id, thread_id, user_id, body, created_at, updated_at, deleted_at";

    /// Map a row selected with [`Post::COLUMNS`].
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            thread_id: row.get(1)?,
            author_id: row.get(2)?,
            body: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
            deleted_at: row.get(6)?,
            user: None,
        })
    }

    /// Check if the post has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Data for creating a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// ID of the thread to post in.
    pub thread_id: i64,
    /// ID of the user creating the post.
    pub author_id: i64,
    /// Post body.
    pub body: String,
}

impl NewPost {
    /// Create a new post with required fields.
    pub fn new(thread_id: i64, author_id: i64, body: impl Into<String>) -> Self {
        Self {
            thread_id,
            author_id,
            body: body.into(),
        }
    }
}
