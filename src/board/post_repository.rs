//! Post data access: the [`PostSource`] collaborator and its SQLite
//! implementation.

use std::collections::HashMap;

use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::post::{NewPost, Post};
use crate::db::{Database, UserRepository};
use crate::{ForumError, Result};

/// Post lookups a `Thread` needs.
pub trait PostSource {
    /// Find a post by id. Soft-deleted posts are not returned.
    fn find(&self, id: i64) -> Result<Option<Post>>;

    /// One page of a thread's posts, newest first, skipping `exclude_id`.
    ///
    /// Which page is returned is decided by the source.
    fn paginate_thread(
        &self,
        thread_id: i64,
        exclude_id: Option<i64>,
        per_page: u32,
    ) -> Result<Vec<Post>>;

    /// Populate `user` on each post. Order is preserved.
    fn fill_users(&self, posts: Vec<Post>) -> Result<Vec<Post>>;
}

/// SQLite-backed posts.
///
/// The page served by [`PostSource::paginate_thread`] is fixed per
/// repository (1-based), typically taken from the request.
#[derive(Debug, Clone)]
pub struct PostRepository {
    db: Database,
    page: u32,
}

impl PostRepository {
    /// Repository serving the first page.
    pub fn new(db: Database) -> Self {
        Self { db, page: 1 }
    }

    /// Repository serving `page` (values below 1 are treated as 1).
    pub fn with_page(db: Database, page: u32) -> Self {
        Self {
            db,
            page: page.max(1),
        }
    }

    /// The page this repository serves.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Create a post, returning the stored row.
    pub fn create(&self, new_post: &NewPost) -> Result<Post> {
        self.db.conn().execute(
            "INSERT INTO posts (thread_id, user_id, body) VALUES (?, ?, ?)",
            params![new_post.thread_id, new_post.author_id, &new_post.body],
        )?;

        let id = self.db.conn().last_insert_rowid();
        self.find(id)?
            .ok_or_else(|| ForumError::NotFound("post".to_string()))
    }

    /// Mark a post deleted. Returns false if not found.
    pub fn soft_delete(&self, id: i64) -> Result<bool> {
        let affected = self.db.conn().execute(
            "UPDATE posts SET deleted_at = datetime('now') WHERE id = ? AND deleted_at IS NULL",
            [id],
        )?;
        Ok(affected > 0)
    }

    /// Count live posts in a thread.
    pub fn count_by_thread(&self, thread_id: i64) -> Result<i64> {
        let count = self.db.conn().query_row(
            "SELECT COUNT(*) FROM posts WHERE thread_id = ? AND deleted_at IS NULL",
            [thread_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

impl PostSource for PostRepository {
    fn find(&self, id: i64) -> Result<Option<Post>> {
        let sql = format!(
            "SELECT {} FROM posts WHERE id = ? AND deleted_at IS NULL",
            Post::COLUMNS
        );
        let post = self
            .db
            .conn()
            .query_row(&sql, [id], Post::from_row)
            .optional()?;
        Ok(post)
    }

    fn paginate_thread(
        &self,
        thread_id: i64,
        exclude_id: Option<i64>,
        per_page: u32,
    ) -> Result<Vec<Post>> {
        let limit = i64::from(per_page);
        let offset = i64::from(self.page - 1).saturating_mul(limit);
        debug!(thread_id, page = self.page, per_page, "paginating posts");

        let sql = format!(
            "SELECT {} FROM posts
             WHERE thread_id = ? AND deleted_at IS NULL AND (? IS NULL OR id != ?)
             ORDER BY created_at DESC, id DESC
             LIMIT ? OFFSET ?",
            Post::COLUMNS
        );

        let mut stmt = self.db.conn().prepare(&sql)?;
        let posts = stmt
            .query_map(
                params![thread_id, exclude_id, exclude_id, limit, offset],
                Post::from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(posts)
    }

    fn fill_users(&self, mut posts: Vec<Post>) -> Result<Vec<Post>> {
        let mut ids: Vec<i64> = posts.iter().map(|p| p.author_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let users: HashMap<i64, _> = UserRepository::new(&self.db)
            .find_many(&ids)?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        for post in &mut posts {
            post.user = users.get(&post.author_id).cloned();
        }

        Ok(posts)
    }
}
