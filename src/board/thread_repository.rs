//! Thread repository.
//!
//! Soft-deleted threads (`deleted_at` set) are invisible to every lookup.

use rusqlite::{params, OptionalExtension};
use tracing::{debug, info};

use super::post::{NewPost, Post};
use super::post_repository::PostRepository;
use super::thread::{NewThread, Thread};
use crate::db::{Database, UserRepository};
use crate::{ForumError, Result};

/// Repository for thread CRUD operations.
pub struct ThreadRepository<'a> {
    db: &'a Database,
}

impl<'a> ThreadRepository<'a> {
    /// Create a new ThreadRepository with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create an empty thread.
    ///
    /// Returns the created thread with the assigned ID.
    pub fn create(&self, new_thread: &NewThread) -> Result<Thread> {
        self.db.conn().execute(
            "INSERT INTO threads (user_id, forum_id, title) VALUES (?, ?, ?)",
            params![new_thread.author_id, new_thread.forum_id, &new_thread.title],
        )?;

        let id = self.db.conn().last_insert_rowid();
        debug!(thread_id = id, forum_id = new_thread.forum_id, "created thread");
        self.find(id)?
            .ok_or_else(|| ForumError::NotFound("thread".to_string()))
    }

    /// Create a thread together with its opening post.
    pub fn start(&self, new_thread: &NewThread, body: &str) -> Result<Thread> {
        let tx = self.db.transaction()?;

        let mut thread = self.create(new_thread)?;
        let post = PostRepository::new(self.db.clone()).create(&NewPost::new(
            thread.id,
            new_thread.author_id,
            body,
        ))?;
        self.record_post(&mut thread, &post)?;

        tx.commit()?;
        info!(thread_id = thread.id, "started thread");
        Ok(thread)
    }

    /// Find a live thread by ID, with its author loaded.
    ///
    /// The returned thread can resolve its posts on its own.
    pub fn find(&self, id: i64) -> Result<Option<Thread>> {
        let sql = format!(
            "SELECT {} FROM threads WHERE id = ? AND deleted_at IS NULL",
            Thread::COLUMNS
        );
        let thread = self
            .db
            .conn()
            .query_row(&sql, [id], Thread::from_row)
            .optional()?;

        thread.map(|t| self.hydrate(t)).transpose()
    }

    /// List live threads in a forum, most recently active first.
    pub fn list_by_forum(&self, forum_id: i64, offset: i64, limit: i64) -> Result<Vec<Thread>> {
        let sql = format!(
            "SELECT {} FROM threads
             WHERE forum_id = ? AND deleted_at IS NULL
             ORDER BY COALESCE(updated_at, created_at) DESC, id DESC
             LIMIT ? OFFSET ?",
            Thread::COLUMNS
        );

        let mut stmt = self.db.conn().prepare(&sql)?;
        let threads = stmt
            .query_map(params![forum_id, limit, offset], Thread::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        threads.into_iter().map(|t| self.hydrate(t)).collect()
    }

    fn hydrate(&self, mut thread: Thread) -> Result<Thread> {
        thread.user = UserRepository::new(self.db).find(thread.author_id)?;
        thread.attach_database(self.db.clone());
        Ok(thread)
    }

    /// Register `post` as the thread's newest post.
    ///
    /// The first recorded post becomes `first_post`. Updates `thread` in
    /// place and drops its cached posts.
    pub fn record_post(&self, thread: &mut Thread, post: &Post) -> Result<()> {
        let affected = self.db.conn().execute(
            "UPDATE threads
             SET first_post = COALESCE(first_post, ?1), last_post = ?1,
                 post_count = post_count + 1, updated_at = datetime('now')
             WHERE id = ?2 AND deleted_at IS NULL",
            params![post.id, thread.id],
        )?;

        if affected == 0 {
            return Err(ForumError::NotFound("thread".to_string()));
        }

        let (first_post, last_post, post_count, updated_at): (
            Option<i64>,
            Option<i64>,
            i64,
            Option<String>,
        ) = self.db.conn().query_row(
            "SELECT first_post, last_post, post_count, updated_at FROM threads WHERE id = ?",
            [thread.id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )?;

        thread.first_post = first_post;
        thread.last_post = last_post;
        thread.post_count = post_count;
        thread.updated_at = updated_at;
        thread.invalidate_post_caches();

        debug!(thread_id = thread.id, post_id = post.id, "recorded post");
        Ok(())
    }

    /// Bump the stored view count. Returns false if not found.
    pub fn increment_view_count(&self, id: i64) -> Result<bool> {
        let affected = self.db.conn().execute(
            "UPDATE threads SET view_count = view_count + 1
             WHERE id = ? AND deleted_at IS NULL",
            [id],
        )?;
        Ok(affected > 0)
    }

    /// Count a view of `thread`, keeping the instance in step.
    pub fn record_view(&self, thread: &mut Thread) -> Result<()> {
        if !self.increment_view_count(thread.id)? {
            return Err(ForumError::NotFound("thread".to_string()));
        }
        thread.view_count += 1;
        Ok(())
    }

    /// Mark a thread deleted. Returns false if not found.
    pub fn soft_delete(&self, id: i64) -> Result<bool> {
        let affected = self.db.conn().execute(
            "UPDATE threads SET deleted_at = datetime('now') WHERE id = ? AND deleted_at IS NULL",
            [id],
        )?;
        Ok(affected > 0)
    }
}
