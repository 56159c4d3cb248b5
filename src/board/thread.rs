//! Thread entity.
//!
//! A thread groups posts around one topic inside a forum and tracks view and
//! post counts. Related posts are resolved lazily through a [`PostSource`]
//! and cached on the instance; the caches are never persisted or shared.

use std::fmt;
use std::rc::Rc;

use html_escape::{encode_single_quoted_attribute, encode_text};
use rusqlite::Row;
use serde::Serialize;
use tracing::debug;

use super::post::Post;
use super::post_repository::{PostRepository, PostSource};
use crate::datetime::Humanizer;
use crate::db::{Database, User};
use crate::i18n::Localizer;
use crate::routing::{entity_slug, UrlResolver, THREAD_ROUTE};
use crate::{ForumError, Result};

/// Collaborators used to render thread summaries.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    /// Message catalog.
    pub localizer: &'a dyn Localizer,
    /// URL router.
    pub router: &'a dyn UrlResolver,
    /// Relative-time formatter.
    pub humanizer: &'a dyn Humanizer,
}

/// A discussion thread.
#[derive(Clone, Serialize)]
pub struct Thread {
    /// Unique thread ID (0 until stored).
    pub id: i64,
    /// ID of the user who started the thread (column `user_id`).
    pub author_id: i64,
    /// ID of the forum containing the thread.
    pub forum_id: i64,
    /// Thread title.
    pub title: String,
    /// ID of the opening post.
    pub first_post: Option<i64>,
    /// ID of the most recent post; absent means "same as `first_post`".
    pub last_post: Option<i64>,
    /// Number of times the thread was viewed.
    pub view_count: i64,
    /// Number of posts in the thread.
    pub post_count: i64,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: Option<String>,
    /// Soft-delete timestamp.
    pub deleted_at: Option<String>,

    /// Thread author, filled in by the repository.
    #[serde(skip)]
    pub user: Option<User>,
    #[serde(skip)]
    first_post_cache: Option<Post>,
    #[serde(skip)]
    last_post_cache: Option<Post>,
    #[serde(skip)]
    posts: Option<Vec<Post>>,
    #[serde(skip)]
    post_source: Option<Rc<dyn PostSource>>,
    #[serde(skip)]
    db: Option<Database>,
}

impl Thread {
    /// Column list matching [`Thread::from_row`].
    pub(crate) const COLUMNS: &'static str = "id, user_id, forum_id, title, first_post, \
         last_post, view_count, post_count, created_at, updated_at, deleted_at";

    /// Create an unsaved thread.
    pub fn new(forum_id: i64, author_id: i64, title: impl Into<String>) -> Self {
        Self {
            id: 0,
            author_id,
            forum_id,
            title: title.into(),
            first_post: None,
            last_post: None,
            view_count: 0,
            post_count: 0,
            created_at: String::new(),
            updated_at: None,
            deleted_at: None,
            user: None,
            first_post_cache: None,
            last_post_cache: None,
            posts: None,
            post_source: None,
            db: None,
        }
    }

    /// Map a row selected with [`Thread::COLUMNS`].
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let mut thread = Self::new(row.get(2)?, row.get(1)?, row.get::<_, String>(3)?);
        thread.id = row.get(0)?;
        thread.first_post = row.get(4)?;
        thread.last_post = row.get(5)?;
        thread.view_count = row.get(6)?;
        thread.post_count = row.get(7)?;
        thread.created_at = row.get(8)?;
        thread.updated_at = row.get(9)?;
        thread.deleted_at = row.get(10)?;
        Ok(thread)
    }

    /// Use `source` for every post lookup on this instance.
    pub fn set_post_source(&mut self, source: Rc<dyn PostSource>) -> &mut Self {
        self.post_source = Some(source);
        self
    }

    /// Database used to build the default [`PostRepository`] when no source
    /// was set.
    pub fn attach_database(&mut self, db: Database) -> &mut Self {
        self.db = Some(db);
        self
    }

    fn ensure_post_source(&mut self) -> Result<Rc<dyn PostSource>> {
        if let Some(source) = &self.post_source {
            return Ok(Rc::clone(source));
        }

        let db = self.db.clone().ok_or_else(|| {
            ForumError::Config(format!(
                "thread {} has neither a post source nor a database",
                self.id
            ))
        })?;

        let source: Rc<dyn PostSource> = Rc::new(PostRepository::new(db));
        self.post_source = Some(Rc::clone(&source));
        Ok(source)
    }

    fn resolve_post(&mut self, id: i64) -> Result<Option<Post>> {
        let source = self.ensure_post_source()?;

        let Some(post) = source.find(id)? else {
            debug!(thread_id = self.id, post_id = id, "post not found");
            return Ok(None);
        };

        Ok(source.fill_users(vec![post])?.into_iter().next())
    }

    /// Thread page URL.
    pub fn link(&self, router: &dyn UrlResolver) -> String {
        router
            .route_to(THREAD_ROUTE, &entity_slug(self.id, &self.title))
            .unwrap_or_default()
    }

    /// The opening post with its author, cached after the first lookup.
    pub fn first_post(&mut self) -> Result<Option<&Post>> {
        if self.first_post_cache.is_none() {
            let Some(id) = self.first_post else {
                return Ok(None);
            };
            self.first_post_cache = self.resolve_post(id)?;
        }

        Ok(self.first_post_cache.as_ref())
    }

    /// The latest post with its author, cached after the first lookup.
    ///
    /// Falls back to the opening post when no last post is recorded.
    pub fn last_post(&mut self) -> Result<Option<&Post>> {
        if self.last_post_cache.is_none() {
            let Some(id) = self.last_post.or(self.first_post) else {
                return Ok(None);
            };
            self.last_post_cache = self.resolve_post(id)?;
        }

        Ok(self.last_post_cache.as_ref())
    }

    /// Load one page of replies (all posts but the opening one), newest
    /// first, with authors, and keep it on the instance.
    pub fn populate_posts(&mut self, per_page: u32) -> Result<()> {
        let source = self.ensure_post_source()?;

        let mut posts = source.paginate_thread(self.id, self.first_post, per_page)?;
        if !posts.is_empty() {
            posts = source.fill_users(posts)?;
        }

        debug!(thread_id = self.id, count = posts.len(), "populated posts");
        self.posts = Some(posts);
        Ok(())
    }

    /// The cached page of replies, loading it while the cache is empty.
    ///
    /// `per_page` only matters for the load; once a non-empty page is cached
    /// it is returned as-is regardless of `per_page` until
    /// [`Thread::clear_posts`].
    pub fn posts(&mut self, per_page: u32) -> Result<&[Post]> {
        if self.posts.as_ref().map_or(true, Vec::is_empty) {
            self.populate_posts(per_page)?;
        }

        Ok(self.posts.as_deref().unwrap_or_default())
    }

    /// Drop the cached page of replies.
    pub fn clear_posts(&mut self) {
        self.posts = None;
    }

    /// Drop every post cache after the thread's posts changed.
    pub(crate) fn invalidate_post_caches(&mut self) {
        self.first_post_cache = None;
        self.last_post_cache = None;
        self.posts = None;
    }

    /// One-line summary of who started or last replied to the thread.
    ///
    /// Empty when the thread has no posts. With a single post it names the
    /// thread author; otherwise it links the author of the latest reply.
    pub fn user_summary_line(&mut self, ctx: &RenderContext<'_>) -> Result<String> {
        let Some(last_id) = self.last_post else {
            return Ok(String::new());
        };

        if self.first_post == Some(last_id) {
            let (user, link) = author_fields(self.user.as_ref(), ctx);
            let date = ctx.humanizer.humanize(&self.created_at);
            return Ok(ctx.localizer.t_with(
                "threads.user_summary_same",
                &[("user", &user), ("link", &link), ("date", &date)],
            ));
        }

        let fallback_date = self
            .updated_at
            .clone()
            .unwrap_or_else(|| self.created_at.clone());

        let (user, link, date) = match self.last_post()? {
            Some(post) => {
                let (user, link) = author_fields(post.user.as_ref(), ctx);
                (user, link, ctx.humanizer.humanize(&post.created_at))
            }
            None => {
                let (user, link) = author_fields(None, ctx);
                (user, link, ctx.humanizer.humanize(&fallback_date))
            }
        };

        Ok(ctx.localizer.t_with(
            "threads.user_summary_different",
            &[("user", &user), ("link", &link), ("date", &date)],
        ))
    }
}

/// Escaped display name and profile link, or the catalog's unknown-user name.
fn author_fields(user: Option<&User>, ctx: &RenderContext<'_>) -> (String, String) {
    match user {
        Some(u) => (
            encode_text(&u.username).into_owned(),
            encode_single_quoted_attribute(&u.link(ctx.router)).into_owned(),
        ),
        None => (
            encode_text(&ctx.localizer.t_with("users.unknown", &[])).into_owned(),
            String::new(),
        ),
    }
}

/// Data for creating a new thread.
#[derive(Debug, Clone)]
pub struct NewThread {
    /// ID of the forum to create the thread in.
    pub forum_id: i64,
    /// ID of the user starting the thread.
    pub author_id: i64,
    /// Thread title.
    pub title: String,
}

impl NewThread {
    /// Create a new thread with required fields.
    pub fn new(forum_id: i64, author_id: i64, title: impl Into<String>) -> Self {
        Self {
            forum_id,
            author_id,
            title: title.into(),
        }
    }
}

impl fmt::Debug for Thread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thread")
            .field("id", &self.id)
            .field("author_id", &self.author_id)
            .field("forum_id", &self.forum_id)
            .field("title", &self.title)
            .field("first_post", &self.first_post)
            .field("last_post", &self.last_post)
            .field("view_count", &self.view_count)
            .field("post_count", &self.post_count)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .field("deleted_at", &self.deleted_at)
            .finish_non_exhaustive()
    }
}
