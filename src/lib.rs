//! Forum core
//!
//! Thread and user entities for a discussion forum, backed by SQLite.

pub mod auth;
pub mod board;
pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod routing;

pub use auth::{
    verify_password, Argon2Hasher, AuthorizationProvider, Groups, PasswordError,
    SqliteAuthorization, ValidationError,
};
pub use board::{
    NewPost, NewThread, Post, PostRepository, PostSource, RenderContext, Thread,
    ThreadRepository,
};
pub use config::Config;
pub use datetime::{Humanizer, RelativeTime};
pub use db::{Database, User, UserRepository};
pub use error::{ErrorKind, ForumError, Result};
pub use i18n::{I18n, Localizer};
pub use routing::{RouteTable, UrlResolver};
