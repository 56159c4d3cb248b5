//! Board module.
//!
//! This module provides the discussion side of the forum:
//! - Threads with lazily resolved, per-instance cached posts
//! - Posts and the `PostSource` lookup interface
//! - SQLite repositories for both

mod post;
mod post_repository;
mod thread;
mod thread_repository;

pub use post::{NewPost, Post};
pub use post_repository::{PostRepository, PostSource};
pub use thread::{NewThread, RenderContext, Thread};
pub use thread_repository::ThreadRepository;
