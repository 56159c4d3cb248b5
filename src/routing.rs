//! Named routes and URL slugs for rendered links.

use std::collections::HashMap;

use crate::config::{default_routes, RoutesConfig};

/// Route name for thread pages.
pub const THREAD_ROUTE: &str = "threadLink";

/// Route name for user profile pages.
pub const USER_ROUTE: &str = "userLink";

/// Maps a named route plus slug to a URL.
pub trait UrlResolver {
    /// Resolve `name` with `slug`, or `None` if the route is unknown.
    fn route_to(&self, name: &str, slug: &str) -> Option<String>;
}

/// Route table of `{slug}` path patterns.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: HashMap<String, String>,
}

impl RouteTable {
    /// Build a table from configured patterns.
    pub fn new(routes: RoutesConfig) -> Self {
        Self { routes }
    }

    /// Add or replace a route.
    pub fn insert(&mut self, name: impl Into<String>, pattern: impl Into<String>) {
        self.routes.insert(name.into(), pattern.into());
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(default_routes())
    }
}

impl UrlResolver for RouteTable {
    fn route_to(&self, name: &str, slug: &str) -> Option<String> {
        self.routes
            .get(name)
            .map(|pattern| pattern.replace("{slug}", slug))
    }
}

/// Turn a title into a URL-safe, lower-cased slug.
///
/// Characters other than alphanumerics, whitespace, `_` and `-` are dropped;
/// whitespace runs become a single `-`.
///
/// ```
/// use forum_core::routing::url_title;
///
/// assert_eq!(url_title("Hello, World!"), "hello-world");
/// assert_eq!(url_title("  Rust -- 2024 edition  "), "rust-2024-edition");
/// ```
pub fn url_title(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_sep = false;

    for c in title.chars() {
        if c.is_whitespace() || c == '-' {
            pending_sep = true;
        } else if c.is_alphanumeric() || c == '_' {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.extend(c.to_lowercase());
        }
    }

    slug
}

/// Build the `"{id}-{url_title}"` slug used by entity links.
///
/// The dash is kept even when the title slugs to nothing.
pub fn entity_slug(id: i64, title: &str) -> String {
    format!("{id}-{}", url_title(title))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_title_strips_punctuation() {
        assert_eq!(url_title("What's new in v1.2?"), "whats-new-in-v12");
    }

    #[test]
    fn test_url_title_collapses_separators() {
        assert_eq!(url_title("a  -  b"), "a-b");
        assert_eq!(url_title("--lead and trail--"), "lead-and-trail");
    }

    #[test]
    fn test_url_title_keeps_underscores_and_unicode() {
        assert_eq!(url_title("snake_case Ünïcode"), "snake_case-ünïcode");
        assert_eq!(url_title("掲示板 テスト"), "掲示板-テスト");
    }

    #[test]
    fn test_url_title_empty() {
        assert_eq!(url_title("!!!"), "");
    }

    #[test]
    fn test_entity_slug() {
        assert_eq!(entity_slug(42, "Hello World"), "42-hello-world");
        assert_eq!(entity_slug(7, "???"), "7-");
        assert_eq!(entity_slug(3, ""), "3-");
    }

    #[test]
    fn test_route_table_default() {
        let routes = RouteTable::default();
        assert_eq!(
            routes.route_to(THREAD_ROUTE, "1-hi"),
            Some("/threads/1-hi".to_string())
        );
        assert_eq!(
            routes.route_to(USER_ROUTE, "2-bob"),
            Some("/users/2-bob".to_string())
        );
        assert_eq!(routes.route_to("missing", "x"), None);
    }

    #[test]
    fn test_route_table_insert() {
        let mut routes = RouteTable::default();
        routes.insert(THREAD_ROUTE, "/forum/t/{slug}/");
        assert_eq!(
            routes.route_to(THREAD_ROUTE, "3-x"),
            Some("/forum/t/3-x/".to_string())
        );
    }
}
