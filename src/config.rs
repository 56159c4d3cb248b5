//! Configuration module for the forum core.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::{ForumError, Result};

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/forum.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Locale configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LocaleConfig {
    /// Language code (en / ja).
    #[serde(default = "default_language")]
    pub language: String,
    /// Directory holding `<language>.toml` catalogs.
    #[serde(default = "default_locales_path")]
    pub locales_path: String,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_locales_path() -> String {
    "locales".to_string()
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            locales_path: default_locales_path(),
        }
    }
}

/// Authorization group names used by the role helpers on `User`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Group checked by `User::is_admin`.
    #[serde(default = "default_admin_group")]
    pub admin_group: String,
    /// Group checked by `User::is_moderator`.
    #[serde(default = "default_moderator_group")]
    pub moderator_group: String,
}

fn default_admin_group() -> String {
    "admins".to_string()
}

fn default_moderator_group() -> String {
    "moderators".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_group: default_admin_group(),
            moderator_group: default_moderator_group(),
        }
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordConfig {
    /// Memory cost in KiB.
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    /// Time cost (iterations).
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Degree of parallelism.
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_memory_kib() -> u32 {
    65536
}

fn default_iterations() -> u32 {
    3
}

fn default_parallelism() -> u32 {
    4
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

/// Pagination configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    /// Posts per thread page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_per_page() -> u32 {
    20
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/forum.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Named route patterns. Each pattern contains a `{slug}` placeholder.
pub type RoutesConfig = HashMap<String, String>;

/// Default route table.
pub fn default_routes() -> RoutesConfig {
    let mut routes = HashMap::new();
    routes.insert("threadLink".to_string(), "/threads/{slug}".to_string());
    routes.insert("userLink".to_string(), "/users/{slug}".to_string());
    routes
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Locale configuration.
    #[serde(default)]
    pub locale: LocaleConfig,
    /// Route patterns, merged over the defaults.
    #[serde(default = "default_routes")]
    pub routes: RoutesConfig,
    /// Authorization group names.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Password hashing parameters.
    #[serde(default)]
    pub password: PasswordConfig,
    /// Pagination configuration.
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            locale: LocaleConfig::default(),
            routes: default_routes(),
            auth: AuthConfig::default(),
            password: PasswordConfig::default(),
            pagination: PaginationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ForumError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// Routes given in the file are merged over the default route table, so a
    /// file that only overrides `threadLink` still resolves `userLink`.
    pub fn parse(s: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(s).map_err(|e| ForumError::Config(format!("config parse error: {e}")))?;

        for (name, pattern) in default_routes() {
            config.routes.entry(name).or_insert(pattern);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.pagination.per_page == 0 {
            return Err(ForumError::Config(
                "pagination.per_page must be at least 1".to_string(),
            ));
        }

        if let Some((name, _)) = self
            .routes
            .iter()
            .find(|(_, pattern)| !pattern.contains("{slug}"))
        {
            return Err(ForumError::Config(format!(
                "route '{name}' has no {{slug}} placeholder"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.database.path, "data/forum.db");
        assert_eq!(config.locale.language, "en");
        assert_eq!(config.locale.locales_path, "locales");
        assert_eq!(config.auth.admin_group, "admins");
        assert_eq!(config.auth.moderator_group, "moderators");
        assert_eq!(config.password.memory_kib, 65536);
        assert_eq!(config.password.iterations, 3);
        assert_eq!(config.password.parallelism, 4);
        assert_eq!(config.pagination.per_page, 20);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.routes["threadLink"], "/threads/{slug}");
        assert_eq!(config.routes["userLink"], "/users/{slug}");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[database]
path = "custom/forum.sqlite"

[locale]
language = "ja"
locales_path = "/etc/forum/locales"

[routes]
threadLink = "/t/{slug}"
userLink = "/u/{slug}"

[auth]
admin_group = "staff"
moderator_group = "mods"

[password]
memory_kib = 19456
iterations = 2
parallelism = 1

[pagination]
per_page = 50

[logging]
level = "debug"
file = "/var/log/forum.log"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.database.path, "custom/forum.sqlite");
        assert_eq!(config.locale.language, "ja");
        assert_eq!(config.locale.locales_path, "/etc/forum/locales");
        assert_eq!(config.routes["threadLink"], "/t/{slug}");
        assert_eq!(config.routes["userLink"], "/u/{slug}");
        assert_eq!(config.auth.admin_group, "staff");
        assert_eq!(config.auth.moderator_group, "mods");
        assert_eq!(config.password.memory_kib, 19456);
        assert_eq!(config.password.iterations, 2);
        assert_eq!(config.password.parallelism, 1);
        assert_eq!(config.pagination.per_page, 50);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "/var/log/forum.log");
    }

    #[test]
    fn test_parse_partial_routes_keeps_defaults() {
        let toml = r#"
[routes]
threadLink = "/t/{slug}"
"#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.routes["threadLink"], "/t/{slug}");
        assert_eq!(config.routes["userLink"], "/users/{slug}");
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.database.path, "data/forum.db");
        assert_eq!(config.pagination.per_page, 20);
        assert_eq!(config.routes.len(), 2);
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        assert!(result.is_err());
        if let Err(ForumError::Config(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("expected Config error");
        }
    }

    #[test]
    fn test_zero_per_page_rejected() {
        let result = Config::parse("[pagination]\nper_page = 0\n");
        assert!(matches!(result, Err(ForumError::Config(_))));
    }

    #[test]
    fn test_route_without_slug_rejected() {
        let result = Config::parse("[routes]\nthreadLink = \"/threads\"\n");
        match result {
            Err(ForumError::Config(msg)) => assert!(msg.contains("threadLink")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forum.toml");
        std::fs::write(&path, "[database]\npath = \"x.db\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.database.path, "x.db");
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/forum.toml");
        assert!(matches!(result, Err(ForumError::Io(_))));
    }
}
