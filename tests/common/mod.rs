//! Test helpers for integration tests.
//!
//! Provides a file-backed forum fixture loaded from a TOML config.

#![allow(dead_code)]

use std::fs;

use tempfile::TempDir;

use forum_core::{
    Argon2Hasher, Config, Database, I18n, RouteTable, SqliteAuthorization, User, UserRepository,
};

/// A forum backed by a database in a temporary directory.
pub struct TestForum {
    _dir: TempDir,
    pub config: Config,
    pub db: Database,
    pub i18n: I18n,
    pub routes: RouteTable,
}

impl TestForum {
    /// Build a forum from a config file written into a fresh temp dir.
    pub fn new() -> Self {
        Self::with_extra_config("")
    }

    /// Same as [`TestForum::new`], appending `extra` to the config file.
    pub fn with_extra_config(extra: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("forum.db");
        let config_path = dir.path().join("config.toml");

        let content = format!(
            r#"
[database]
path = "{}"

[locale]
language = "en"

[password]
memory_kib = 1024
iterations = 1
parallelism = 1
{extra}
"#,
            db_path.display()
        );
        fs::write(&config_path, content).unwrap();

        let config = Config::load(&config_path).unwrap();
        let db = Database::open(&config.database.path).unwrap();
        let i18n = I18n::builtin(&config.locale.language).unwrap();
        let routes = RouteTable::new(config.routes.clone());

        Self {
            _dir: dir,
            config,
            db,
            i18n,
            routes,
        }
    }

    /// Cheap hasher from the fixture's config.
    pub fn hasher(&self) -> Argon2Hasher {
        Argon2Hasher::new(&self.config.password).unwrap()
    }

    /// Authorization provider using the configured group names.
    pub fn auth(&self) -> SqliteAuthorization {
        SqliteAuthorization::with_config(self.db.clone(), &self.config.auth)
    }

    /// Store a user with an email address.
    pub fn create_user(&self, username: &str, email: &str) -> User {
        let mut user = User::new(username);
        user.set_email(email).unwrap();
        UserRepository::new(&self.db).create(&user).unwrap()
    }
}
