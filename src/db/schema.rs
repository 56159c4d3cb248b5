//! Database schema and migrations.
//!
//! Migrations are applied in order; `schema_version` records which ran.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: users
    r#"
CREATE TABLE users (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    email            TEXT UNIQUE,
    username         TEXT NOT NULL UNIQUE,
    password_hash    TEXT NOT NULL DEFAULT '',   -- Argon2id PHC string
    reset_hash       TEXT,
    activate_hash    TEXT,
    status           TEXT,                       -- 'banned' or free text
    status_message   TEXT,
    active           INTEGER NOT NULL DEFAULT 0,
    force_pass_reset INTEGER NOT NULL DEFAULT 0,
    deleted          INTEGER NOT NULL DEFAULT 0,
    created_at       TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at       TEXT
);

CREATE INDEX idx_users_deleted ON users(deleted);
"#,
    // v2: threads and posts
    r#"
CREATE TABLE threads (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id),
    forum_id    INTEGER NOT NULL,
    title       TEXT NOT NULL,
    first_post  INTEGER,
    last_post   INTEGER,
    view_count  INTEGER NOT NULL DEFAULT 0,
    post_count  INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at  TEXT,
    deleted_at  TEXT
);

CREATE INDEX idx_threads_forum ON threads(forum_id, deleted_at);

CREATE TABLE posts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    thread_id   INTEGER NOT NULL REFERENCES threads(id),
    user_id     INTEGER NOT NULL REFERENCES users(id),
    body        TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at  TEXT,
    deleted_at  TEXT
);

CREATE INDEX idx_posts_thread ON posts(thread_id, created_at);
"#,
    // v3: groups and permissions
    r#"
CREATE TABLE auth_groups (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT ''
);

CREATE TABLE auth_permissions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT ''
);

CREATE TABLE auth_groups_users (
    group_id    INTEGER NOT NULL REFERENCES auth_groups(id) ON DELETE CASCADE,
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    PRIMARY KEY (group_id, user_id)
);

CREATE TABLE auth_groups_permissions (
    group_id      INTEGER NOT NULL REFERENCES auth_groups(id) ON DELETE CASCADE,
    permission_id INTEGER NOT NULL REFERENCES auth_permissions(id) ON DELETE CASCADE,
    PRIMARY KEY (group_id, permission_id)
);

CREATE TABLE auth_users_permissions (
    user_id       INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    permission_id INTEGER NOT NULL REFERENCES auth_permissions(id) ON DELETE CASCADE,
    PRIMARY KEY (user_id, permission_id)
);
"#,
];
