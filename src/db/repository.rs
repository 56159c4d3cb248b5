//! User repository.
//!
//! Soft-deleted users (`deleted = 1`) are invisible to every lookup.

use rusqlite::{params, params_from_iter, OptionalExtension};
use tracing::debug;

use super::user::User;
use super::Database;
use crate::auth::validation::validate_user;
use crate::{ForumError, Result};

/// Repository for user CRUD operations.
pub struct UserRepository<'a> {
    db: &'a Database,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Validate and insert a user, returning the stored row.
    pub fn create(&self, user: &User) -> Result<User> {
        validate_user(user)?;

        self.db.conn().execute(
            "INSERT INTO users (email, username, password_hash, reset_hash, activate_hash,
                                status, status_message, active, force_pass_reset)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                user.email(),
                &user.username,
                user.password_hash(),
                &user.reset_hash,
                &user.activate_hash,
                &user.status,
                &user.status_message,
                user.active,
                user.force_pass_reset,
            ],
        )?;

        let id = self.db.conn().last_insert_rowid();
        debug!(user_id = id, "created user");
        self.find(id)?
            .ok_or_else(|| ForumError::NotFound("user".to_string()))
    }

    /// Find a user by ID.
    pub fn find(&self, id: i64) -> Result<Option<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE id = ? AND deleted = 0",
            User::COLUMNS
        );
        let user = self
            .db
            .conn()
            .query_row(&sql, [id], User::from_row)
            .optional()?;
        Ok(user)
    }

    /// Find several users at once. Missing ids are skipped.
    pub fn find_many(&self, ids: &[i64]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT {} FROM users WHERE deleted = 0 AND id IN ({placeholders})",
            User::COLUMNS
        );

        let mut stmt = self.db.conn().prepare(&sql)?;
        let users = stmt
            .query_map(params_from_iter(ids.iter()), User::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(users)
    }

    /// Find a user by email (case-insensitive).
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE email = ? AND deleted = 0",
            User::COLUMNS
        );
        let user = self
            .db
            .conn()
            .query_row(&sql, [email.to_lowercase()], User::from_row)
            .optional()?;
        Ok(user)
    }

    /// Find a user by username.
    pub fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE username = ? AND deleted = 0",
            User::COLUMNS
        );
        let user = self
            .db
            .conn()
            .query_row(&sql, [username], User::from_row)
            .optional()?;
        Ok(user)
    }

    /// Validate and write back a user's mutable fields.
    ///
    /// Returns the stored row, or `None` if the user does not exist.
    pub fn save(&self, user: &User) -> Result<Option<User>> {
        validate_user(user)?;

        let affected = self.db.conn().execute(
            "UPDATE users SET email = ?, username = ?, password_hash = ?, reset_hash = ?,
                    activate_hash = ?, status = ?, status_message = ?, active = ?,
                    force_pass_reset = ?, updated_at = datetime('now')
             WHERE id = ? AND deleted = 0",
            params![
                user.email(),
                &user.username,
                user.password_hash(),
                &user.reset_hash,
                &user.activate_hash,
                &user.status,
                &user.status_message,
                user.active,
                user.force_pass_reset,
                user.id,
            ],
        )?;

        if affected == 0 {
            return Ok(None);
        }

        self.find(user.id)
    }

    /// Mark a user deleted. Returns false if not found.
    pub fn soft_delete(&self, id: i64) -> Result<bool> {
        let affected = self.db.conn().execute(
            "UPDATE users SET deleted = 1, updated_at = datetime('now')
             WHERE id = ? AND deleted = 0",
            [id],
        )?;
        Ok(affected > 0)
    }
}
