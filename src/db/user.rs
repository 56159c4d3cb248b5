//! User entity.
//!
//! `email` and `password_hash` are only writable through [`User::set_email`]
//! and [`User::set_password`], which validate and derive them.

use rusqlite::Row;
use serde::Serialize;

use crate::auth::validation::validate_email;
use crate::auth::{verify_password, Argon2Hasher, AuthorizationProvider, Groups};
use crate::routing::{entity_slug, UrlResolver, USER_ROUTE};
use crate::Result;

/// Status value marking a banned account.
pub const BANNED_STATUS: &str = "banned";

/// A registered account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct User {
    /// Unique user ID (0 until stored).
    pub id: i64,
    email: Option<String>,
    /// Login name.
    pub username: String,
    #[serde(skip)]
    password_hash: String,
    /// Password reset token.
    #[serde(skip)]
    pub reset_hash: Option<String>,
    /// Account activation token.
    #[serde(skip)]
    pub activate_hash: Option<String>,
    /// Free-text account state; `"banned"` marks a ban.
    pub status: Option<String>,
    /// Reason shown to a banned user.
    pub status_message: Option<String>,
    /// Whether the account has been activated.
    pub active: bool,
    /// Whether the user must change their password at next login.
    pub force_pass_reset: bool,
    /// Soft-delete flag.
    pub deleted: bool,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: Option<String>,
}

impl User {
    /// Column list matching [`User::from_row`].
    pub(crate) const COLUMNS: &'static str = "id, email, username, password_hash, reset_hash, \
         activate_hash, status, status_message, active, force_pass_reset, deleted, \
         created_at, updated_at";

    /// Create an unsaved user.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    /// Map a row selected with [`User::COLUMNS`].
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            email: row.get(1)?,
            username: row.get(2)?,
            password_hash: row.get(3)?,
            reset_hash: row.get(4)?,
            activate_hash: row.get(5)?,
            status: row.get(6)?,
            status_message: row.get(7)?,
            active: row.get(8)?,
            force_pass_reset: row.get(9)?,
            deleted: row.get(10)?,
            created_at: row.get(11)?,
            updated_at: row.get(12)?,
        })
    }

    /// The stored (lowercased) email address.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// The stored password hash (empty if no password was set).
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Validate and store an email address, lowercased.
    ///
    /// Fails with an `InvalidInput` error and leaves the previous value in
    /// place if `email` is not a well-formed address.
    pub fn set_email(&mut self, email: &str) -> Result<&mut Self> {
        validate_email(email)?;
        self.email = Some(email.to_lowercase());
        Ok(self)
    }

    /// Hash and store a password.
    pub fn set_password(&mut self, password: &str, hasher: &Argon2Hasher) -> Result<&mut Self> {
        self.password_hash = hasher.hash(password)?;
        Ok(self)
    }

    /// Check a plaintext password against the stored hash.
    pub fn verify_password(&self, password: &str) -> bool {
        verify_password(password, &self.password_hash).is_ok()
    }

    /// Ban the user with a reason to show them.
    pub fn ban_user(&mut self, message: impl Into<String>) -> &mut Self {
        self.status = Some(BANNED_STATUS.to_string());
        self.status_message = Some(message.into());
        self
    }

    /// Lift a ban.
    pub fn unban_user(&mut self) -> &mut Self {
        self.status = None;
        self.status_message = None;
        self
    }

    /// Is the user currently banned?
    pub fn is_banned(&self) -> bool {
        self.status.as_deref() == Some(BANNED_STATUS)
    }

    /// Is the user in the provider's administrators group?
    pub fn is_admin(&self, auth: &dyn AuthorizationProvider) -> Result<bool> {
        auth.in_group(Groups::One(auth.admin_group()), self.id)
    }

    /// Is the user in the provider's moderators group?
    pub fn is_moderator(&self, auth: &dyn AuthorizationProvider) -> Result<bool> {
        auth.in_group(Groups::One(auth.moderator_group()), self.id)
    }

    /// Is the user in any of `groups`?
    pub fn in_group<'g>(
        &self,
        groups: impl Into<Groups<'g>>,
        auth: &dyn AuthorizationProvider,
    ) -> Result<bool> {
        auth.in_group(groups.into(), self.id)
    }

    /// Add the user to a group.
    pub fn add_to_group(&self, group: &str, auth: &dyn AuthorizationProvider) -> Result<bool> {
        auth.add_user_to_group(self.id, group)
    }

    /// Remove the user from a group.
    pub fn remove_from_group(&self, group: &str, auth: &dyn AuthorizationProvider) -> Result<bool> {
        auth.remove_user_from_group(self.id, group)
    }

    /// Does the user hold a permission, personally or through a group?
    pub fn has_permission(
        &self,
        permission: &str,
        auth: &dyn AuthorizationProvider,
    ) -> Result<bool> {
        auth.has_permission(permission, self.id)
    }

    /// Grant a permission to this user only.
    pub fn add_permission(
        &self,
        permission: &str,
        auth: &dyn AuthorizationProvider,
    ) -> Result<bool> {
        auth.add_permission_to_user(permission, self.id)
    }

    /// Revoke this user's personal permission; group grants are untouched.
    pub fn remove_permission(
        &self,
        permission: &str,
        auth: &dyn AuthorizationProvider,
    ) -> Result<bool> {
        auth.remove_permission_from_user(permission, self.id)
    }

    /// Profile page URL.
    pub fn link(&self, router: &dyn UrlResolver) -> String {
        router
            .route_to(USER_ROUTE, &entity_slug(self.id, &self.username))
            .unwrap_or_default()
    }
}
