//! SQLite-backed authorization provider.
//!
//! Groups and permissions are looked up by name. Users can hold permissions
//! personally (`auth_users_permissions`) or through group membership
//! (`auth_groups_permissions`).

use rusqlite::{params, params_from_iter, OptionalExtension};
use tracing::debug;

use super::authorization::{AuthorizationProvider, Groups};
use crate::config::AuthConfig;
use crate::db::Database;
use crate::Result;

/// Authorization provider over the `auth_*` tables.
#[derive(Debug, Clone)]
pub struct SqliteAuthorization {
    db: Database,
    admin_group: String,
    moderator_group: String,
}

impl SqliteAuthorization {
    /// Create a provider using the default group names.
    pub fn new(db: Database) -> Self {
        Self::with_config(db, &AuthConfig::default())
    }

    /// Create a provider using configured group names.
    pub fn with_config(db: Database, config: &AuthConfig) -> Self {
        Self {
            db,
            admin_group: config.admin_group.clone(),
            moderator_group: config.moderator_group.clone(),
        }
    }

    /// Create a group, returning its id. Existing groups keep their id.
    pub fn create_group(&self, name: &str, description: &str) -> Result<i64> {
        self.db.conn().execute(
            "INSERT OR IGNORE INTO auth_groups (name, description) VALUES (?, ?)",
            params![name, description],
        )?;
        let id = self.db.conn().query_row(
            "SELECT id FROM auth_groups WHERE name = ?",
            [name],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Create a permission, returning its id. Existing permissions keep their id.
    pub fn create_permission(&self, name: &str, description: &str) -> Result<i64> {
        self.db.conn().execute(
            "INSERT OR IGNORE INTO auth_permissions (name, description) VALUES (?, ?)",
            params![name, description],
        )?;
        let id = self.db.conn().query_row(
            "SELECT id FROM auth_permissions WHERE name = ?",
            [name],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Grant a permission to every member of a group.
    pub fn add_permission_to_group(&self, permission: &str, group: &str) -> Result<bool> {
        let (Some(permission_id), Some(group_id)) =
            (self.permission_id(permission)?, self.group_id(group)?)
        else {
            return Ok(false);
        };

        self.db.conn().execute(
            "INSERT OR IGNORE INTO auth_groups_permissions (group_id, permission_id) VALUES (?, ?)",
            [group_id, permission_id],
        )?;
        Ok(true)
    }

    fn group_id(&self, name: &str) -> Result<Option<i64>> {
        let id = self
            .db
            .conn()
            .query_row("SELECT id FROM auth_groups WHERE name = ?", [name], |row| {
                row.get(0)
            })
            .optional()?;
        if id.is_none() {
            debug!(group = name, "unknown group");
        }
        Ok(id)
    }

    fn permission_id(&self, name: &str) -> Result<Option<i64>> {
        let id = self
            .db
            .conn()
            .query_row(
                "SELECT id FROM auth_permissions WHERE name = ?",
                [name],
                |row| row.get(0),
            )
            .optional()?;
        if id.is_none() {
            debug!(permission = name, "unknown permission");
        }
        Ok(id)
    }
}

impl AuthorizationProvider for SqliteAuthorization {
    fn in_group(&self, groups: Groups<'_>, user_id: i64) -> Result<bool> {
        let names = groups.names();
        if names.is_empty() {
            return Ok(false);
        }

        let placeholders = vec!["?"; names.len()].join(", ");
        let sql = format!(
            "SELECT EXISTS(
                SELECT 1 FROM auth_groups_users gu
                JOIN auth_groups g ON g.id = gu.group_id
                WHERE gu.user_id = ? AND g.name IN ({placeholders})
            )"
        );

        let mut values: Vec<rusqlite::types::Value> = Vec::with_capacity(names.len() + 1);
        values.push(user_id.into());
        values.extend(names.iter().map(|n| n.to_string().into()));

        let found: bool = self
            .db
            .conn()
            .query_row(&sql, params_from_iter(values), |row| row.get(0))?;
        Ok(found)
    }

    fn add_user_to_group(&self, user_id: i64, group: &str) -> Result<bool> {
        let Some(group_id) = self.group_id(group)? else {
            return Ok(false);
        };

        self.db.conn().execute(
            "INSERT OR IGNORE INTO auth_groups_users (group_id, user_id) VALUES (?, ?)",
            [group_id, user_id],
        )?;
        Ok(true)
    }

    fn remove_user_from_group(&self, user_id: i64, group: &str) -> Result<bool> {
        let Some(group_id) = self.group_id(group)? else {
            return Ok(false);
        };

        self.db.conn().execute(
            "DELETE FROM auth_groups_users WHERE group_id = ? AND user_id = ?",
            [group_id, user_id],
        )?;
        Ok(true)
    }

    fn has_permission(&self, permission: &str, user_id: i64) -> Result<bool> {
        let Some(permission_id) = self.permission_id(permission)? else {
            return Ok(false);
        };

        let found: bool = self.db.conn().query_row(
            "SELECT EXISTS(
                SELECT 1 FROM auth_users_permissions
                WHERE user_id = ?1 AND permission_id = ?2
                UNION ALL
                SELECT 1 FROM auth_groups_permissions gp
                JOIN auth_groups_users gu ON gu.group_id = gp.group_id
                WHERE gu.user_id = ?1 AND gp.permission_id = ?2
            )",
            [user_id, permission_id],
            |row| row.get(0),
        )?;
        Ok(found)
    }

    fn add_permission_to_user(&self, permission: &str, user_id: i64) -> Result<bool> {
        let Some(permission_id) = self.permission_id(permission)? else {
            return Ok(false);
        };

        self.db.conn().execute(
            "INSERT OR IGNORE INTO auth_users_permissions (user_id, permission_id) VALUES (?, ?)",
            [user_id, permission_id],
        )?;
        Ok(true)
    }

    fn remove_permission_from_user(&self, permission: &str, user_id: i64) -> Result<bool> {
        let Some(permission_id) = self.permission_id(permission)? else {
            return Ok(false);
        };

        self.db.conn().execute(
            "DELETE FROM auth_users_permissions WHERE user_id = ? AND permission_id = ?",
            [user_id, permission_id],
        )?;
        Ok(true)
    }

    fn admin_group(&self) -> &str {
        &self.admin_group
    }

    fn moderator_group(&self) -> &str {
        &self.moderator_group
    }
}
