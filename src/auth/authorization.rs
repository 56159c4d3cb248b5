//! Authorization collaborator interface.
//!
//! Entities hold no authorization state; every group or permission question
//! is answered by an [`AuthorizationProvider`] keyed by user id.

use crate::Result;

/// Default name of the administrators group.
pub const DEFAULT_ADMIN_GROUP: &str = "admins";

/// Default name of the moderators group.
pub const DEFAULT_MODERATOR_GROUP: &str = "moderators";

/// One or more group names for a membership check.
///
/// A membership check succeeds when the user belongs to **any** of the named
/// groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Groups<'a> {
    /// A single group.
    One(&'a str),
    /// Any of several groups.
    AnyOf(&'a [&'a str]),
}

impl<'a> Groups<'a> {
    /// The group names to check.
    pub fn names(&self) -> &[&'a str] {
        match self {
            Groups::One(name) => std::slice::from_ref(name),
            Groups::AnyOf(names) => *names,
        }
    }
}

impl<'a> From<&'a str> for Groups<'a> {
    fn from(name: &'a str) -> Self {
        Groups::One(name)
    }
}

impl<'a> From<&'a [&'a str]> for Groups<'a> {
    fn from(names: &'a [&'a str]) -> Self {
        Groups::AnyOf(names)
    }
}

impl<'a, const N: usize> From<&'a [&'a str; N]> for Groups<'a> {
    fn from(names: &'a [&'a str; N]) -> Self {
        Groups::AnyOf(names.as_slice())
    }
}

/// Group membership and permission service.
pub trait AuthorizationProvider {
    /// Is the user in any of `groups`?
    fn in_group(&self, groups: Groups<'_>, user_id: i64) -> Result<bool>;

    /// Add the user to a group. Returns `false` if the group does not exist.
    fn add_user_to_group(&self, user_id: i64, group: &str) -> Result<bool>;

    /// Remove the user from a group. Returns `false` if the group does not exist.
    fn remove_user_from_group(&self, user_id: i64, group: &str) -> Result<bool>;

    /// Does the user hold `permission`, personally or through a group?
    fn has_permission(&self, permission: &str, user_id: i64) -> Result<bool>;

    /// Grant a personal permission. Returns `false` if the permission does not exist.
    fn add_permission_to_user(&self, permission: &str, user_id: i64) -> Result<bool>;

    /// Revoke a personal permission; group grants are untouched.
    fn remove_permission_from_user(&self, permission: &str, user_id: i64) -> Result<bool>;

    /// Group name treated as administrators.
    fn admin_group(&self) -> &str {
        DEFAULT_ADMIN_GROUP
    }

    /// Group name treated as moderators.
    fn moderator_group(&self) -> &str {
        DEFAULT_MODERATOR_GROUP
    }
}
