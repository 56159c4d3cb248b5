//! Authentication and authorization.
//!
//! Password hashing, user field validation, and the authorization
//! collaborator interface with its SQLite implementation.

mod authorization;
mod password;
mod permission;
pub mod validation;

pub use authorization::{
    AuthorizationProvider, Groups, DEFAULT_ADMIN_GROUP, DEFAULT_MODERATOR_GROUP,
};
pub use password::{verify_password, Argon2Hasher, PasswordError};
pub use permission::SqliteAuthorization;
pub use validation::ValidationError;

#[cfg(test)]
pub(crate) use password::test_hasher;
