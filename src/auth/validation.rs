//! Input validation for user records.
//!
//! Field limits mirror the column rules enforced before a user row is
//! written.

use thiserror::Error;
use validator::ValidateEmail;

use crate::db::User;
use crate::ForumError;

/// Minimum username length (characters).
pub const MIN_USERNAME_LENGTH: usize = 5;

/// Maximum username length (characters).
pub const MAX_USERNAME_LENGTH: usize = 255;

/// Maximum length of `password_hash`, `status` and `status_message`.
pub const MAX_TEXT_LENGTH: usize = 255;

/// Maximum length of the reset / activation tokens.
pub const MAX_TOKEN_LENGTH: usize = 40;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Email format is invalid.
    #[error("invalid email address")]
    InvalidEmail,

    /// Username is too short.
    #[error("username must be at least {MIN_USERNAME_LENGTH} characters")]
    UsernameTooShort,

    /// Username is too long.
    #[error("username must be at most {MAX_USERNAME_LENGTH} characters")]
    UsernameTooLong,

    /// A bounded text field exceeds its limit.
    #[error("{field} must be at most {max} characters")]
    FieldTooLong {
        /// Field name.
        field: &'static str,
        /// Maximum length.
        max: usize,
    },
}

impl ValidationError {
    /// Message catalog key for this error.
    pub fn message_key(&self) -> &'static str {
        match self {
            ValidationError::InvalidEmail => "users.invalid_email",
            ValidationError::UsernameTooShort => "users.username_too_short",
            ValidationError::UsernameTooLong => "users.username_too_long",
            ValidationError::FieldTooLong { .. } => "users.field_too_long",
        }
    }
}

impl From<ValidationError> for ForumError {
    fn from(e: ValidationError) -> Self {
        ForumError::invalid_input(e.message_key(), e.to_string())
    }
}

/// Validate an email address.
///
/// ```
/// use forum_core::auth::validation::validate_email;
///
/// assert!(validate_email("user@example.com").is_ok());
/// assert!(validate_email("not-an-email").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Validate a username length.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if len < MIN_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooShort);
    }
    if len > MAX_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooLong);
    }
    Ok(())
}

fn check_len(field: &'static str, value: Option<&str>, max: usize) -> Result<(), ValidationError> {
    match value {
        Some(v) if v.chars().count() > max => Err(ValidationError::FieldTooLong { field, max }),
        _ => Ok(()),
    }
}

/// Validate a user record before it is written.
pub fn validate_user(user: &User) -> Result<(), ValidationError> {
    if let Some(email) = user.email() {
        validate_email(email)?;
    }
    validate_username(&user.username)?;
    check_len("password_hash", Some(user.password_hash()), MAX_TEXT_LENGTH)?;
    check_len("reset_hash", user.reset_hash.as_deref(), MAX_TOKEN_LENGTH)?;
    check_len("activate_hash", user.activate_hash.as_deref(), MAX_TOKEN_LENGTH)?;
    check_len("status", user.status.as_deref(), MAX_TEXT_LENGTH)?;
    check_len("status_message", user.status_message.as_deref(), MAX_TEXT_LENGTH)?;
    Ok(())
}
