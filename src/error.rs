//! Error types for the forum core.

use thiserror::Error;

use crate::i18n::Localizer;

/// Broad classification of a [`ForumError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller supplied a malformed value.
    InvalidInput,
    /// The storage layer failed.
    Storage,
    /// A requested record does not exist.
    NotFound,
    /// Missing or malformed configuration / collaborator wiring.
    Config,
    /// Anything else.
    Other,
}

/// Common error type for the forum core.
#[derive(Error, Debug)]
pub enum ForumError {
    /// Validation failure for a caller-supplied value.
    ///
    /// `key` is the message catalog key; `message` is the built-in English text.
    #[error("{message}")]
    InvalidInput {
        /// Catalog key used to localize the message.
        key: &'static str,
        /// Default (English) message.
        message: String,
    },

    /// Database error.
    #[error("database error: {0}")]
    Database(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Password hashing or verification error.
    #[error("password error: {0}")]
    Password(#[from] crate::auth::PasswordError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Locale catalog error.
    #[error("locale error: {0}")]
    Locale(#[from] crate::i18n::I18nError),
}

impl ForumError {
    /// Build an `InvalidInput` error from a catalog key and its default text.
    pub fn invalid_input(key: &'static str, message: impl Into<String>) -> Self {
        ForumError::InvalidInput {
            key,
            message: message.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForumError::InvalidInput { .. } => ErrorKind::InvalidInput,
            ForumError::Database(_) => ErrorKind::Storage,
            ForumError::NotFound(_) => ErrorKind::NotFound,
            ForumError::Config(_) | ForumError::Locale(_) => ErrorKind::Config,
            ForumError::Password(_) | ForumError::Io(_) => ErrorKind::Other,
        }
    }

    /// Render the message through a localizer.
    ///
    /// Only `InvalidInput` carries a catalog key; other variants fall back
    /// to their `Display` text. A key missing from the catalog also falls
    /// back to the built-in text.
    pub fn localized(&self, localizer: &dyn Localizer) -> String {
        match self {
            ForumError::InvalidInput { key, message } => {
                let text = localizer.t_with(key, &[]);
                if text == *key {
                    message.clone()
                } else {
                    text
                }
            }
            other => other.to_string(),
        }
    }
}

impl From<rusqlite::Error> for ForumError {
    fn from(e: rusqlite::Error) -> Self {
        ForumError::Database(e.to_string())
    }
}

/// Result type alias for forum operations.
pub type Result<T> = std::result::Result<T, ForumError>;
