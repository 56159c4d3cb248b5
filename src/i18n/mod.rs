//! Message catalogs for rendered strings.
//!
//! Catalogs are TOML files whose nested tables flatten to dot-separated keys:
//!
//! ```toml
//! [threads]
//! user_summary_same = "{{user}} started this {{date}}"
//! ```
//!
//! becomes the key `threads.user_summary_same`. Placeholders are written as
//! `{{name}}` and filled by [`Localizer::t_with`].
//!
//! ```
//! use forum_core::i18n::{I18n, Localizer};
//!
//! let i18n = I18n::builtin("en").unwrap();
//! let text = i18n.t_with("time.hours", &[("count", "3")]);
//! assert_eq!(text, "3 hours ago");
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::warn;

/// Default locale.
pub const DEFAULT_LOCALE: &str = "en";

const BUILTIN_EN: &str = include_str!("../../locales/en.toml");
const BUILTIN_JA: &str = include_str!("../../locales/ja.toml");

/// I18n-related errors.
#[derive(Error, Debug)]
pub enum I18nError {
    /// Failed to read locale file.
    #[error("failed to read locale file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML.
    #[error("failed to parse locale file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Locale not found.
    #[error("locale not found: {0}")]
    LocaleNotFound(String),
}

/// Result type for i18n operations.
pub type Result<T> = std::result::Result<T, I18nError>;

/// Maps a message key plus named parameters to a rendered string.
pub trait Localizer {
    /// Render `key`, substituting each `{{name}}` with its value.
    ///
    /// Unknown keys render as the key itself.
    fn t_with(&self, key: &str, params: &[(&str, &str)]) -> String;
}

/// A single-locale message catalog.
#[derive(Debug, Clone)]
pub struct I18n {
    locale: String,
    messages: HashMap<String, String>,
}

impl I18n {
    /// Load `<locales_dir>/<locale>.toml`.
    pub fn load<P: AsRef<Path>>(locale: &str, locales_dir: P) -> Result<Self> {
        let path = locales_dir.as_ref().join(format!("{locale}.toml"));

        if !path.exists() {
            return Err(I18nError::LocaleNotFound(locale.to_string()));
        }

        let content = fs::read_to_string(&path)?;
        Self::from_str(locale, &content)
    }

    /// Load a catalog directory over the built-in catalog for the same locale.
    ///
    /// Keys from the file override built-in ones; keys the file omits keep
    /// their built-in text. A locale with no built-in catalog must exist on
    /// disk.
    pub fn load_with_builtin<P: AsRef<Path>>(locale: &str, locales_dir: P) -> Result<Self> {
        let mut base = match Self::builtin(locale) {
            Ok(i18n) => i18n,
            Err(I18nError::LocaleNotFound(_)) => return Self::load(locale, locales_dir),
            Err(e) => return Err(e),
        };

        match Self::load(locale, locales_dir) {
            Ok(overlay) => base.merge(&overlay),
            Err(I18nError::LocaleNotFound(_)) => {}
            Err(e) => return Err(e),
        }

        Ok(base)
    }

    /// The catalog compiled into the crate for `locale` (`en` or `ja`).
    pub fn builtin(locale: &str) -> Result<Self> {
        match locale {
            "en" => Self::from_str("en", BUILTIN_EN),
            "ja" => Self::from_str("ja", BUILTIN_JA),
            other => Err(I18nError::LocaleNotFound(other.to_string())),
        }
    }

    /// Create a catalog from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(locale: &str, content: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(content)?;

        let mut messages = HashMap::new();
        flatten_toml("", &toml::Value::Table(table), &mut messages);

        Ok(Self {
            locale: locale.to_string(),
            messages,
        })
    }

    /// Create an empty catalog; every lookup returns its key.
    pub fn empty(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
            messages: HashMap::new(),
        }
    }

    /// Get the current locale.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Get the number of loaded messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if no messages are loaded.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Translate a key, returning the key itself when it is missing.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        match self.messages.get(key) {
            Some(s) => s.as_str(),
            None => {
                if !self.messages.is_empty() {
                    warn!(locale = %self.locale, key, "missing message key");
                }
                key
            }
        }
    }

    /// Check if a translation key exists.
    pub fn has_key(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }

    /// Merge another catalog into this one; `other` wins on conflicts.
    pub fn merge(&mut self, other: &I18n) {
        for (key, value) in &other.messages {
            self.messages.insert(key.clone(), value.clone());
        }
    }
}

impl Localizer for I18n {
    fn t_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        interpolate(self.t(key), params)
    }
}

/// Fill `{{name}}` placeholders in one left-to-right pass.
///
/// Inserted values are never rescanned, so a value that itself looks like a
/// placeholder is output verbatim. Unknown placeholders are left in place.
fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = &after[..end];
        match params.iter().find(|(k, _)| *k == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + end + 4]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

impl Default for I18n {
    fn default() -> Self {
        Self::empty(DEFAULT_LOCALE)
    }
}

/// Flatten a TOML value into a map with dot-separated keys.
fn flatten_toml(prefix: &str, value: &toml::Value, map: &mut HashMap<String, String>) {
    match value {
        toml::Value::Table(table) => {
            for (key, val) in table {
                let new_prefix = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_toml(&new_prefix, val, map);
            }
        }
        toml::Value::String(s) => {
            map.insert(prefix.to_string(), s.clone());
        }
        toml::Value::Integer(i) => {
            map.insert(prefix.to_string(), i.to_string());
        }
        toml::Value::Float(f) => {
            map.insert(prefix.to_string(), f.to_string());
        }
        toml::Value::Boolean(b) => {
            map.insert(prefix.to_string(), b.to_string());
        }
        // Arrays are not supported for translations
        toml::Value::Array(_) => {}
        toml::Value::Datetime(dt) => {
            map.insert(prefix.to_string(), dt.to_string());
        }
    }
}
