//! Product handle (routing slug) type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Handle`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HandleError {
    /// The input string is empty.
    #[error("handle cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("handle must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[a-z0-9-]`.
    #[error("handle contains invalid character {0:?}")]
    InvalidCharacter(char),
    /// The input starts or ends with a hyphen, or contains `--`.
    #[error("handle has a misplaced hyphen")]
    MisplacedHyphen,
}

/// A product handle, the slug used in `/products/{handle}` URLs.
///
/// ## Constraints
///
/// - Length: 1-200 characters
/// - Lowercase ASCII letters, digits and `-` only
/// - No leading, trailing or doubled hyphens
///
/// ## Examples
///
/// ```
/// use elorad_core::Handle;
///
/// assert!(Handle::parse("cotton-romper-1a2b3c4d").is_ok());
/// assert!(Handle::parse("").is_err());
/// assert!(Handle::parse("Cotton Romper").is_err());
/// assert!(Handle::parse("-romper").is_err());
///
/// let slug = Handle::slugify("Gorgeous Cotton Romper!").unwrap();
/// assert_eq!(slug.as_str(), "gorgeous-cotton-romper");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    /// Maximum length of a handle.
    pub const MAX_LENGTH: usize = 200;

    /// Parse a `Handle` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, too long, contains characters
    /// outside `[a-z0-9-]`, or has a misplaced hyphen.
    pub fn parse(s: &str) -> Result<Self, HandleError> {
        if s.is_empty() {
            return Err(HandleError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(HandleError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(HandleError::InvalidCharacter(c));
        }

        if s.starts_with('-') || s.ends_with('-') || s.contains("--") {
            return Err(HandleError::MisplacedHyphen);
        }

        Ok(Self(s.to_string()))
    }

    /// Build a handle from free text.
    ///
    /// Lowercases, replaces every run of non-alphanumeric characters with a
    /// single hyphen and trims hyphens from both ends.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing usable remains (e.g. the input is all
    /// punctuation) or the result is too long.
    pub fn slugify(text: &str) -> Result<Self, HandleError> {
        let mut slug = String::with_capacity(text.len());
        let mut pending_hyphen = false;

        for c in text.chars() {
            if c.is_ascii_alphanumeric() {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(c.to_ascii_lowercase());
            } else {
                pending_hyphen = true;
            }
        }

        Self::parse(&slug)
    }

    /// Append a suffix segment, e.g. a short random id.
    ///
    /// # Errors
    ///
    /// Returns an error if the combined handle is invalid.
    pub fn with_suffix(&self, suffix: &str) -> Result<Self, HandleError> {
        Self::parse(&format!("{}-{suffix}", self.0))
    }

    /// Get the handle as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Handle {
    type Error = HandleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Handle> for String {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl std::str::FromStr for Handle {
    type Err = HandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
