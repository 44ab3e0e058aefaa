//! Email address type.
//!
//! Sign-in, registration and password recovery all collect an email address
//! from a form. [`Email::parse`] trims the input and rejects shapes the API
//! would refuse anyway, so the storefront can answer without a round trip.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// Nothing was entered.
    #[error("email is required")]
    Empty,
    /// The address is longer than SMTP allows.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The address contains spaces or other whitespace.
    #[error("email must not contain spaces")]
    ContainsWhitespace,
    /// The address does not have exactly one `@`.
    #[error("email must contain a single @ symbol")]
    InvalidAtSymbol,
    /// Nothing before the `@`.
    #[error("email is missing the name before @")]
    EmptyLocalPart,
    /// Nothing after the `@`.
    #[error("email is missing the domain after @")]
    EmptyDomain,
}

/// A syntactically valid email address.
///
/// ## Examples
///
/// ```
/// use chicken_one_core::Email;
///
/// let email = Email::parse("  guest@chickenone.app ").unwrap();
/// assert_eq!(email.as_str(), "guest@chickenone.app");
///
/// assert!(Email::parse("").is_err());
/// assert!(Email::parse("two@@signs.com").is_err());
/// assert!(Email::parse("with space@x.com").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse form input into an `Email`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] describing the first problem found.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let s = input.trim();

        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if s.chars().any(char::is_whitespace) {
            return Err(EmailError::ContainsWhitespace);
        }

        let mut parts = s.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(EmailError::InvalidAtSymbol);
        };

        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }
        if domain.is_empty() {
            return Err(EmailError::EmptyDomain);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
