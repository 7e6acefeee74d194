//! Account email address.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Why a string was not accepted as an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// Nothing left after trimming.
    #[error("email is required")]
    Empty,
    /// Not of the form `local@domain`.
    #[error("'{0}' is not an email address")]
    Malformed(String),
}

/// Email address used to log in and register.
///
/// Surrounding whitespace is dropped, the way the login and register forms
/// treat typed input. The rest is a shape check only (`local@domain` with a
/// single `@`); the server decides whether the account exists.
///
/// ```
/// use bloom_core::Email;
///
/// let email: Email = "  shopper@bloom.in ".parse().unwrap();
/// assert_eq!(email.as_str(), "shopper@bloom.in");
/// assert_eq!(email.domain(), "bloom.in");
///
/// assert!("".parse::<Email>().is_err());
/// assert!("a@b@c".parse::<Email>().is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and trim `s`.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError::Empty`] for blank input and
    /// [`EmailError::Malformed`] if there is not exactly one `@` with text on
    /// both sides.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        s.parse()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything after the `@`.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.rsplit('@').next().unwrap_or_default()
    }
}

impl FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        match s.split('@').collect::<Vec<_>>().as_slice() {
            [local, domain] if !local.is_empty() && !domain.is_empty() => Ok(Self(s.to_owned())),
            _ => Err(EmailError::Malformed(s.to_owned())),
        }
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
