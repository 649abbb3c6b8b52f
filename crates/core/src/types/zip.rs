//! US zip code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ZipCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ZipCodeError {
    /// The input string is empty.
    #[error("zip code cannot be empty")]
    Empty,
    /// The input is not exactly five characters long.
    #[error("zip code must be exactly {expected} digits")]
    WrongLength {
        /// Required number of digits.
        expected: usize,
    },
    /// The input contains something other than ASCII digits.
    #[error("zip code must contain only digits")]
    NonDigit,
}

/// A five-digit US zip code.
///
/// ## Examples
///
/// ```
/// use greengrocer_core::ZipCode;
///
/// assert!(ZipCode::parse("50010").is_ok());
/// assert!(ZipCode::parse(" 50010 ").is_ok()); // surrounding whitespace is trimmed
///
/// assert!(ZipCode::parse("").is_err());
/// assert!(ZipCode::parse("5001").is_err());
/// assert!(ZipCode::parse("5001a").is_err());
/// assert!(ZipCode::parse("50010-1234").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ZipCode(String);

impl ZipCode {
    /// Number of digits in a zip code.
    pub const LENGTH: usize = 5;

    /// Parse a `ZipCode` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, is not five
    /// characters long, or contains non-digit characters.
    pub fn parse(s: &str) -> Result<Self, ZipCodeError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ZipCodeError::Empty);
        }

        if s.chars().count() != Self::LENGTH {
            return Err(ZipCodeError::WrongLength {
                expected: Self::LENGTH,
            });
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ZipCodeError::NonDigit);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the zip code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ZipCode {
    type Err = ZipCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ZipCode {
    type Error = ZipCodeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ZipCode> for String {
    fn from(zip: ZipCode) -> Self {
        zip.0
    }
}

impl AsRef<str> for ZipCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
