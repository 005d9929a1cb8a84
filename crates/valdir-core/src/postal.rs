//! Brazilian postal code (CEP) formatting and validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const POSTAL_CODE_DIGITS: usize = 8;
const PREFIX_DIGITS: usize = 5;

/// Returned when input does not contain exactly eight digits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("postal code must have exactly 8 digits, got {digits}")]
pub struct InvalidPostalCode {
    pub digits: usize,
}

/// Formats free-form input the way it is echoed while the user types.
///
/// Non-digits are dropped. Up to five digits are returned unchanged; beyond
/// that the result is `NNNNN-NNN`, truncating anything past the eighth digit.
#[must_use]
pub fn format_postal_code(raw: &str) -> String {
    let digits = digits_of(raw);
    if digits.len() <= PREFIX_DIGITS {
        return digits;
    }
    let end = digits.len().min(POSTAL_CODE_DIGITS);
    format!("{}-{}", &digits[..PREFIX_DIGITS], &digits[PREFIX_DIGITS..end])
}

fn digits_of(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// A validated eight-digit postal code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    /// Parses `raw`, ignoring every non-digit character.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPostalCode`] unless exactly eight digits remain.
    pub fn parse(raw: &str) -> Result<Self, InvalidPostalCode> {
        let digits = digits_of(raw);
        if digits.len() == POSTAL_CODE_DIGITS {
            Ok(Self(digits))
        } else {
            Err(InvalidPostalCode {
                digits: digits.len(),
            })
        }
    }

    /// The eight digits with no separator, e.g. `"88310002"`.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// First five digits as an integer, e.g. `88310`.
    #[must_use]
    pub fn prefix(&self) -> u32 {
        // Always five ASCII digits, so the parse cannot fail.
        self.0[..PREFIX_DIGITS].parse().unwrap_or_default()
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", &self.0[..PREFIX_DIGITS], &self.0[PREFIX_DIGITS..])
    }
}

impl TryFrom<String> for PostalCode {
    type Error = InvalidPostalCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PostalCode> for String {
    fn from(value: PostalCode) -> Self {
        value.to_string()
    }
}
