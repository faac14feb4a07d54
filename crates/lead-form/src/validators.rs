//! Validator registry.
//!
//! Every predicate here is total: malformed, empty or non-string input
//! yields `false`, never a panic.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FormError;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

// Digits only: two area-code digits, optional mobile 9, subscriber number.
static PHONE_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9]{2}9?\d{8}$").expect("phone pattern"));

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

// Month-first before day-first, so `01/02/2024` reads as January 2nd.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y"];

/// `local@domain.tld` with no whitespace and at least one dot after the `@`.
pub fn is_email(value: &str) -> bool {
    !value.is_empty() && EMAIL.is_match(value)
}

/// Brazilian landline or mobile number, any punctuation allowed.
pub fn is_phone(value: &str) -> bool {
    PHONE_DIGITS.is_match(&digits_only(value))
}

/// True if `value` parses as a calendar date or date-time.
pub fn is_date(value: &str) -> bool {
    parse_date(value).is_some()
}

/// Strip every character that is not an ASCII digit.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Parse the date formats accepted by [`is_date`].
///
/// Zoned timestamps keep their own wall-clock time.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.naive_local());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Named entries of the registry, so rule sets can be described as data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorKind {
    Email,
    Phone,
    Date,
}

impl ValidatorKind {
    pub fn check(self, value: &str) -> bool {
        match self {
            Self::Email => is_email(value),
            Self::Phone => is_phone(value),
            Self::Date => is_date(value),
        }
    }

    /// Check a loosely typed value. Anything but a JSON string fails.
    pub fn check_json(self, value: &Value) -> bool {
        value.as_str().is_some_and(|text| self.check(text))
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for ValidatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValidatorKind {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            "date" => Ok(Self::Date),
            other => Err(FormError::UnknownValidator(other.to_string())),
        }
    }
}
