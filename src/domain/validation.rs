//! Field-level checks applied before a record is accepted into the store.

use std::{fmt, ops::Deref};

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};
use url::Url;

/// A field of a person or gift record that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The person's name.
    Name,
    /// The gift's title.
    Title,
    /// The gift's price.
    Price,
    /// The person's budget.
    Budget,
    /// The gift's product link.
    Url,
    /// The gift's image link.
    ImageUrl,
}

impl Field {
    /// The name of the field as it appears in the saved data.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Title => "title",
            Self::Price => "price",
            Self::Budget => "budget",
            Self::Url => "url",
            Self::ImageUrl => "imageUrl",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The reason a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Problem {
    /// The field is required but was empty (after trimming).
    Required,
    /// The field must be a well-formed absolute URL.
    InvalidUrl,
    /// The field must not be negative.
    Negative,
}

/// A record was rejected because one of its fields is invalid.
///
/// No state is changed when this error is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {}", self.message())]
pub struct ValidationError {
    /// The offending field.
    pub field: Field,
    /// What is wrong with it.
    pub problem: Problem,
}

impl ValidationError {
    pub(crate) const fn new(field: Field, problem: Problem) -> Self {
        Self { field, problem }
    }

    /// A message suitable for showing next to the offending input.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self.problem {
            Problem::Required => "this field is required",
            Problem::InvalidUrl => "please enter a valid URL",
            Problem::Negative => "must not be negative",
        }
    }
}

/// Returns `true` if `text` is empty or parses as an absolute URL.
///
/// An empty string means "no URL" and is always accepted.
#[must_use]
pub fn is_valid_url(text: &str) -> bool {
    text.is_empty() || Url::parse(text).is_ok()
}

/// Text that is never blank: surrounding whitespace is trimmed and at least
/// one character is left.
///
/// Names and titles are stored as this type, so a record read back from a
/// file can't carry a blank one either.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RequiredText(NonEmptyString);

/// Error returned when text is empty or only whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("must not be blank")]
pub struct BlankText;

impl RequiredText {
    /// Trim `text` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns [`BlankText`] if nothing is left after trimming.
    pub fn new(text: &str) -> Result<Self, BlankText> {
        NonEmptyString::new(text.trim().to_string())
            .map(Self)
            .map_err(|_| BlankText)
    }

    /// The text as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for RequiredText {
    type Error = BlankText;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<RequiredText> for String {
    fn from(value: RequiredText) -> Self {
        value.as_str().to_string()
    }
}

impl AsRef<str> for RequiredText {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for RequiredText {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl fmt::Display for RequiredText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trim `text` and reject it if nothing is left.
pub(crate) fn required(field: Field, text: &str) -> Result<RequiredText, ValidationError> {
    RequiredText::new(text).map_err(|BlankText| ValidationError::new(field, Problem::Required))
}

/// Trim `text` and check that it is either empty or a valid URL.
pub(crate) fn optional_url(field: Field, text: &str) -> Result<String, ValidationError> {
    let trimmed = text.trim();
    if is_valid_url(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(ValidationError::new(field, Problem::InvalidUrl))
    }
}

/// Reject negative or non-finite amounts.
pub(crate) fn amount(field: Field, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Ok(0.0);
    }
    if value < 0.0 {
        return Err(ValidationError::new(field, Problem::Negative));
    }
    Ok(value)
}

/// Parse user-entered amount text leniently.
///
/// Leading whitespace is skipped and the longest prefix that reads as a
/// decimal number is used, so `"12.50 USD"` is `12.5`. Text with no numeric
/// prefix at all is `0`.
#[must_use]
pub fn parse_amount(text: &str) -> f64 {
    let text = text.trim_start();
    let prefix_len = numeric_prefix_len(text);
    text[..prefix_len]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Length in bytes of the longest `[+-]?digits[.digits][e[+-]digits]` prefix.
fn numeric_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    end
}
