//! Utility functions for parley
use itertools::Itertools as _;
use strum::IntoEnumIterator;

use crate::errors::MessageError;

/// Safely truncates a string to a maximum number of characters.
///
/// Respects utf8 character boundaries.
pub fn safe_truncate_utf8(s: impl AsRef<str>, max_chars: usize) -> String {
    s.as_ref().chars().take(max_chars).collect()
}

/// Debug print a long string by truncating to n characters, followed by the full length
///
/// # Example
///
/// ```
/// # use parley_core::util::debug_long_utf8;
/// let s = debug_long_utf8("🦀".repeat(10), 3);
///
/// assert_eq!(s, "🦀🦀🦀 (10)");
/// ```
pub fn debug_long_utf8(s: impl AsRef<str>, max_chars: usize) -> String {
    let trunc = safe_truncate_utf8(&s, max_chars);

    format!("{} ({})", trunc, s.as_ref().chars().count())
}

/// Short preview of a potentially huge value, like a base64 image, for display purposes.
pub(crate) fn preview(s: &str, max_chars: usize) -> String {
    format!("{}...", safe_truncate_utf8(s, max_chars))
}

/// Parses a lowercase enum variant, failing with an invalid argument listing the options.
pub(crate) fn parse_variant<T>(value: &str, what: &str) -> Result<T, MessageError>
where
    T: IntoEnumIterator + AsRef<str>,
{
    T::iter().find(|v| v.as_ref() == value).ok_or_else(|| {
        MessageError::invalid_argument(format!(
            "invalid {what} `{value}`, expected one of: {}",
            T::iter().map(|v| v.as_ref().to_string()).join(", ")
        ))
    })
}
