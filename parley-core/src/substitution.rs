//! Deferred placeholder substitution
//!
//! Message text can contain `{name}` placeholders. They are never replaced in place; instead a
//! [`SubstitutionDict`] is handed to `to_dict` when a message, or a whole message list, is
//! serialized. The original conversation stays untouched, so the same list can be sent many
//! times with different values.
//!
//! `{{` and `}}` render literal braces. A placeholder without a value is an error, as is an
//! unbalanced brace.
//!
//! # Example
//!
//! ```
//! # use parley_core::substitution::{SubstitutionDict, substitute};
//! let substitution = SubstitutionDict::new().with("criterion", "toxic");
//!
//! assert_eq!(
//!     substitute("Is the text {criterion}? Answer {{yes}} or {{no}}.", Some(&substitution)).unwrap(),
//!     "Is the text toxic? Answer {yes} or {no}."
//! );
//! assert!(substitute("Hello {name}", None).is_err());
//! ```
use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{MessageError, SubstitutionError};

lazy_static! {
    /// Escaped braces, placeholders, and any brace left over
    static ref PLACEHOLDER: Regex = Regex::new(r"\{\{|\}\}|\{([^{}]*)\}|[{}]").unwrap();
}

/// A mapping of placeholder names to their replacement values
///
/// Both keys and values are strings. Values coming from untyped sources, like JSON, are checked
/// on every write with [`SubstitutionDict::try_insert_json`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubstitutionDict(HashMap<String, String>);

impl SubstitutionDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a value, returning the previous one
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Adds a value and returns the dictionary
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds a value from untyped JSON
    ///
    /// # Errors
    ///
    /// Errors with [`MessageError::InvalidArgument`] if either the key or the value is not a
    /// JSON string. The dictionary is left unchanged.
    pub fn try_insert_json(
        &mut self,
        key: &Value,
        value: &Value,
    ) -> Result<Option<String>, MessageError> {
        let Value::String(key) = key else {
            return Err(MessageError::invalid_argument(format!(
                "substitution key must be a string, got `{key}`"
            )));
        };
        let Value::String(value) = value else {
            return Err(MessageError::invalid_argument(format!(
                "substitution value for `{key}` must be a string, got `{value}`"
            )));
        };

        Ok(self.insert(key.clone(), value.clone()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Looks up a placeholder
    ///
    /// # Errors
    ///
    /// Errors with [`SubstitutionError::MissingKey`] if there is no value for `key`
    pub fn lookup(&self, key: &str) -> Result<&str, SubstitutionError> {
        self.get(key)
            .ok_or_else(|| SubstitutionError::MissingKey(key.to_string()))
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Renders `template` against this dictionary
    ///
    /// # Errors
    ///
    /// See [`substitute`]
    pub fn render(&self, template: &str) -> Result<String, SubstitutionError> {
        let mut rendered = String::with_capacity(template.len());
        let mut last = 0;

        for captures in PLACEHOLDER.captures_iter(template) {
            let Some(token) = captures.get(0) else {
                continue;
            };
            rendered.push_str(&template[last..token.start()]);
            last = token.end();

            match (token.as_str(), captures.get(1)) {
                ("{{", _) => rendered.push('{'),
                ("}}", _) => rendered.push('}'),
                (_, Some(key)) if key.as_str().is_empty() => {
                    return Err(SubstitutionError::MalformedPlaceholder {
                        position: token.start(),
                        reason: "empty placeholder",
                    });
                }
                (_, Some(key)) if key.as_str().contains([':', '!']) => {
                    return Err(SubstitutionError::MalformedPlaceholder {
                        position: token.start(),
                        reason: "format specs and conversions are not supported",
                    });
                }
                (_, Some(key)) => rendered.push_str(self.lookup(key.as_str())?),
                ("{", None) => {
                    return Err(SubstitutionError::MalformedPlaceholder {
                        position: token.start(),
                        reason: "unclosed '{'",
                    });
                }
                _ => {
                    return Err(SubstitutionError::MalformedPlaceholder {
                        position: token.start(),
                        reason: "single '}' encountered",
                    });
                }
            }
        }
        rendered.push_str(&template[last..]);

        Ok(rendered)
    }
}

/// Interpolates every `{name}` placeholder in `template`
///
/// Without a dictionary the template is rendered against an empty one: text without
/// placeholders passes through unchanged, any placeholder fails.
///
/// # Errors
///
/// - [`SubstitutionError::MissingKey`] if a placeholder has no value
/// - [`SubstitutionError::MalformedPlaceholder`] on an empty placeholder, an unbalanced brace, or
///   a placeholder with a format spec (`{x:>5}`) or conversion (`{x!r}`)
pub fn substitute(
    template: &str,
    substitution: Option<&SubstitutionDict>,
) -> Result<String, SubstitutionError> {
    match substitution {
        Some(substitution) => substitution.render(template),
        None => SubstitutionDict::default().render(template),
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SubstitutionDict {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for SubstitutionDict {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        self.0
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl TryFrom<Value> for SubstitutionDict {
    type Error = MessageError;

    /// Builds a dictionary from a JSON object with string values only
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(map) = value else {
            return Err(MessageError::invalid_argument(format!(
                "substitutions must be a JSON object, got `{value}`"
            )));
        };

        let mut substitution = SubstitutionDict::new();
        for (key, value) in map {
            substitution.try_insert_json(&Value::String(key), &value)?;
        }
        Ok(substitution)
    }
}
