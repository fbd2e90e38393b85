//! Role tagged messages
use std::{fmt, str::FromStr};

use colored::Colorize as _;
use itertools::Itertools as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    content::Content,
    errors::{MessageError, SubstitutionError},
    substitution::{SubstitutionDict, substitute},
    util::parse_variant,
};

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::AsRefStr,
    strum_macros::EnumIter,
    strum_macros::EnumIs,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl FromStr for Role {
    type Err = MessageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(s, "role")
    }
}

/// A role tagged, non-empty sequence of contents
///
/// A system message holds exactly one text content. User and assistant messages accept any
/// mix of contents. Messages are immutable; a [`crate::MessageList`] replaces them wholesale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Message {
    role: Role,
    content: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl Message {
    /// Creates a new message
    ///
    /// # Errors
    ///
    /// Errors with [`MessageError::InvalidArgument`] if the content is empty, or if a system
    /// message does not consist of exactly one text content.
    pub fn new(
        role: Role,
        content: impl Into<Vec<Content>>,
        name: Option<&str>,
    ) -> Result<Self, MessageError> {
        let content = content.into();

        if content.is_empty() {
            return Err(MessageError::invalid_argument(
                "a message needs at least one content",
            ));
        }

        if role.is_system() && !matches!(content.as_slice(), [Content::Text { .. }]) {
            return Err(MessageError::invalid_argument(
                "a system message must contain exactly one text content",
            ));
        }

        Ok(Self {
            role,
            content,
            name: name.map(ToString::to_string),
        })
    }

    /// Creates a message from an untyped role
    ///
    /// # Errors
    ///
    /// Errors if the role is not one of `system`, `user` or `assistant`, or if the message
    /// is invalid for the role. See [`Message::new`].
    pub fn try_new(
        role: &str,
        content: impl Into<Vec<Content>>,
        name: Option<&str>,
    ) -> Result<Self, MessageError> {
        Self::new(role.parse()?, content, name)
    }

    /// A system message can only hold text, so this cannot fail
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: vec![Content::text(text)],
            name: None,
        }
    }

    /// # Errors
    ///
    /// Errors if `content` is empty
    pub fn user(content: impl Into<Vec<Content>>) -> Result<Self, MessageError> {
        Self::new(Role::User, content, None)
    }

    /// # Errors
    ///
    /// Errors if `content` is empty
    pub fn assistant(content: impl Into<Vec<Content>>) -> Result<Self, MessageError> {
        Self::new(Role::Assistant, content, None)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn contents(&self) -> &[Content] {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Always false, messages are never empty
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Content> {
        self.content.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Content> {
        self.content.iter()
    }

    /// All text contents joined by newlines, or `None` if there is no text
    pub fn text(&self) -> Option<String> {
        let texts = self.content.iter().filter_map(Content::as_text).collect_vec();

        if texts.is_empty() {
            None
        } else {
            Some(texts.join("\n"))
        }
    }

    /// The serialized message, with placeholders interpolated in texts and the name
    ///
    /// # Errors
    ///
    /// Errors if a placeholder has no value or is malformed
    pub fn to_dict(&self, substitution: Option<&SubstitutionDict>) -> Result<Value, SubstitutionError> {
        let content = self
            .content
            .iter()
            .map(|content| content.to_dict(substitution))
            .collect::<Result<Vec<_>, _>>()?;

        let mut record = Map::new();
        record.insert("role".into(), self.role.as_ref().into());
        record.insert("content".into(), content.into());
        if let Some(name) = &self.name {
            record.insert("name".into(), substitute(name, substitution)?.into());
        }

        Ok(Value::Object(record))
    }
}

impl<'a> IntoIterator for &'a Message {
    type Item = &'a Content;
    type IntoIter = std::slice::Iter<'a, Content>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let heading = match &self.name {
            Some(name) => format!("{} ({name}): ", self.role),
            None => format!("{}: ", self.role),
        };
        let indent = format!("\n{}", " ".repeat(heading.chars().count()));
        let content = self.content.iter().join("\n").replace('\n', &indent);

        write!(f, "{}{content}", heading.blue())
    }
}
