//! The conversation history sent to a completion endpoint
use std::fmt;

use itertools::Itertools as _;
use serde_json::Value;

use crate::{
    content::Content,
    errors::{MessageError, SubstitutionError},
    message::{Message, Role},
    substitution::SubstitutionDict,
};

/// An ordered conversation plus an optional system prompt
///
/// The system prompt is kept apart from the conversation. It is always serialized first, and
/// indexing or popping never touches it.
///
/// Every mutation validates before it changes anything; a failed call leaves the list as it
/// was.
///
/// # Example
///
/// ```
/// # use parley_core::{Content, MessageList};
/// let mut messages = MessageList::new();
/// messages.add_user_message(Content::text("I hate this."), None)?;
/// messages.set_system_prompt("Classify sentiment.", None)?;
///
/// let records = messages.to_dict(None)?;
/// assert_eq!(records[0]["role"], "system");
/// assert_eq!(records[1]["content"][0]["text"], "I hate this.");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageList {
    system_message: Option<Message>,
    messages: Vec<Message>,
}

impl MessageList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets or replaces the system prompt
    ///
    /// # Errors
    ///
    /// Errors with [`MessageError::InvalidArgument`] if `content` is not text
    pub fn set_system_prompt(
        &mut self,
        content: impl Into<Content>,
        name: Option<&str>,
    ) -> Result<(), MessageError> {
        let content = content.into();
        if !content.is_text() {
            return Err(MessageError::invalid_argument(
                "the system prompt must be text",
            ));
        }

        self.system_message = Some(Message::new(Role::System, content, name)?);
        Ok(())
    }

    pub fn unset_system_prompt(&mut self) {
        self.system_message = None;
    }

    /// # Errors
    ///
    /// Errors if `content` is empty
    pub fn add_user_message(
        &mut self,
        content: impl Into<Vec<Content>>,
        name: Option<&str>,
    ) -> Result<(), MessageError> {
        self.messages.push(Message::new(Role::User, content, name)?);
        Ok(())
    }

    /// # Errors
    ///
    /// Errors if `content` is empty
    pub fn add_assistant_message(
        &mut self,
        content: impl Into<Vec<Content>>,
        name: Option<&str>,
    ) -> Result<(), MessageError> {
        self.messages
            .push(Message::new(Role::Assistant, content, name)?);
        Ok(())
    }

    /// Appends a prebuilt message
    ///
    /// A system message replaces the system prompt instead.
    pub fn add_message(&mut self, message: Message) {
        if message.role().is_system() {
            self.system_message = Some(message);
        } else {
            self.messages.push(message);
        }
    }

    /// Replaces the message at `index` with a newly built one, returning the old message
    ///
    /// # Errors
    ///
    /// - [`MessageError::IndexOutOfRange`] if there is no message at `index`
    /// - [`MessageError::InvalidArgument`] if `role` is system or the new message is invalid
    pub fn modify_message(
        &mut self,
        index: usize,
        role: Role,
        content: impl Into<Vec<Content>>,
        name: Option<&str>,
    ) -> Result<Message, MessageError> {
        self.check_index(index)?;
        check_conversation_role(role)?;

        let message = Message::new(role, content, name)?;
        Ok(std::mem::replace(&mut self.messages[index], message))
    }

    /// Replaces the message at `index`, returning the old message
    ///
    /// # Errors
    ///
    /// - [`MessageError::IndexOutOfRange`] if there is no message at `index`
    /// - [`MessageError::InvalidArgument`] if `message` is a system message
    pub fn modify_message_with_object(
        &mut self,
        index: usize,
        message: Message,
    ) -> Result<Message, MessageError> {
        self.check_index(index)?;
        check_conversation_role(message.role())?;

        Ok(std::mem::replace(&mut self.messages[index], message))
    }

    /// Removes the most recent message
    ///
    /// # Errors
    ///
    /// Errors with [`MessageError::NothingToPop`] if the conversation is empty
    pub fn pop_message(&mut self) -> Result<Message, MessageError> {
        self.messages.pop().ok_or(MessageError::NothingToPop)
    }

    /// Removes the last `n` messages, most recent first
    ///
    /// # Errors
    ///
    /// Errors with [`MessageError::NotEnoughMessages`] if there are fewer than `n` messages,
    /// in which case nothing is removed
    pub fn pop_messages(&mut self, n: usize) -> Result<Vec<Message>, MessageError> {
        let available = self.messages.len();
        if n > available {
            return Err(MessageError::NotEnoughMessages {
                requested: n,
                available,
            });
        }

        let mut popped = self.messages.split_off(available - n);
        popped.reverse();
        Ok(popped)
    }

    /// Serializes the system prompt followed by the conversation in insertion order
    ///
    /// # Errors
    ///
    /// Errors if a placeholder has no value or is malformed
    pub fn to_dict(
        &self,
        substitution: Option<&SubstitutionDict>,
    ) -> Result<Vec<Value>, SubstitutionError> {
        self.iter_all()
            .map(|message| message.to_dict(substitution))
            .collect()
    }

    /// Number of messages, excluding the system prompt
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    /// Iterates the conversation, excluding the system prompt
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn system_message(&self) -> Option<&Message> {
        self.system_message.as_ref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    fn iter_all(&self) -> impl Iterator<Item = &Message> {
        self.system_message.iter().chain(&self.messages)
    }

    fn check_index(&self, index: usize) -> Result<(), MessageError> {
        if index >= self.messages.len() {
            return Err(MessageError::IndexOutOfRange {
                index,
                len: self.messages.len(),
            });
        }
        Ok(())
    }
}

fn check_conversation_role(role: Role) -> Result<(), MessageError> {
    if role.is_system() {
        return Err(MessageError::invalid_argument(
            "only user and assistant messages can be placed in the conversation",
        ));
    }
    Ok(())
}

impl<'a> IntoIterator for &'a MessageList {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<Message> for MessageList {
    fn extend<T: IntoIterator<Item = Message>>(&mut self, iter: T) {
        for message in iter {
            self.add_message(message);
        }
    }
}

impl fmt::Display for MessageList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.iter_all().join("\n"))
    }
}
