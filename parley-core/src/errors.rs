//! Errors raised while building and serializing conversations.
//!
//! Completion errors live in [`crate::chat_completion::errors`].
use thiserror::Error;

/// Validation and bounds errors for contents, messages and message lists.
///
/// These are always raised at the point of construction or mutation. A failed mutation leaves
/// the message list untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("index {index} is out of range for {len} messages")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no message to pop")]
    NothingToPop,

    #[error("cannot pop {requested} messages, only {available} available")]
    NotEnoughMessages { requested: usize, available: usize },
}

impl MessageError {
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        MessageError::InvalidArgument(reason.into())
    }
}

/// Errors raised when placeholders are interpolated at serialization time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubstitutionError {
    #[error("no substitution provided for placeholder `{{{0}}}`")]
    MissingKey(String),

    #[error("malformed placeholder at byte {position}: {reason}")]
    MalformedPlaceholder {
        position: usize,
        reason: &'static str,
    },
}
