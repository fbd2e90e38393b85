use thiserror::Error;

use crate::errors::{MessageError, SubstitutionError};

use super::ChatCompletionResponse;

pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum CompletionError {
    /// The endpoint is not configured correctly, i.e. a missing api key
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The conversation could not be serialized
    #[error(transparent)]
    Substitution(#[from] SubstitutionError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The underlying client failed. The original error is kept as the source.
    #[error("client error: {0}")]
    Client(#[source] BoxedError),

    /// The provider answered with something that cannot be turned into messages. The raw
    /// response is kept.
    #[error("unexpected response: {reason}")]
    UnexpectedResponse {
        reason: String,
        response: Box<ChatCompletionResponse>,
    },

    #[error(transparent)]
    Message(#[from] MessageError),
}

impl CompletionError {
    pub fn client(err: impl Into<BoxedError>) -> Self {
        CompletionError::Client(err.into())
    }
}

impl From<BoxedError> for CompletionError {
    fn from(err: BoxedError) -> Self {
        CompletionError::Client(err)
    }
}
