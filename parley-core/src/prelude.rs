pub use async_trait::async_trait;

pub use crate::chat_completion::{
    ChatCompletion, ChatCompletionRequest, Completion, CompletionOptions,
    errors::CompletionError,
};
pub use crate::content::{AudioFormat, Content, ImageDetail};
pub use crate::errors::{MessageError, SubstitutionError};
pub use crate::message::{Message, Role};
pub use crate::message_list::MessageList;
pub use crate::substitution::SubstitutionDict;
pub use crate::text::MarkdownOptions;
