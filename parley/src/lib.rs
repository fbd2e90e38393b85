//! # Parley
//!
//! Parley builds multi-modal chat conversations and sends them to `OpenAI` compatible chat
//! completion apis.
//!
//! A conversation is a [`MessageList`]: an optional system prompt and an ordered list of user
//! and assistant [`Message`]s. Messages hold typed [`Content`]: text, images and audio. Every
//! mutation is validated, and a failed one leaves the list untouched.
//!
//! Message text can contain `{placeholders}`. They are interpolated with a [`SubstitutionDict`]
//! when the conversation is sent, so one conversation can be completed many times with
//! different values. A placeholder without a value is an error, never sent as is.
//!
//! ## Example
//!
//! ```no_run
//! # use parley::{Content, MessageList, SubstitutionDict};
//! # use parley::integrations::openai::ChatCompletionEndpoint;
//! # use anyhow::Result;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let endpoint = ChatCompletionEndpoint::from_env()?;
//!
//! let mut messages = MessageList::new();
//! messages.set_system_prompt("Classify the sentiment as positive or negative.", None)?;
//! messages.add_user_message(Content::text("{review}"), None)?;
//!
//! for review in ["I love this place!", "I hate this."] {
//!     let substitution = SubstitutionDict::new().with("review", review);
//!     let completion = endpoint
//!         .completions(&messages, Some(&substitution), None, None)
//!         .await?;
//!
//!     println!("{}", completion.messages[0]);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! Parley logs with `tracing`. Requests are logged at `debug`, with long payloads truncated.
//!
//! ## Feature flags
//!
#![doc = document_features::document_features!()]

#[doc(inline)]
pub use parley_core::*;

/// Common traits, re-exported from core
pub mod traits {
    #[doc(inline)]
    pub use parley_core::chat_completion::traits::*;
}

/// Chat completion providers.
pub mod integrations {
    #[doc(inline)]
    pub use parley_integrations::*;
}
