#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Core types for building chat conversations
//!
//! Conversations are built from typed [`Content`], role tagged [`Message`]s and a
//! [`MessageList`]. Placeholders in message text are only interpolated with a
//! [`SubstitutionDict`] when a conversation is serialized, so the same conversation can be
//! completed many times with different values.
//!
//! Providers implement [`ChatCompletion`].

pub mod chat_completion;
pub mod content;
pub mod errors;
pub mod message;
pub mod message_list;
pub mod substitution;
pub mod text;

/// Re-export of commonly used dependencies.
pub mod prelude;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub mod util;

pub use crate::chat_completion::traits::*;
pub use crate::content::{AudioFormat, Content, ImageDetail};
pub use crate::errors::{MessageError, SubstitutionError};
pub use crate::message::{Message, Role};
pub use crate::message_list::MessageList;
pub use crate::substitution::{SubstitutionDict, substitute};
