//! This module enables sending a conversation to a chat completion provider
//!
//! The main trait to implement is `ChatCompletion`, which takes a `ChatCompletionRequest` and
//! returns a `Completion`.
//!
//! A chat completion request is comprised of a `MessageList`, the substitutions to apply when it
//! is serialized, and optionally a model and completion options. The completion holds every
//! returned choice as an assistant `Message`, next to the raw response.
mod chat_completion_request;
mod chat_completion_response;
mod completion_options;
pub mod errors;

// Re-exported in the root per convention
pub mod traits;

pub use chat_completion_request::*;
pub use chat_completion_response::*;
pub use completion_options::*;
pub use traits::*;
