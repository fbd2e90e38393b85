use derive_builder::Builder;

use crate::{message_list::MessageList, substitution::SubstitutionDict};

use super::completion_options::CompletionOptions;

/// A chat completion request represents a conversation that can be sent to any provider.
///
/// Placeholders in the conversation are only interpolated when the provider serializes it with
/// `substitution`. Without a model, the provider uses its configured default.
#[derive(Builder, Clone, PartialEq, Debug)]
#[builder(setter(into, strip_option))]
pub struct ChatCompletionRequest {
    messages: MessageList,
    #[builder(default)]
    substitution: Option<SubstitutionDict>,
    #[builder(default)]
    model: Option<String>,
    #[builder(default)]
    options: Option<CompletionOptions>,
}

impl ChatCompletionRequest {
    pub fn builder() -> ChatCompletionRequestBuilder {
        ChatCompletionRequestBuilder::default()
    }

    pub fn messages(&self) -> &MessageList {
        &self.messages
    }

    pub fn substitution(&self) -> Option<&SubstitutionDict> {
        self.substitution.as_ref()
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn options(&self) -> Option<&CompletionOptions> {
        self.options.as_ref()
    }
}

impl From<MessageList> for ChatCompletionRequest {
    fn from(messages: MessageList) -> Self {
        Self {
            messages,
            substitution: None,
            model: None,
            options: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Content;

    #[test]
    fn test_build_request() {
        let mut messages = MessageList::new();
        messages
            .add_user_message(Content::text("Say {x}"), None)
            .unwrap();

        let request = ChatCompletionRequest::builder()
            .messages(messages.clone())
            .substitution(SubstitutionDict::new().with("x", "hello"))
            .model("gpt-4o-mini")
            .build()
            .unwrap();

        assert_eq!(request.messages(), &messages);
        assert_eq!(request.model(), Some("gpt-4o-mini"));
        assert_eq!(request.substitution().and_then(|s| s.get("x")), Some("hello"));
        assert!(request.options().is_none());
    }

    #[test]
    fn test_messages_are_required() {
        assert!(ChatCompletionRequest::builder().build().is_err());
    }
}
