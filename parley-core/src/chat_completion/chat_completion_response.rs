use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    content::Content,
    message::{Message, Role},
};

use super::errors::CompletionError;

/// The raw response of a chat completion
///
/// Fields this crate does not know about, like `system_fingerprint`, are kept in `extra`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionResponse {
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub created: u64,
    pub model: String,
    pub choices: Vec<Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Choice {
    pub index: u32,
    pub message: ChoiceMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChoiceMessage {
    pub role: Role,
    #[serde(default)]
    pub content: Option<ChoiceContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refusal: Option<String>,
}

/// Providers answer with either plain text or a list of content parts
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ChoiceContent {
    Text(String),
    Parts(Vec<ChoicePart>),
}

/// A content part of a choice, either regular content or a refusal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ChoicePart {
    Content(Content),
    Refusal(RefusalPart),
}

/// `{"type": "refusal", "refusal": "..."}`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RefusalPart {
    Refusal { refusal: String },
}

impl From<&ChoicePart> for Content {
    fn from(part: &ChoicePart) -> Self {
        match part {
            ChoicePart::Content(content) => content.clone(),
            ChoicePart::Refusal(RefusalPart::Refusal { refusal }) => Content::text(refusal),
        }
    }
}

#[derive(Clone, Copy, Default, Builder, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    pub fn builder() -> UsageBuilder {
        UsageBuilder::default()
    }
}

impl Choice {
    /// Converts the choice into an assistant message
    ///
    /// Plain text becomes a single text content. Refusals, as a part or without content, are
    /// kept as text. Returns `None` if the choice has no content at all, i.e. when it was
    /// filtered.
    pub fn to_message(&self) -> Option<Message> {
        let content: Vec<Content> = match (&self.message.content, &self.message.refusal) {
            (Some(ChoiceContent::Text(text)), _) => vec![Content::text(text)],
            (Some(ChoiceContent::Parts(parts)), _) if !parts.is_empty() => {
                parts.iter().map(Content::from).collect()
            }
            (_, Some(refusal)) => vec![Content::text(refusal)],
            _ => return None,
        };

        Message::new(Role::Assistant, content, None).ok()
    }
}

/// The generated messages of a completion, next to the raw response
///
/// There is one assistant message per choice with content, in choice order. Choices without
/// content are only in the raw response, where their `finish_reason` tells why.
#[derive(Clone, Debug, PartialEq)]
pub struct Completion {
    pub messages: Vec<Message>,
    pub response: ChatCompletionResponse,
}

impl Completion {
    /// The message of the first choice
    pub fn first(&self) -> Option<&Message> {
        self.messages.first()
    }

    pub fn usage(&self) -> Option<&Usage> {
        self.response.usage.as_ref()
    }

    pub fn into_parts(self) -> (Vec<Message>, ChatCompletionResponse) {
        (self.messages, self.response)
    }
}

impl TryFrom<ChatCompletionResponse> for Completion {
    type Error = CompletionError;

    /// # Errors
    ///
    /// Errors with [`CompletionError::UnexpectedResponse`] if no choice has content. The
    /// response is kept in the error.
    fn try_from(response: ChatCompletionResponse) -> Result<Self, Self::Error> {
        let mut messages = Vec::with_capacity(response.choices.len());
        for choice in &response.choices {
            match choice.to_message() {
                Some(message) => messages.push(message),
                None => tracing::warn!(
                    index = choice.index,
                    finish_reason = choice.finish_reason.as_deref(),
                    "Skipping choice without content"
                ),
            }
        }

        if messages.is_empty() {
            return Err(CompletionError::UnexpectedResponse {
                reason: "expected at least one choice with content".to_string(),
                response: Box::new(response),
            });
        }

        Ok(Completion { messages, response })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn response(choices: &Value) -> ChatCompletionResponse {
        serde_json::from_value(json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "created": 1_700_000_000,
            "model": "gpt-4o-mini",
            "system_fingerprint": "fp_44709d6fcb",
            "choices": choices,
            "usage": {"prompt_tokens": 9, "completion_tokens": 12, "total_tokens": 21}
        }))
        .unwrap()
    }

    #[test]
    fn test_text_choices_become_assistant_messages() {
        let completion = Completion::try_from(response(&json!([
            {"index": 0, "message": {"role": "assistant", "content": "negative"}, "finish_reason": "stop"},
            {"index": 1, "message": {"role": "assistant", "content": "Negative."}, "finish_reason": "stop"}
        ])))
        .unwrap();

        assert_eq!(
            completion.messages,
            vec![
                Message::assistant(Content::text("negative")).unwrap(),
                Message::assistant(Content::text("Negative.")).unwrap(),
            ]
        );
        assert_eq!(completion.usage().map(|u| u.total_tokens), Some(21));
        assert_eq!(
            completion.response.extra["system_fingerprint"],
            json!("fp_44709d6fcb")
        );
    }

    #[test]
    fn test_content_parts_are_kept() {
        let completion = Completion::try_from(response(&json!([
            {"index": 0, "message": {"role": "assistant", "content": [
                {"type": "text", "text": "first"},
                {"type": "text", "text": "second"}
            ]}}
        ])))
        .unwrap();

        assert_eq!(
            completion.first().unwrap().contents(),
            [Content::text("first"), Content::text("second")]
        );
    }

    #[test]
    fn test_refusal_becomes_text() {
        let completion = Completion::try_from(response(&json!([
            {"index": 0, "message": {"role": "assistant", "content": null, "refusal": "I can't help with that."}}
        ])))
        .unwrap();

        assert_eq!(
            completion.first().and_then(Message::text).as_deref(),
            Some("I can't help with that.")
        );
    }

    #[test]
    fn test_refusal_parts_become_text() {
        let completion = Completion::try_from(response(&json!([
            {"index": 0, "message": {"role": "assistant", "content": [
                {"type": "text", "text": "Partly:"},
                {"type": "refusal", "refusal": "no"}
            ]}}
        ])))
        .unwrap();

        assert_eq!(
            completion.first().unwrap().contents(),
            [Content::text("Partly:"), Content::text("no")]
        );
    }

    #[test]
    fn test_filtered_choices_are_skipped() {
        let completion = Completion::try_from(response(&json!([
            {"index": 0, "message": {"role": "assistant", "content": "ok"}, "finish_reason": "stop"},
            {"index": 1, "message": {"role": "assistant", "content": null}, "finish_reason": "content_filter"}
        ])))
        .unwrap();

        assert_eq!(
            completion.messages,
            vec![Message::assistant(Content::text("ok")).unwrap()]
        );
        assert_eq!(completion.response.choices.len(), 2);
        assert_eq!(completion.usage().map(|u| u.total_tokens), Some(21));
    }

    #[test]
    fn test_response_without_any_content_is_kept_in_the_error() {
        let result = Completion::try_from(response(&json!([
            {"index": 0, "message": {"role": "assistant", "content": null}, "finish_reason": "length"}
        ])));

        let Err(CompletionError::UnexpectedResponse { response, .. }) = result else {
            panic!("expected an unexpected response error");
        };
        assert_eq!(response.id, "chatcmpl-123");
        assert_eq!(response.choices[0].finish_reason.as_deref(), Some("length"));
    }

    #[test]
    fn test_response_round_trips_through_serde() {
        let original = response(&json!([
            {"index": 0, "message": {"role": "assistant", "content": "ok"}, "finish_reason": "stop"}
        ]));

        let value = serde_json::to_value(&original).unwrap();
        assert_eq!(value["system_fingerprint"], "fp_44709d6fcb");
        assert_eq!(
            serde_json::from_value::<ChatCompletionResponse>(value).unwrap(),
            original
        );
    }
}
