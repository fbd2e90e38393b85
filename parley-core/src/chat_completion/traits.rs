use async_trait::async_trait;
use dyn_clone::DynClone;
use std::sync::Arc;

use super::{
    chat_completion_request::ChatCompletionRequest, chat_completion_response::Completion,
    errors::CompletionError,
};

/// A provider that can complete a conversation
///
/// Implementations serialize the request's messages with its substitution, send them to the
/// provider in a single call, and convert every returned choice into an assistant message.
#[async_trait]
pub trait ChatCompletion: Send + Sync + DynClone {
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<Completion, CompletionError>;
}

#[async_trait]
impl ChatCompletion for Box<dyn ChatCompletion> {
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<Completion, CompletionError> {
        (**self).complete(request).await
    }
}

#[async_trait]
impl ChatCompletion for &dyn ChatCompletion {
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<Completion, CompletionError> {
        (**self).complete(request).await
    }
}

#[async_trait]
impl ChatCompletion for Arc<dyn ChatCompletion> {
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<Completion, CompletionError> {
        (**self).complete(request).await
    }
}

impl<LLM> From<&LLM> for Box<dyn ChatCompletion>
where
    LLM: ChatCompletion + Clone + 'static,
{
    fn from(llm: &LLM) -> Self {
        Box::new(llm.clone()) as Box<dyn ChatCompletion>
    }
}

dyn_clone::clone_trait_object!(ChatCompletion);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chat_completion::{ChatCompletionResponse, Choice, ChoiceContent, ChoiceMessage},
        content::Content,
        message::Role,
        message_list::MessageList,
    };

    /// Answers with the serialized last message
    #[derive(Clone)]
    struct Echo;

    #[async_trait]
    impl ChatCompletion for Echo {
        async fn complete(
            &self,
            request: &ChatCompletionRequest,
        ) -> Result<Completion, CompletionError> {
            let records = request.messages().to_dict(request.substitution())?;
            let text = records
                .last()
                .and_then(|record| record["content"][0]["text"].as_str())
                .unwrap_or_default()
                .to_string();

            Completion::try_from(ChatCompletionResponse {
                id: "echo".into(),
                object: "chat.completion".into(),
                created: 0,
                model: request.model().unwrap_or("echo").into(),
                choices: vec![Choice {
                    index: 0,
                    message: ChoiceMessage {
                        role: Role::Assistant,
                        content: Some(ChoiceContent::Text(text)),
                        refusal: None,
                    },
                    finish_reason: None,
                }],
                usage: None,
                extra: serde_json::Map::new(),
            })
        }
    }

    fn request(text: &str) -> ChatCompletionRequest {
        let mut messages = MessageList::new();
        messages.add_user_message(Content::text(text), None).unwrap();
        messages.into()
    }

    #[test_log::test(tokio::test)]
    async fn test_trait_objects_delegate() {
        let boxed: Box<dyn ChatCompletion> = Box::new(Echo);
        let cloned = boxed.clone();
        let shared: Arc<dyn ChatCompletion> = Arc::new(Echo);

        for completion in [
            boxed.complete(&request("boxed")).await,
            cloned.complete(&request("cloned")).await,
            shared.complete(&request("shared")).await,
        ] {
            assert!(completion.unwrap().first().is_some());
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_box_from_reference() {
        let echo = Echo;
        let boxed: Box<dyn ChatCompletion> = (&echo).into();

        let completion = boxed.complete(&request("hello")).await.unwrap();

        assert_eq!(
            completion.first().and_then(crate::message::Message::text).as_deref(),
            Some("hello")
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_substitution_errors_surface_before_completion() {
        let result = Echo.complete(&request("Say {y}")).await;

        assert!(matches!(result, Err(CompletionError::Substitution(_))));
    }
}
