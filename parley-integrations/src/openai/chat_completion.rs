use async_trait::async_trait;
use parley_core::{
    MessageList, SubstitutionDict,
    chat_completion::{
        ChatCompletion, ChatCompletionRequest, ChatCompletionResponse, Completion,
        CompletionOptions, errors::CompletionError,
    },
    util::debug_long_utf8,
};
use serde_json::{Map, Value};

use super::{GenericChatCompletionEndpoint, openai_error_to_completion_error};

const LOG_PAYLOAD_CHARS: usize = 500;

#[async_trait]
impl<
    C: async_openai::config::Config
        + std::default::Default
        + Sync
        + Send
        + std::fmt::Debug
        + Clone
        + 'static,
> ChatCompletion for GenericChatCompletionEndpoint<C>
{
    #[tracing::instrument(skip_all, err)]
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<Completion, CompletionError> {
        let model = request.model().unwrap_or(&self.default_model);
        let options = request.options().map_or_else(
            || self.default_options.clone(),
            |options| options.merged_with(&self.default_options),
        );
        let messages = request.messages().to_dict(request.substitution())?;

        let body = build_request_body(model, messages, &options)?;

        tracing::debug!(
            model = model,
            request = debug_long_utf8(body.to_string(), LOG_PAYLOAD_CHARS),
            "Sending request to OpenAI"
        );

        let response: ChatCompletionResponse = self
            .client
            .chat()
            .create_byot(body)
            .await
            .map_err(openai_error_to_completion_error)?;

        tracing::debug!(
            id = %response.id,
            choices = response.choices.len(),
            usage = ?response.usage,
            "Received response from OpenAI"
        );

        Completion::try_from(response)
    }
}

impl<
    C: async_openai::config::Config
        + std::default::Default
        + Sync
        + Send
        + std::fmt::Debug
        + Clone
        + 'static,
> GenericChatCompletionEndpoint<C>
{
    /// Completes `messages` in a single call
    ///
    /// Placeholders are interpolated with `substitution`. Without a `model`, the default model is
    /// used. `options` are merged over the endpoint's default options.
    ///
    /// Returns one assistant message per choice, next to the raw response.
    ///
    /// # Errors
    ///
    /// - [`CompletionError::Substitution`] if a placeholder has no value, before anything is sent
    /// - [`CompletionError::Client`] if the request fails, with the client error as source
    /// - [`CompletionError::UnexpectedResponse`] if no choice has content
    pub async fn completions(
        &self,
        messages: &MessageList,
        substitution: Option<&SubstitutionDict>,
        model: Option<&str>,
        options: Option<&CompletionOptions>,
    ) -> Result<Completion, CompletionError> {
        let mut request = ChatCompletionRequest::builder();
        request.messages(messages.clone());
        if let Some(substitution) = substitution {
            request.substitution(substitution.clone());
        }
        if let Some(model) = model {
            request.model(model);
        }
        if let Some(options) = options {
            request.options(options.clone());
        }
        let request = request
            .build()
            .map_err(|e| CompletionError::InvalidRequest(e.to_string()))?;

        self.complete(&request).await
    }
}

/// Builds the request body from serialized messages and options
///
/// `stream` is removed, only single responses are supported.
fn build_request_body(
    model: &str,
    messages: Vec<Value>,
    options: &CompletionOptions,
) -> Result<Value, CompletionError> {
    let mut body = match serde_json::to_value(options) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            return Err(CompletionError::InvalidRequest(format!(
                "options must serialize to an object, got `{other}`"
            )));
        }
        Err(e) => return Err(CompletionError::InvalidRequest(e.to_string())),
    };

    if body.remove("stream").is_some() {
        tracing::warn!("The 'stream' option is not supported for completions and is ignored");
    }

    body.insert("model".to_string(), model.into());
    body.insert("messages".to_string(), messages.into());

    Ok(Value::Object(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openai::ChatCompletionEndpoint;
    use parley_core::Content;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, method, path},
    };

    fn endpoint(server: &MockServer) -> ChatCompletionEndpoint {
        let config = async_openai::config::OpenAIConfig::new()
            .with_api_base(server.uri())
            .with_api_key("sk-test");

        ChatCompletionEndpoint::builder()
            .client(async_openai::Client::with_config(config))
            .default_model("gpt-4o-mini")
            .build()
            .unwrap()
    }

    fn sentiment() -> MessageList {
        let mut messages = MessageList::new();
        messages
            .set_system_prompt("Classify sentiment.", None)
            .unwrap();
        messages
            .add_user_message(Content::text("I hate {thing}."), None)
            .unwrap();
        messages
    }

    fn response_body(replies: &[&str]) -> Value {
        let choices = replies
            .iter()
            .enumerate()
            .map(|(index, reply)| {
                json!({
                    "index": index,
                    "message": {"role": "assistant", "content": reply},
                    "finish_reason": "stop"
                })
            })
            .collect::<Vec<_>>();

        json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "created": 1_700_000_000,
            "model": "gpt-4o-mini",
            "choices": choices,
            "usage": {"prompt_tokens": 20, "completion_tokens": 2, "total_tokens": 22}
        })
    }

    #[test]
    fn test_request_body_strips_stream() {
        let options = CompletionOptions::builder()
            .n(2_u8)
            .option("stream", true)
            .build()
            .unwrap();

        let body = build_request_body("gpt-4o", vec![json!({"role": "user"})], &options).unwrap();

        assert_eq!(
            body,
            json!({
                "model": "gpt-4o",
                "messages": [{"role": "user"}],
                "n": 2,
                "store": false
            })
        );
    }

    #[test]
    fn test_model_and_messages_cannot_be_overridden_by_options() {
        let options = CompletionOptions::builder()
            .option("model", "other")
            .build()
            .unwrap();

        let body = build_request_body("gpt-4o", vec![], &options).unwrap();

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"], json!([]));
    }

    #[test_log::test(tokio::test)]
    async fn test_completions_sends_serialized_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({
                "model": "gpt-4o-mini",
                "store": false,
                "messages": [
                    {"role": "system", "content": [{"type": "text", "text": "Classify sentiment."}]},
                    {"role": "user", "content": [{"type": "text", "text": "I hate this."}]}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(response_body(&["negative"])))
            .expect(1)
            .mount(&server)
            .await;

        let substitution = SubstitutionDict::new().with("thing", "this");
        let completion = endpoint(&server)
            .completions(&sentiment(), Some(&substitution), None, None)
            .await
            .unwrap();

        assert_eq!(
            completion.first().and_then(parley_core::Message::text).as_deref(),
            Some("negative")
        );
        assert_eq!(completion.response.id, "chatcmpl-123");
        assert_eq!(completion.usage().map(|u| u.total_tokens), Some(22));
    }

    #[test_log::test(tokio::test)]
    async fn test_filtered_choice_keeps_the_others() {
        let server = MockServer::start().await;
        let mut body = response_body(&["positive", "unused"]);
        body["choices"][1]["message"]["content"] = Value::Null;
        body["choices"][1]["finish_reason"] = "content_filter".into();
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let substitution = SubstitutionDict::new().with("thing", "this");
        let completion = endpoint(&server)
            .completions(&sentiment(), Some(&substitution), None, None)
            .await
            .unwrap();

        assert_eq!(completion.messages.len(), 1);
        assert_eq!(
            completion.response.choices[1].finish_reason.as_deref(),
            Some("content_filter")
        );
        assert_eq!(completion.usage().map(|u| u.total_tokens), Some(22));
    }

    #[test_log::test(tokio::test)]
    async fn test_missing_substitution_fails_before_sending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(response_body(&["never"])))
            .expect(0)
            .mount(&server)
            .await;

        let result = endpoint(&server)
            .completions(&sentiment(), None, None, None)
            .await;

        assert!(matches!(result, Err(CompletionError::Substitution(_))));
    }
}
