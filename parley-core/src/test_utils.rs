#![allow(clippy::missing_panics_doc)]
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::chat_completion::{
    ChatCompletion, ChatCompletionRequest, ChatCompletionResponse, Choice, ChoiceContent,
    ChoiceMessage, Completion, errors::CompletionError,
};
use crate::message::Role;
use anyhow::Result;
use pretty_assertions::assert_eq;

type Expectations = Arc<Mutex<Vec<(ChatCompletionRequest, Result<ChatCompletionResponse>)>>>;

/// A `ChatCompletion` that answers queued expectations in order
///
/// Panics on an unexpected request, and on drop if expectations are left.
#[derive(Clone)]
pub struct MockChatCompletion {
    expectations: Expectations,
    received_expectations: Expectations,
}

impl Default for MockChatCompletion {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChatCompletion {
    pub fn new() -> Self {
        Self {
            expectations: Arc::new(Mutex::new(Vec::new())),
            received_expectations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn expect_complete(
        &self,
        request: ChatCompletionRequest,
        response: Result<ChatCompletionResponse>,
    ) {
        let mut mutex = self.expectations.lock().unwrap();

        mutex.insert(0, (request, response));
    }
}

#[async_trait]
impl ChatCompletion for MockChatCompletion {
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<Completion, CompletionError> {
        let (expected_request, response) =
            self.expectations.lock().unwrap().pop().unwrap_or_else(|| {
                panic!(
                    "Received completion request, but no expectations are set\n {}",
                    pretty_request(request)
                )
            });

        assert_eq!(
            &expected_request,
            request,
            "Unexpected request {}",
            pretty_request(request)
        );

        match response {
            Ok(response) => {
                self.received_expectations
                    .lock()
                    .unwrap()
                    .push((expected_request, Ok(response.clone())));

                Completion::try_from(response)
            }
            Err(err) => {
                self.received_expectations
                    .lock()
                    .unwrap()
                    .push((expected_request, Err(anyhow::anyhow!(err.to_string()))));

                Err(CompletionError::client(err))
            }
        }
    }
}

impl Drop for MockChatCompletion {
    fn drop(&mut self) {
        // We are still cloned, so do not check assertions yet
        if Arc::strong_count(&self.received_expectations) > 1 {
            return;
        }
        let Ok(expectations) = self.expectations.lock() else {
            return;
        };
        let Ok(received) = self.received_expectations.lock() else {
            return;
        };

        if expectations.is_empty() {
            let num_received = received.len();
            tracing::debug!("[MockChatCompletion] All {num_received} expectations were met");
        } else {
            let received = received
                .iter()
                .map(pretty_expectation)
                .collect::<Vec<_>>()
                .join("---\n");

            let pending = expectations
                .iter()
                .map(pretty_expectation)
                .collect::<Vec<_>>()
                .join("---\n");

            panic!(
                "[MockChatCompletion] Not all expectations were met\n received:\n{received}\n\npending:\n{pending}"
            );
        }
    }
}

/// A response with one text choice per reply
pub fn text_response(replies: &[&str]) -> ChatCompletionResponse {
    ChatCompletionResponse {
        id: "chatcmpl-mock".to_string(),
        object: "chat.completion".to_string(),
        created: 0,
        model: "mock".to_string(),
        choices: replies
            .iter()
            .zip(0..)
            .map(|(reply, index)| Choice {
                index,
                message: ChoiceMessage {
                    role: Role::Assistant,
                    content: Some(ChoiceContent::Text((*reply).to_string())),
                    refusal: None,
                },
                finish_reason: Some("stop".to_string()),
            })
            .collect(),
        usage: None,
        extra: serde_json::Map::new(),
    }
}

fn pretty_expectation(
    expectation: &(ChatCompletionRequest, Result<ChatCompletionResponse>),
) -> String {
    let mut output = String::new();

    let request = &expectation.0;
    output.push_str("Request:\n");
    output.push_str(&pretty_request(request));

    output.push_str(" =>\n");

    if let Ok(response) = &expectation.1 {
        output += &pretty_response(response);
    }

    output
}

fn pretty_request(request: &ChatCompletionRequest) -> String {
    let mut output = String::new();
    if let Some(system) = request.messages().system_message() {
        output.push_str(&format!(" {system}\n"));
    }
    for message in request.messages() {
        output.push_str(&format!(" {message}\n"));
    }
    output
}

fn pretty_response(response: &ChatCompletionResponse) -> String {
    let mut output = String::new();
    for choice in &response.choices {
        match choice.to_message() {
            Some(message) => output.push_str(&format!(" {message}\n")),
            None => output.push_str(" <no content>\n"),
        }
    }
    output
}
