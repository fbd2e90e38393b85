#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use parley_integrations as integrations;

/// An endpoint talking to the mock server, with a dummy api key
pub fn chat_completion_endpoint(
    mock_server_uri: &str,
    default_model: &str,
) -> integrations::openai::ChatCompletionEndpoint {
    let config = async_openai::config::OpenAIConfig::new()
        .with_api_base(mock_server_uri)
        .with_api_key("sk-test");
    let async_openai = async_openai::Client::with_config(config);
    integrations::openai::ChatCompletionEndpoint::builder()
        .client(async_openai)
        .default_model(default_model)
        .build()
        .expect("Can create chat completion endpoint.")
}

/// A chat completion response with one text choice per reply
pub fn chat_completion_body(replies: &[&str]) -> Value {
    let choices = replies
        .iter()
        .enumerate()
        .map(|(index, reply)| {
            json!({
                "index": index,
                "message": {"role": "assistant", "content": reply, "refusal": null},
                "logprobs": null,
                "finish_reason": "stop"
            })
        })
        .collect::<Vec<_>>();

    json!({
        "id": "chatcmpl-B9MBs8CjcvOU2jLn4n570S5qMJKcT",
        "object": "chat.completion",
        "created": 1_741_569_952,
        "model": "gpt-4o-mini-2024-07-18",
        "choices": choices,
        "usage": {
            "prompt_tokens": 19,
            "completion_tokens": 10,
            "total_tokens": 29
        },
        "service_tier": "default",
        "system_fingerprint": "fp_06737a9306"
    })
}

/// Mounts a chat completion answering every request with `replies`
pub async fn mock_chat_completions(mock_server: &MockServer, replies: &[&str]) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion_body(replies)))
        .mount(mock_server)
        .await;
}

/// Mounts an api error with the given status
pub async fn mock_chat_completion_error(mock_server: &MockServer, status: u16, message: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "error": {
                "message": message,
                "type": "invalid_request_error",
                "param": null,
                "code": null
            }
        })))
        .mount(mock_server)
        .await;
}

/// The bodies of every chat completion request the mock server received
pub async fn received_chat_requests(mock_server: &MockServer) -> anyhow::Result<Vec<Value>> {
    mock_server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == "/chat/completions")
        .map(|request| serde_json::from_slice(&request.body).map_err(anyhow::Error::from))
        .collect()
}
