//! Tests for code written against the `ChatCompletion` trait, using the mock
use parley::chat_completion::{ChatCompletion, ChatCompletionRequest, errors::CompletionError};
use parley::test_utils::{MockChatCompletion, text_response};
use parley::{Content, Message, MessageList, SubstitutionDict};

/// Classifies every review with the same conversation
async fn classify(
    llm: &dyn ChatCompletion,
    reviews: &[&str],
) -> Result<Vec<String>, CompletionError> {
    let mut messages = MessageList::new();
    messages.set_system_prompt("Classify the sentiment of the review.", None)?;
    messages.add_user_message(Content::text("{review}"), None)?;

    let mut labels = Vec::new();
    for review in reviews {
        let request = ChatCompletionRequest::builder()
            .messages(messages.clone())
            .substitution(SubstitutionDict::new().with("review", *review))
            .build()
            .map_err(|e| CompletionError::InvalidRequest(e.to_string()))?;

        let completion = llm.complete(&request).await?;
        labels.extend(completion.first().and_then(Message::text));
    }
    Ok(labels)
}

fn expected_request(review: &str) -> ChatCompletionRequest {
    let mut messages = MessageList::new();
    messages
        .set_system_prompt("Classify the sentiment of the review.", None)
        .unwrap();
    messages
        .add_user_message(Content::text("{review}"), None)
        .unwrap();

    ChatCompletionRequest::builder()
        .messages(messages)
        .substitution(SubstitutionDict::new().with("review", review))
        .build()
        .unwrap()
}

#[test_log::test(tokio::test)]
async fn test_classify_with_mock() {
    let mock = MockChatCompletion::new();
    mock.expect_complete(
        expected_request("I love this place!"),
        Ok(text_response(&["positive"])),
    );
    mock.expect_complete(expected_request("I hate this."), Ok(text_response(&["negative"])));

    let labels = classify(&mock, &["I love this place!", "I hate this."])
        .await
        .unwrap();

    assert_eq!(labels, ["positive", "negative"]);
}

#[test_log::test(tokio::test)]
async fn test_mock_errors_are_client_errors() {
    let mock = MockChatCompletion::new();
    mock.expect_complete(
        expected_request("I hate this."),
        Err(anyhow::anyhow!("rate limited")),
    );

    let err = classify(&mock, &["I hate this."]).await.unwrap_err();

    assert!(matches!(err, CompletionError::Client(_)));
}
