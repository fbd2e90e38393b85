//! Classifies the sentiment of a conversation, then continues it with one of the answers.
//!
//! Set the `OPENAI_API_KEY` environment variable before running.

use anyhow::Result;
use parley::{
    Content, MessageList, chat_completion::CompletionOptions,
    integrations::openai::ChatCompletionEndpoint,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let endpoint = ChatCompletionEndpoint::from_env()?;

    let mut messages = MessageList::new();
    messages.set_system_prompt(
        "You are an AI chatbot that helps people classify the sentiment of their words. \
         Respond with 'Positive', 'Negative', 'Neutral', 'Mixed', or 'Unknown', followed by a \
         brief explanation.",
        None,
    )?;
    messages.add_user_message(Content::text("I hate this restaurant!"), None)?;

    println!("{messages}");
    println!("{}", "-".repeat(40));

    let options = CompletionOptions::builder()
        .temperature(1.0_f32)
        .n(2_u8)
        .build()?;
    let completion = endpoint
        .completions(&messages, None, None, Some(&options))
        .await?;

    for (i, message) in completion.messages.iter().enumerate() {
        println!("Response {}:", i + 1);
        println!("{message}");
    }
    tracing::info!(usage = ?completion.usage(), "Completed");

    // Continue the conversation with the first answer
    let (mut replies, _) = completion.into_parts();
    if !replies.is_empty() {
        messages.add_message(replies.swap_remove(0));
    }
    messages.add_user_message(Content::text("I love this place!"), None)?;

    let completion = endpoint.completions(&messages, None, None, None).await?;
    if let Some(reply) = completion.first() {
        println!("{reply}");
    }

    Ok(())
}
