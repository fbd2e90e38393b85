//! Demonstrates passing an image to chat completions.
//!
//! Set the `OPENAI_API_KEY` environment variable before running.

use anyhow::Result;
use parley::{Content, ImageDetail, MessageList, integrations::openai::ChatCompletionEndpoint};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let endpoint = ChatCompletionEndpoint::from_env()?;

    let mut messages = MessageList::new();
    messages.add_user_message(
        vec![
            Content::text("Describe this image in one sentence."),
            Content::image_with_detail(
                "https://upload.wikimedia.org/wikipedia/commons/3/3a/Cat03.jpg",
                ImageDetail::Low,
            ),
        ],
        None,
    )?;

    println!("{messages}");

    let completion = endpoint.completions(&messages, None, None, None).await?;
    println!(
        "Image description: {}",
        completion
            .first()
            .and_then(parley::Message::text)
            .unwrap_or_else(|| "<no response>".to_string())
    );

    Ok(())
}
