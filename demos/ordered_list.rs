//! Asks for a numbered list and splits the markdown answer into plain items.
//!
//! Set the `OPENAI_API_KEY` environment variable before running.

use anyhow::Result;
use parley::{
    Content, MessageList, integrations::openai::ChatCompletionEndpoint, text::MarkdownOptions,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let endpoint = ChatCompletionEndpoint::from_env()?;

    let mut messages = MessageList::new();
    messages.add_user_message(
        Content::text("Give me three reasons to learn Rust, as a numbered markdown list."),
        None,
    )?;

    let completion = endpoint.completions(&messages, None, None, None).await?;
    let Some(reply) = completion.first() else {
        anyhow::bail!("no reply");
    };

    for content in reply {
        if let Some(items) = content.split_ordered_list(Some(&MarkdownOptions::default())) {
            for (i, item) in items.iter().enumerate() {
                println!("{i}: {item}");
            }
        }
    }

    Ok(())
}
