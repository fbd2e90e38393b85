//! Reuses a single conversation for several inputs with placeholder substitution.
//!
//! The conversation is never changed; values are filled in when it is sent.
//!
//! Set the `OPENAI_API_KEY` environment variable before running.

use anyhow::Result;
use parley::{Content, MessageList, SubstitutionDict, integrations::openai::ChatCompletionEndpoint};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let endpoint = ChatCompletionEndpoint::from_env()?;

    let mut messages = MessageList::new();
    messages.set_system_prompt(
        "Judge whether the text is {criterion}. Answer with {{\"verdict\": true}} or \
         {{\"verdict\": false}}.",
        None,
    )?;
    messages.add_user_message(Content::text("{user's text}"), None)?;

    for text in ["You are wonderful.", "Nobody likes you."] {
        let substitution = SubstitutionDict::new()
            .with("criterion", "toxic")
            .with("user's text", text);

        let completion = endpoint
            .completions(&messages, Some(&substitution), None, None)
            .await?;

        if let Some(reply) = completion.first() {
            println!("{text} => {}", reply.text().unwrap_or_default());
        }
    }

    Ok(())
}
