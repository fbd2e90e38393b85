//! This module provides chat completions on `OpenAI` and `OpenAI` compatible APIs. It includes the
//! `ChatCompletionEndpoint` struct, which sends a `MessageList` to the API and converts the choices
//! back into assistant messages. The module is conditionally compiled based on the "openai"
//! feature flag.

use async_openai::error::OpenAIError;
use derive_builder::Builder;
use parley_core::chat_completion::{CompletionOptions, errors::CompletionError};
use std::sync::Arc;

mod chat_completion;
mod config;

pub use config::*;

// expose type aliases to simplify downstream use of the open ai builder invocations
pub use async_openai::config::OpenAIConfig;

/// The `ChatCompletionEndpoint` struct holds an `OpenAI` client, the default model and the default
/// completion options. It uses the `Builder` pattern for flexible and customizable instantiation.
///
/// # Example
///
/// ```no_run
/// # use parley_integrations::openai::{ChatCompletionEndpoint, EndpointConfig};
///
/// // Create an endpoint with default options. The client will use the OPENAI_API_KEY environment variable.
/// let endpoint = ChatCompletionEndpoint::builder()
///     .default_model("gpt-4o-mini")
///     .build().unwrap();
///
/// // Or create it from an explicit configuration
/// let config = EndpointConfig::builder()
///     .default_model("gpt-4o-mini")
///     .api_key("my-api-key")
///     .organization("org-123")
///     .build().unwrap();
/// let endpoint = ChatCompletionEndpoint::from_config(&config);
/// ```
pub type ChatCompletionEndpoint = GenericChatCompletionEndpoint<OpenAIConfig>;
pub type ChatCompletionEndpointBuilder = GenericChatCompletionEndpointBuilder<OpenAIConfig>;

#[derive(Debug, Builder, Clone)]
#[builder(setter(into, strip_option))]
/// Generic chat completion endpoint for `OpenAI` compatible APIs.
pub struct GenericChatCompletionEndpoint<
    C: async_openai::config::Config + Default = async_openai::config::OpenAIConfig,
> {
    /// The `OpenAI` client, wrapped in an `Arc` for thread-safe reference counting.
    /// Defaults to a new instance of `async_openai::Client`.
    #[builder(
        default = "Arc::new(async_openai::Client::<C>::default())",
        setter(custom)
    )]
    client: Arc<async_openai::Client<C>>,

    /// Model used when a request does not name one.
    pub(crate) default_model: String,

    /// Options sent with every request, unless the request overrides them.
    #[builder(default)]
    pub(crate) default_options: CompletionOptions,
}

impl ChatCompletionEndpoint {
    /// Creates a new `ChatCompletionEndpointBuilder` for constructing endpoints.
    pub fn builder() -> ChatCompletionEndpointBuilder {
        ChatCompletionEndpointBuilder::default()
    }

    /// Creates an endpoint from an explicit configuration
    pub fn from_config(config: &EndpointConfig) -> Self {
        tracing::info!(
            organization = config.organization.as_deref(),
            project_id = config.project_id.as_deref(),
            default_model = %config.default_model,
            "Creating chat completion endpoint"
        );

        Self {
            client: Arc::new(async_openai::Client::with_config(config.to_openai_config())),
            default_model: config.default_model.clone(),
            default_options: config.default_options.clone(),
        }
    }

    /// Creates an endpoint configured from the environment
    ///
    /// # Errors
    ///
    /// Errors with [`CompletionError::Configuration`] if `OPENAI_API_KEY` is missing or empty
    pub fn from_env() -> Result<Self, CompletionError> {
        Ok(Self::from_config(&EndpointConfig::from_env()?))
    }
}

impl<C: async_openai::config::Config + Default + Sync + Send + std::fmt::Debug>
    GenericChatCompletionEndpointBuilder<C>
{
    /// Sets the `OpenAI` client for the endpoint.
    ///
    /// # Parameters
    /// - `client`: The `OpenAI` client to set.
    ///
    /// # Returns
    /// A mutable reference to the `ChatCompletionEndpointBuilder`.
    pub fn client(&mut self, client: async_openai::Client<C>) -> &mut Self {
        self.client = Some(Arc::new(client));
        self
    }
}

impl<C: async_openai::config::Config + Default> GenericChatCompletionEndpoint<C> {
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn default_options(&self) -> &CompletionOptions {
        &self.default_options
    }
}

pub fn openai_error_to_completion_error(e: OpenAIError) -> CompletionError {
    match &e {
        OpenAIError::ApiError(api_error) => {
            tracing::error!("OpenAI API Error: {:?}", api_error);
        }
        OpenAIError::Reqwest(err) => match err.status() {
            Some(status) if status.is_server_error() => {
                tracing::warn!("OpenAI API Server Error: {:?}", err);
            }
            Some(status) => {
                tracing::error!("OpenAI API Error: {:?}, error: {:?}", status, err);
            }
            None => tracing::error!("Unexpected OpenAI Reqwest Error: {:?}", err),
        },
        OpenAIError::JSONDeserialize(err) => {
            tracing::error!("OpenAI response could not be deserialized: {:?}", err);
        }
        OpenAIError::InvalidArgument(msg) => {
            tracing::error!("OpenAI Invalid Argument: {:?}", msg);
        }
        other => tracing::error!("OpenAI Error: {:?}", other),
    }

    CompletionError::client(e)
}
