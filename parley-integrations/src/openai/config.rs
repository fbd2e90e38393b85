//! Endpoint configuration
//!
//! Everything an endpoint needs is held by an explicit [`EndpointConfig`]. It is either built by
//! hand or read from the environment:
//!
//! | Variable               | Purpose                                        |
//! |------------------------|------------------------------------------------|
//! | `OPENAI_API_KEY`       | Required api key                               |
//! | `OPENAI_ORG_ID`        | Organization to bill                           |
//! | `OPENAI_PROJECT_ID`    | Project to bill                                |
//! | `OPENAI_BASE_URL`      | Api base, for OpenAI compatible providers      |
//! | `PARLEY_DEFAULT_MODEL` | Model used when a request does not name one    |
use async_openai::config::OpenAIConfig;
use derive_builder::Builder;
use parley_core::chat_completion::{CompletionOptions, errors::CompletionError};
use secrecy::{ExposeSecret as _, SecretString};

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const ORG_ID_VAR: &str = "OPENAI_ORG_ID";
pub const PROJECT_ID_VAR: &str = "OPENAI_PROJECT_ID";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const DEFAULT_MODEL_VAR: &str = "PARLEY_DEFAULT_MODEL";

/// Model used by [`EndpointConfig::from_env`] if `PARLEY_DEFAULT_MODEL` is not set
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration of a chat completion endpoint
///
/// The api key is kept as a secret and never shows up in debug output.
///
/// # Example
///
/// ```
/// # use parley_integrations::openai::EndpointConfig;
/// let config = EndpointConfig::builder()
///     .default_model("gpt-4o")
///     .api_key("sk-...")
///     .organization("org-123")
///     .build()
///     .unwrap();
///
/// assert!(!format!("{config:?}").contains("sk-..."));
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(setter(into, strip_option))]
pub struct EndpointConfig {
    /// Model used when a request does not name one
    pub default_model: String,

    /// Falls back to the client default, which reads `OPENAI_API_KEY`
    #[builder(default)]
    pub api_key: Option<SecretString>,

    #[builder(default)]
    pub organization: Option<String>,

    #[builder(default)]
    pub project_id: Option<String>,

    /// Api base for OpenAI compatible providers
    #[builder(default)]
    pub api_base: Option<String>,

    /// Options sent with every request, unless the request overrides them
    #[builder(default)]
    pub default_options: CompletionOptions,
}

impl EndpointConfig {
    pub fn builder() -> EndpointConfigBuilder {
        EndpointConfigBuilder::default()
    }

    /// Reads the configuration from the environment
    ///
    /// # Errors
    ///
    /// Errors with [`CompletionError::Configuration`] if `OPENAI_API_KEY` is missing or empty
    pub fn from_env() -> Result<Self, CompletionError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration with `lookup` standing in for the environment
    ///
    /// Empty optional values are treated as unset.
    ///
    /// # Errors
    ///
    /// Errors with [`CompletionError::Configuration`] if there is no api key, or it is empty
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CompletionError> {
        let api_key = api_key_from(lookup(API_KEY_VAR))?;
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            default_model: optional(DEFAULT_MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key: Some(api_key),
            organization: optional(ORG_ID_VAR),
            project_id: optional(PROJECT_ID_VAR),
            api_base: optional(BASE_URL_VAR),
            default_options: CompletionOptions::default(),
        })
    }

    /// The client configuration for `async_openai`
    pub fn to_openai_config(&self) -> OpenAIConfig {
        let mut config = OpenAIConfig::default();

        if let Some(api_key) = &self.api_key {
            config = config.with_api_key(api_key.expose_secret());
        }
        if let Some(organization) = &self.organization {
            config = config.with_org_id(organization);
        }
        if let Some(project_id) = &self.project_id {
            config = config.with_project_id(project_id);
        }
        if let Some(api_base) = &self.api_base {
            config = config.with_api_base(api_base);
        }

        config
    }
}

/// Verifies that `OPENAI_API_KEY` is set and not empty
///
/// # Errors
///
/// Errors with [`CompletionError::Configuration`] otherwise
pub fn ensure_api_key() -> Result<(), CompletionError> {
    ensure_api_key_with(|key| std::env::var(key).ok())
}

/// Verifies the api key with `lookup` standing in for the environment
///
/// # Errors
///
/// Errors with [`CompletionError::Configuration`] if there is no api key, or it is empty
pub fn ensure_api_key_with(lookup: impl Fn(&str) -> Option<String>) -> Result<(), CompletionError> {
    api_key_from(lookup(API_KEY_VAR)).map(|_| ())
}

fn api_key_from(value: Option<String>) -> Result<SecretString, CompletionError> {
    match value {
        None => Err(CompletionError::Configuration(format!(
            "Please set the {API_KEY_VAR} environment variable"
        ))),
        Some(value) if value.trim().is_empty() => Err(CompletionError::Configuration(format!(
            "The {API_KEY_VAR} environment variable is empty"
        ))),
        Some(value) => Ok(value.into()),
    }
}
