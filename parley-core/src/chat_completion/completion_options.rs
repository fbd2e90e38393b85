use derive_builder::Builder;
use serde::Serialize;
use serde_json::{Map, Value};

/// Options passed through to the provider with every request
///
/// Unset options are left out of the request, so the provider defaults apply. Anything not
/// covered by a field can be passed with [`CompletionOptionsBuilder::option`].
///
/// `stream` is not supported; endpoints drop it from the request.
#[derive(Clone, Debug, Default, PartialEq, Builder, Serialize)]
#[builder(setter(into, strip_option), default)]
pub struct CompletionOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    /// Number of choices to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Whether the provider may store the completion. Off unless asked for.
    pub store: bool,

    #[builder(setter(custom))]
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CompletionOptions {
    pub fn builder() -> CompletionOptionsBuilder {
        CompletionOptionsBuilder::default()
    }

    /// Fills every option unset in `self` from `defaults`
    ///
    /// `store` is enabled if either enables it.
    #[must_use]
    pub fn merged_with(&self, defaults: &CompletionOptions) -> CompletionOptions {
        let mut extra = defaults.extra.clone();
        extra.extend(self.extra.clone());

        CompletionOptions {
            temperature: self.temperature.or(defaults.temperature),
            top_p: self.top_p.or(defaults.top_p),
            n: self.n.or(defaults.n),
            max_tokens: self.max_tokens.or(defaults.max_tokens),
            presence_penalty: self.presence_penalty.or(defaults.presence_penalty),
            frequency_penalty: self.frequency_penalty.or(defaults.frequency_penalty),
            seed: self.seed.or(defaults.seed),
            stop: self.stop.clone().or_else(|| defaults.stop.clone()),
            user: self.user.clone().or_else(|| defaults.user.clone()),
            store: self.store || defaults.store,
            extra,
        }
    }
}

impl CompletionOptionsBuilder {
    /// Passes any other option through to the provider as is
    pub fn option(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.extra
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_serializes_only_set_options() {
        let options = CompletionOptions::builder()
            .temperature(0.0_f32)
            .n(2_u8)
            .option("logprobs", true)
            .build()
            .unwrap();

        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({"temperature": 0.0, "n": 2, "store": false, "logprobs": true})
        );
    }

    #[test]
    fn test_merge_prefers_request_options() {
        let defaults = CompletionOptions::builder()
            .temperature(1.0_f32)
            .max_tokens(100_u32)
            .option("logprobs", false)
            .build()
            .unwrap();
        let options = CompletionOptions::builder()
            .temperature(0.2_f32)
            .store(true)
            .option("logprobs", true)
            .build()
            .unwrap();

        let merged = options.merged_with(&defaults);

        assert_eq!(merged.temperature, Some(0.2));
        assert_eq!(merged.max_tokens, Some(100));
        assert!(merged.store);
        assert_eq!(merged.extra["logprobs"], json!(true));
    }
}
