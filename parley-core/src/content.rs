//! Typed fragments of a message payload
//!
//! A [`Content`] is either text, an image reference, or base64 encoded audio. Enumerated fields
//! are typed, and parsing them from strings fails eagerly with [`MessageError::InvalidArgument`].
use std::{fmt, str::FromStr};

use colored::Colorize as _;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    errors::{MessageError, SubstitutionError},
    substitution::{SubstitutionDict, substitute},
    text::{self, MarkdownOptions},
    util::{parse_variant, preview},
};

const PREVIEW_CHARS: usize = 15;

/// Detail level the model should use for an image
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::AsRefStr,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ImageDetail {
    Low,
    High,
    Auto,
}

impl FromStr for ImageDetail {
    type Err = MessageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(s, "image detail")
    }
}

/// Encoding of base64 audio data
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::AsRefStr,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Wav,
}

impl FromStr for AudioFormat {
    type Err = MessageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(s, "audio format")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    /// Either a URL or a base64 data url
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<ImageDetail>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputAudio {
    /// Base64 encoded audio
    pub data: String,
    pub format: AudioFormat,
}

/// One typed fragment of a message
///
/// Serializes to the chat completion content part it represents, i.e.
/// `{"type": "text", "text": "..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum_macros::EnumIs)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    Text {
        text: String,
    },
    #[serde(rename = "image_url")]
    Image {
        image_url: ImageUrl,
    },
    #[serde(rename = "input_audio")]
    Audio {
        input_audio: InputAudio,
    },
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }

    /// An image without an explicit detail level
    pub fn image(url: impl Into<String>) -> Self {
        Content::Image {
            image_url: ImageUrl {
                url: url.into(),
                detail: None,
            },
        }
    }

    pub fn image_with_detail(url: impl Into<String>, detail: ImageDetail) -> Self {
        Content::Image {
            image_url: ImageUrl {
                url: url.into(),
                detail: Some(detail),
            },
        }
    }

    pub fn audio(data: impl Into<String>, format: AudioFormat) -> Self {
        Content::Audio {
            input_audio: InputAudio {
                data: data.into(),
                format,
            },
        }
    }

    /// Builds an image from an untyped detail level
    ///
    /// # Errors
    ///
    /// Errors if `detail` is not one of `low`, `high` or `auto`
    pub fn try_image(url: impl Into<String>, detail: Option<&str>) -> Result<Self, MessageError> {
        let detail = detail.map(str::parse::<ImageDetail>).transpose()?;

        Ok(Content::Image {
            image_url: ImageUrl {
                url: url.into(),
                detail,
            },
        })
    }

    /// Builds audio from an untyped format
    ///
    /// # Errors
    ///
    /// Errors if `format` is not one of `mp3` or `wav`
    pub fn try_audio(data: impl Into<String>, format: &str) -> Result<Self, MessageError> {
        Ok(Content::audio(data, format.parse::<AudioFormat>()?))
    }

    /// The text, if this is text content
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text { text } => Some(text),
            Content::Image { .. } | Content::Audio { .. } => None,
        }
    }

    /// Returns a copy with placeholders in text interpolated
    ///
    /// Images and audio are returned as is.
    ///
    /// # Errors
    ///
    /// Errors if a placeholder has no value or is malformed
    pub fn substituted(
        &self,
        substitution: Option<&SubstitutionDict>,
    ) -> Result<Content, SubstitutionError> {
        match self {
            Content::Text { text } => Ok(Content::Text {
                text: substitute(text, substitution)?,
            }),
            Content::Image { .. } | Content::Audio { .. } => Ok(self.clone()),
        }
    }

    /// The serialized content part, with placeholders interpolated
    ///
    /// # Errors
    ///
    /// Errors if a placeholder has no value or is malformed
    pub fn to_dict(&self, substitution: Option<&SubstitutionDict>) -> Result<Value, SubstitutionError> {
        let record = match self {
            Content::Text { text } => json!({
                "type": "text",
                "text": substitute(text, substitution)?,
            }),
            Content::Image { image_url } => {
                let mut image = json!({ "url": image_url.url });
                if let Some(detail) = image_url.detail {
                    image["detail"] = detail.as_ref().into();
                }
                json!({ "type": "image_url", "image_url": image })
            }
            Content::Audio { input_audio } => json!({
                "type": "input_audio",
                "input_audio": {
                    "data": input_audio.data,
                    "format": input_audio.format.as_ref(),
                },
            }),
        };

        Ok(record)
    }

    /// Text with markdown formatting removed, if this is text content
    pub fn remove_markdown(&self, options: &MarkdownOptions) -> Option<String> {
        self.as_text()
            .map(|text| text::remove_markdown(text, options))
    }

    /// Text split into the items of a numbered list, if this is text content
    ///
    /// See [`text::split_ordered_list`]
    pub fn split_ordered_list(&self, markdown: Option<&MarkdownOptions>) -> Option<Vec<String>> {
        self.as_text()
            .map(|text| text::split_ordered_list(text, markdown))
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::text(text)
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::text(text)
    }
}

/// A lone content is a one element message
impl From<Content> for Vec<Content> {
    fn from(content: Content) -> Self {
        vec![content]
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Text { text } => write!(f, "{text}"),
            Content::Image { image_url } => {
                let label = match image_url.detail {
                    Some(detail) => format!("Image URL ({detail})"),
                    None => "Image URL".to_string(),
                };
                write!(
                    f,
                    "{}",
                    format!("{label}: {}", preview(&image_url.url, PREVIEW_CHARS)).cyan()
                )
            }
            Content::Audio { input_audio } => write!(
                f,
                "{}",
                format!(
                    "Audio ({}): {}",
                    input_audio.format,
                    preview(&input_audio.data, PREVIEW_CHARS)
                )
                .cyan()
            ),
        }
    }
}
