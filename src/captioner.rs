//! Client for the chat-completion endpoint that turns an image into a caption.

use anyhow::{anyhow, Context};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::CaptionConfig;
use crate::encode::image_data_uri;
use crate::error::Result;

/// Written to the CSV in place of a caption when the service call fails.
pub const CAPTION_FAILED: &str = "Failed to get caption";

pub const CAPTION_PROMPT: &str = "Directly describe with brevity and as brief as possible \
the scene or characters without any introductory phrase like 'This image shows', \
'In the scene', 'This image depicts' or similar phrases. Just start describing the scene please. \
Do not end the caption with a '.'. Some characters may be animated, refer to them as regular \
humans and not animated humans. Please make no reference to any particular style or characters \
from any TV show or Movie. Good examples: a cat on a windowsill, a photo of smiling cactus in an \
office, a man and baby sitting by a window, a photo of wheel on a car,";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionOutcome {
    Captioned(String),
    /// The reason is for logs only; the CSV gets [`CAPTION_FAILED`].
    Failed(String),
}

impl CaptionOutcome {
    pub fn is_captioned(&self) -> bool {
        matches!(self, Self::Captioned(_))
    }

    pub fn to_csv_field(&self) -> &str {
        match self {
            Self::Captioned(caption) => caption,
            Self::Failed(_) => CAPTION_FAILED,
        }
    }
}

/// Anything that can caption a base64 encoded image. Implementations never
/// fail past their own boundary: every error becomes [`CaptionOutcome::Failed`].
pub trait CaptionService {
    fn caption(&self, image_b64: &str) -> CaptionOutcome;
}

/// Drops every comma and double quote, then trims, so the caption never needs
/// quoting in the CSV.
pub fn sanitize_caption(raw: &str) -> String {
    let kept: String = raw.chars().filter(|c| *c != ',' && *c != '"').collect();
    kept.trim().to_string()
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatRequestMessage<'a>>,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub struct ChatRequestMessage<'a> {
    pub role: &'static str,
    pub content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub content: Option<ChatContent>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ChatContent {
    Text(String),
    Parts(Vec<ChatContentPart>),
}

#[derive(Debug, Deserialize)]
pub struct ChatContentPart {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if the service produced any.
    pub fn caption_text(self) -> Option<String> {
        let message = self.choices.into_iter().next()?.message?;
        match message.content? {
            ChatContent::Text(text) => Some(text),
            ChatContent::Parts(parts) => {
                let texts: Vec<String> = parts
                    .into_iter()
                    .filter(|part| matches!(part.kind.as_str(), "text" | "output_text"))
                    .filter_map(|part| part.text)
                    .collect();
                if texts.is_empty() {
                    None
                } else {
                    Some(texts.join(""))
                }
            }
        }
    }
}

pub struct OpenAiCaptioner {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiCaptioner {
    pub fn new(config: &CaptionConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    pub fn build_request<'a>(&'a self, image_b64: &str) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatRequestMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: CAPTION_PROMPT,
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image_data_uri(image_b64),
                        },
                    },
                ],
            }],
            max_tokens: self.max_tokens,
        }
    }

    fn request_caption(&self, image_b64: &str) -> anyhow::Result<String> {
        let body = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.build_request(image_b64))
            .send()
            .context("caption request failed")?
            .error_for_status()
            .context("captioning service returned non-success status")?
            .text()
            .context("failed to read caption response body")?;

        let response: ChatCompletionResponse =
            serde_json::from_str(&body).context("failed to decode caption response JSON")?;
        let text = response
            .caption_text()
            .ok_or_else(|| anyhow!("response has no caption content"))?;

        Ok(sanitize_caption(&text))
    }
}

impl CaptionService for OpenAiCaptioner {
    fn caption(&self, image_b64: &str) -> CaptionOutcome {
        match self.request_caption(image_b64) {
            Ok(caption) => {
                debug!("Service returned caption {:?}", caption);
                CaptionOutcome::Captioned(caption)
            }
            Err(err) => {
                warn!("API request failed: {:#}", err);
                CaptionOutcome::Failed(format!("{err:#}"))
            }
        }
    }
}
