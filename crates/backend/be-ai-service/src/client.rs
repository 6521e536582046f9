//! Gemini `generateContent` client.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::{
    config::GeminiConfig,
    error::{GeminiError, Result},
    types::{ChatMessage, ChatRole, InlineImage},
};

/// Text generation backend used by the assistant routes.
pub trait GenerativeModel: Send + Sync + 'static {
    /// Single-turn generation from a prompt.
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;

    /// Continues a conversation. `history` is sent as-is ahead of `message`.
    fn chat(
        &self,
        history: &[ChatMessage],
        message: &str,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Asks the vision model about an inline image.
    fn describe_image(
        &self,
        instruction: &str,
        image: &InlineImage,
    ) -> impl Future<Output = Result<String>> + Send;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl Content {
    fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts,
        }
    }

    fn from_message(message: &ChatMessage) -> Self {
        // Gemini names the assistant side "model".
        let role = match message.role {
            ChatRole::User => "user",
            ChatRole::Assistant => "model",
        };
        Self {
            role: Some(role.to_string()),
            parts: vec![Part::Text {
                text: message.content.clone(),
            }],
        }
    }
}

/// Talks to the Generative Language REST API. Cheap to share behind `Arc`.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let http = reqwest::ClientBuilder::new()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    #[instrument(skip(self, contents), fields(turns = contents.len()))]
    async fn generate_content(&self, model: &str, contents: Vec<Content>) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, model
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&GenerateContentRequest { contents })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            warn!(status = status.as_u16(), %message, "Gemini request failed");
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response.json().await?;
        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| match part {
                        Part::Text { text } => Some(text),
                        Part::InlineData { .. } => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GeminiError::EmptyResponse {
                block_reason: body.prompt_feedback.and_then(|f| f.block_reason),
            });
        }

        debug!(chars = text.len(), "Gemini response received");
        Ok(text)
    }
}

impl GenerativeModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let contents = vec![Content::user(vec![Part::Text {
            text: prompt.to_string(),
        }])];
        self.generate_content(&self.config.model, contents).await
    }

    async fn chat(&self, history: &[ChatMessage], message: &str) -> Result<String> {
        let mut contents: Vec<Content> = history.iter().map(Content::from_message).collect();
        contents.push(Content::user(vec![Part::Text {
            text: message.to_string(),
        }]));
        self.generate_content(&self.config.model, contents).await
    }

    async fn describe_image(&self, instruction: &str, image: &InlineImage) -> Result<String> {
        let contents = vec![Content::user(vec![
            Part::Text {
                text: instruction.to_string(),
            },
            Part::InlineData {
                inline_data: InlineData {
                    mime_type: image.mime_type.clone(),
                    data: image.data.clone(),
                },
            },
        ])];
        self.generate_content(&self.config.vision_model, contents)
            .await
    }
}
