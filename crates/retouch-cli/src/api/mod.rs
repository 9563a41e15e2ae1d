//! API client for the Gemini image editing service

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use retouch_core::{EditBackend, EditRequest, ImageArtifact, RetouchError, ServiceConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Media type assumed when the service omits one
const DEFAULT_RESPONSE_MIME: &str = "image/png";

/// How much of a non-JSON error body ends up in the diagnostic
const ERROR_BODY_PREVIEW_CHARS: usize = 200;

pub struct GeminiClient {
    http: ReqwestClient,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self) -> String {
        let model = self.model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        };
        format!("{}/{}:generateContent", self.base_url, model_path)
    }
}

#[async_trait]
impl EditBackend for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn edit_image(&self, request: &EditRequest) -> retouch_core::Result<ImageArtifact> {
        let url = self.endpoint();
        debug!(model = %self.model, url = %url, "Sending generateContent request");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateContentRequest::for_edit(request))
            .send()
            .await
            .map_err(|e| RetouchError::Remote(format!("Failed to send edit request: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RetouchError::Remote(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Gemini returned an error status");
            return Err(RetouchError::Remote(format!(
                "{}: {}",
                status,
                error_message(&body)
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| RetouchError::Remote(format!("Failed to parse response: {}", e)))?;

        extract_image(&parsed)
    }
}

/// Pull the human-readable message out of a Gemini error body, falling
/// back to the start of the raw body (proxies answer with HTML)
fn error_message(body: &str) -> String {
    let error: serde_json::Value = serde_json::from_str(body).unwrap_or_default();
    if let Some(message) = error["error"]["message"].as_str() {
        return message.to_string();
    }

    let raw = body.trim();
    if raw.is_empty() {
        return "empty response body".to_string();
    }
    match raw.char_indices().nth(ERROR_BODY_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &raw[..cut]),
        None => raw.to_string(),
    }
}

/// First inline image part wins; the rest of the response only feeds the
/// diagnostic when there is none.
fn extract_image(response: &GenerateContentResponse) -> retouch_core::Result<ImageArtifact> {
    let image = response
        .candidates
        .iter()
        .filter_map(|candidate| candidate.content.as_ref())
        .flat_map(|content| content.parts.iter())
        .filter_map(|part| part.inline_data.as_ref())
        .find(|inline| !inline.data.is_empty());

    if let Some(inline) = image {
        let mime = inline
            .mime_type
            .as_deref()
            .filter(|mime| !mime.is_empty())
            .unwrap_or(DEFAULT_RESPONSE_MIME);
        return Ok(ImageArtifact::from_base64(mime, &inline.data));
    }

    Err(RetouchError::NoImage(describe_missing_image(response)))
}

fn describe_missing_image(response: &GenerateContentResponse) -> String {
    let mut details = Vec::new();

    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_deref())
    {
        details.push(format!("prompt blocked ({})", reason));
    }

    for candidate in &response.candidates {
        if let Some(reason) = candidate.finish_reason.as_deref() {
            details.push(format!("finish reason {}", reason));
        }
        let text: Vec<&str> = candidate
            .content
            .iter()
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.text.as_deref())
            .collect();
        if !text.is_empty() {
            details.push(format!("model said: {}", text.join(" ")));
        }
    }

    if details.is_empty() {
        "response contained no candidates".to_string()
    } else {
        details.join("; ")
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

impl<'a> GenerateContentRequest<'a> {
    fn for_edit(request: &'a EditRequest) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    RequestPart::Inline {
                        inline_data: InlineDataRef {
                            data: &request.image_data,
                            mime_type: &request.media_type,
                        },
                    },
                    RequestPart::Text {
                        text: &request.prompt,
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE", "TEXT"],
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataRef<'a>,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataRef<'a> {
    data: &'a str,
    mime_type: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ResponsePart {
    text: Option<String>,
    #[serde(alias = "inline_data")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct InlineData {
    data: String,
    #[serde(alias = "mime_type")]
    mime_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PromptFeedback {
    block_reason: Option<String>,
}
