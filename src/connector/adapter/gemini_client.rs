use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::ModelClient;
use crate::domain::{Credential, DomainError};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-pro";
const API_VERSION_PATH: &str = "/v1beta/models";
const API_KEY_HEADER: &str = "x-goog-api-key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// HTTP client for the Gemini `generateContent` endpoint.
///
/// Each call carries exactly one user message. The endpoint is configurable
/// so the client can target a proxy or a local mock:
///
/// ```text
/// GEMINI_BASE_URL=https://generativelanguage.googleapis.com
/// GEMINI_MODEL=gemini-pro
/// ```
pub struct GeminiClient {
    client: reqwest::Client,
    credential: Credential,
    model: String,
    /// Full endpoint URL (base + model + `:generateContent`).
    url: String,
}

impl GeminiClient {
    pub fn new(credential: Credential, model: impl Into<String>, base_url: impl Into<String>) -> Self {
        let model: String = model.into();
        let base: String = base_url.into();
        let url = endpoint_url(&base, &model);
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            credential,
            model,
            url,
        }
    }

    /// Model name, read from `GEMINI_MODEL` with [`DEFAULT_MODEL`] as fallback.
    pub fn model_from_env() -> String {
        std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string())
    }

    /// Base URL, read from `GEMINI_BASE_URL` with [`DEFAULT_BASE_URL`] as fallback.
    pub fn base_url_from_env() -> String {
        std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn extract_text(response: GenerateContentResponse) -> Result<String, DomainError> {
        if let Some(err) = response.error {
            return Err(DomainError::model(err.message));
        }

        if let Some(reason) = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
        {
            return Err(DomainError::model(format!("prompt was blocked ({reason})")));
        }

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::model("no response from Gemini"))?;

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
            return Err(DomainError::model(format!(
                "Gemini returned no text (finish reason: {reason})"
            )));
        }

        Ok(text)
    }
}

fn endpoint_url(base_url: &str, model: &str) -> String {
    let model = model.strip_prefix("models/").unwrap_or(model);
    format!(
        "{}{API_VERSION_PATH}/{model}:generateContent",
        base_url.trim_end_matches('/')
    )
}

/// Pulls `error.message` out of an error body, falling back to the raw status.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<GenerateContentResponse>(body) {
        Ok(GenerateContentResponse {
            error: Some(err), ..
        }) => format!("Gemini API returned {status}: {}", err.message),
        _ => format!("Gemini API returned {status}"),
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        debug!("GeminiClient: POST {} (model {})", self.url, self.model);

        let response = self
            .client
            .post(&self.url)
            .header(API_KEY_HEADER, self.credential.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::model(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("GeminiClient: API returned {status}: {body}");
            return Err(DomainError::model(error_message(status, &body)));
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| DomainError::model(format!("failed to parse response: {e}")))?;

        Self::extract_text(api_response)
    }
}
