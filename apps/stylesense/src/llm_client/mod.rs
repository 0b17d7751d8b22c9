/// LLM Client — the single point of entry for all Gemini calls in StyleSense.
///
/// ARCHITECTURAL RULE: No other module may call the generative endpoint
/// directly. Orchestration code talks to `ModelEndpoint`, which lets tests
/// substitute a scripted endpoint for `GeminiClient`.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod image;
pub mod prompts;
pub mod repair;
pub mod retry;
#[cfg(test)]
pub mod testing;

use self::image::InlineImage;
use self::repair::RepairError;

const API_KEY_HEADER: &str = "x-goog-api-key";

// ────────────────────────────────────────────────────────────────────────────
// Errors and classification
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}{}): {message}", fmt_code(.code))]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error(transparent)]
    Repair(#[from] RepairError),
}

fn fmt_code(code: &Option<String>) -> String {
    code.as_deref().map(|c| format!(", {c}")).unwrap_or_default()
}

/// Failure categories surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    QuotaExceeded,
    ServerOverloaded,
    InvalidCredential,
    MalformedResponse,
    Other,
}

/// What the user can do about a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    Reauthenticate,
    RetryManually,
    None,
}

impl ErrorKind {
    /// Only transient capacity errors are worth switching models for.
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::QuotaExceeded | ErrorKind::ServerOverloaded)
    }

    pub fn recovery(self) -> RecoveryAction {
        match self {
            ErrorKind::QuotaExceeded | ErrorKind::InvalidCredential => {
                RecoveryAction::Reauthenticate
            }
            ErrorKind::ServerOverloaded | ErrorKind::MalformedResponse => {
                RecoveryAction::RetryManually
            }
            ErrorKind::Other => RecoveryAction::None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::QuotaExceeded => "QUOTA_EXCEEDED",
            ErrorKind::ServerOverloaded => "SERVER_OVERLOADED",
            ErrorKind::InvalidCredential => "INVALID_KEY",
            ErrorKind::MalformedResponse => "MALFORMED_RESPONSE",
            ErrorKind::Other => "REQUEST_FAILED",
        }
    }
}

impl LlmError {
    /// Classifies the error, preferring the structured status and code
    /// returned by the endpoint. Message markers are only the last resort,
    /// since upstream wording is not a stable contract.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LlmError::Repair(_) | LlmError::EmptyContent => ErrorKind::MalformedResponse,
            LlmError::Api {
                status,
                code,
                message,
            } => classify_structured(*status, code.as_deref(), message)
                .unwrap_or_else(|| classify_message(&self.to_string())),
            LlmError::Http(e) => match e.status() {
                Some(status) => classify_structured(status.as_u16(), None, "")
                    .unwrap_or_else(|| classify_message(&e.to_string())),
                None => classify_message(&e.to_string()),
            },
        }
    }
}

fn classify_structured(status: u16, code: Option<&str>, message: &str) -> Option<ErrorKind> {
    match (status, code) {
        (429, _) | (_, Some("RESOURCE_EXHAUSTED")) => Some(ErrorKind::QuotaExceeded),
        (503, _) | (_, Some("UNAVAILABLE")) => Some(ErrorKind::ServerOverloaded),
        (401 | 403, _) | (_, Some("UNAUTHENTICATED" | "PERMISSION_DENIED")) => {
            Some(ErrorKind::InvalidCredential)
        }
        (400, _) if message.contains("API key") => Some(ErrorKind::InvalidCredential),
        _ => None,
    }
}

/// Substring matching on the rendered error text.
pub fn classify_message(message: &str) -> ErrorKind {
    if message.contains("429") || message.contains("quota") {
        ErrorKind::QuotaExceeded
    } else if message.contains("503")
        || message.contains("overloaded")
        || message.contains("UNAVAILABLE")
    {
        ErrorKind::ServerOverloaded
    } else if message.contains("API key not valid") || message.contains("400") {
        ErrorKind::InvalidCredential
    } else {
        ErrorKind::Other
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Request / response wire types
// ────────────────────────────────────────────────────────────────────────────

/// One content part: text or an inline image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    #[serde(rename_all = "camelCase")]
    InlineData { inline_data: InlineImage },
    Text { text: String },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn image(image: InlineImage) -> Self {
        Part::InlineData { inline_data: image }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: "user".to_string(),
            parts,
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: "model".to_string(),
            parts: vec![Part::text(text)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInstruction {
    pub parts: Vec<Part>,
}

/// Body of a `generateContent` call. The model is chosen per attempt and
/// travels in the URL, so the same request can be replayed against fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<SystemInstruction>,
    pub contents: Vec<Content>,
}

impl GenerateRequest {
    /// A single-turn request made of the given parts.
    pub fn single_turn(parts: Vec<Part>) -> Self {
        Self {
            system_instruction: None,
            contents: vec![Content::user(parts)],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.is_empty()).then_some(text)
    }
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    #[serde(default)]
    message: String,
    status: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Endpoint seam
// ────────────────────────────────────────────────────────────────────────────

/// A generative model endpoint that returns the raw text of one response.
#[async_trait]
pub trait ModelEndpoint: Send + Sync {
    async fn generate(&self, model: &str, request: &GenerateRequest) -> Result<String, LlmError>;
}

/// Gemini `generateContent` over HTTPS.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_base: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_base: &str, api_key: String, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_base: api_base.trim().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn endpoint_for_model(&self, model: &str) -> String {
        let trimmed = model.trim();
        let model_path = if trimmed.starts_with("models/") {
            trimmed.to_string()
        } else {
            format!("models/{trimmed}")
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }
}

#[async_trait]
impl ModelEndpoint for GeminiClient {
    async fn generate(&self, model: &str, request: &GenerateRequest) -> Result<String, LlmError> {
        let response = self
            .client
            .post(self.endpoint_for_model(model))
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 || status.is_server_error() {
                warn!("Gemini returned {} for model {}: {}", status, model, body);
            }
            return Err(api_error(status.as_u16(), body));
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = parsed.text().ok_or(LlmError::EmptyContent)?;

        debug!("Gemini call succeeded: model={}, chars={}", model, text.len());
        Ok(text)
    }
}

/// Builds a structured API error, keeping the raw body when it is not the
/// usual `{ "error": { ... } }` envelope.
fn api_error(status: u16, body: String) -> LlmError {
    match serde_json::from_str::<GeminiErrorEnvelope>(&body) {
        Ok(envelope) => LlmError::Api {
            status,
            code: envelope.error.status,
            message: envelope.error.message,
        },
        Err(_) => LlmError::Api {
            status,
            code: None,
            message: body,
        },
    }
}
