use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;
use tracing::{instrument, Span};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to provider failed: {0}")]
    Transport(reqwest::Error),
    #[error("could not decode provider response: {0}")]
    Decode(#[from] serde_json::Error),
}

// The request URL carries the API key as a query parameter, so it is dropped from the error.
impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e.without_url())
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 1024,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct Part {
    pub text: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// A request whose only content is a single text part.
    pub fn single_text(text: String, generation_config: GenerationConfig) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text }],
            }],
            generation_config,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ReplyPart {
    pub text: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ReplyContent {
    pub parts: Option<Vec<ReplyPart>>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<ReplyContent>,
    pub finish_reason: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ProviderErrorBody {
    pub code: Option<i64>,
    pub message: Option<String>,
    pub status: Option<String>,
}

/// Either a list of candidates or a structured error, as returned by `generateContent`.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct GenerateContentResponse {
    pub candidates: Option<Vec<Candidate>>,
    pub error: Option<ProviderErrorBody>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, if every level is present and non-empty.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .as_deref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_deref()?
            .first()?
            .text
            .as_deref()
            .filter(|text| !text.is_empty())
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates
            .as_deref()?
            .first()?
            .finish_reason
            .as_deref()
    }
}

#[async_trait]
pub trait Provider: Send + Sync {
    async fn generate_content(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ClientError>;
}

#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoint: String,
}

impl Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl Client {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!(
                "{}/models/{}:generateContent",
                base_url.trim_end_matches('/'),
                model
            ),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Provider for Client {
    // The provider's status code is not inspected: error responses carry a JSON `error` body.
    #[instrument(skip_all, fields(endpoint = %self.endpoint, status))]
    async fn generate_content(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ClientError> {
        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .json(request)
            .send()
            .await?;
        Span::current().record("status", response.status().as_u16());

        let body = response.bytes().await?;
        let reply = serde_json::from_slice(&body)?;
        Ok(reply)
    }
}
