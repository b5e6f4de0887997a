pub mod config;
pub mod error;
pub mod handler;
pub mod persona;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::post, Router};
use provider_client::Provider;

use config::{ApiKeySource, ProxyConfig};
use persona::PromptTemplate;

pub const CHAT_ROUTE: &str = "/api/chat";

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn Provider>,
    pub api_key: Arc<dyn ApiKeySource>,
    pub persona: Arc<PromptTemplate>,
    pub config: Arc<ProxyConfig>,
}

impl AppState {
    pub fn new(
        provider: impl Provider + 'static,
        api_key: impl ApiKeySource + 'static,
        persona: PromptTemplate,
        config: ProxyConfig,
    ) -> Self {
        Self {
            provider: Arc::new(provider),
            api_key: Arc::new(api_key),
            persona: Arc::new(persona),
            config: Arc::new(config),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            CHAT_ROUTE,
            post(handler::chat_handler).fallback(handler::method_not_allowed),
        )
        // Message size is bounded by `ProxyConfig::max_message_chars`, not by the body extractor.
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}
