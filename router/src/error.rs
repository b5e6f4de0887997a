use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use provider_client::ClientError;
use thiserror::Error;

use crate::ErrorBody;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("API key not configured")]
    ConfigurationError,
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("{0}")]
    ProviderError(String),
    #[error("Failed to get response from AI")]
    UpstreamFailure(#[source] ClientError),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ProxyError::ConfigurationError
            | ProxyError::ProviderError(_)
            | ProxyError::UpstreamFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ClientError> for ProxyError {
    fn from(e: ClientError) -> Self {
        tracing::error!("Provider call failed: {:?}", e);
        ProxyError::UpstreamFailure(e)
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (self.status(), body).into_response()
    }
}
