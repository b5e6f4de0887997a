use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    Json,
};
use provider_client::GenerateContentRequest;
use tracing::{instrument, Span};

use crate::{error::ProxyError, AppState, ChatReply, ChatRequest};

pub const FALLBACK_REPLY: &str = "Sorry, I could not generate a response.";

const MESSAGE_REQUIRED: &str = "Message is required";
const MESSAGE_TOO_LONG: &str = "Message is too long";
const UNDESCRIBED_PROVIDER_ERROR: &str = "Failed to get response from AI";

/// Checks run in order: API key, then message. Method is checked by the route.
#[instrument(skip_all, fields(message_chars))]
pub async fn chat_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ChatReply>, ProxyError> {
    let api_key = state
        .api_key
        .api_key()
        .ok_or(ProxyError::ConfigurationError)?;

    let body = body.map_err(|rejection| {
        tracing::warn!("Could not read request body: {}", rejection);
        ProxyError::InvalidInput(MESSAGE_REQUIRED)
    })?;
    let message = parse_message(&body)?;
    let message_chars = message.chars().count();
    Span::current().record("message_chars", message_chars);
    if let Some(limit) = state.config.max_message_chars {
        if message_chars > limit {
            return Err(ProxyError::InvalidInput(MESSAGE_TOO_LONG));
        }
    }

    tracing::info!("Forwarding message to provider");

    let request = GenerateContentRequest::single_text(
        state.persona.render(&message),
        state.config.generation.clone(),
    );
    let mut response = state.provider.generate_content(&api_key, &request).await?;

    if let Some(error) = response.error.take() {
        let message = error
            .message
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| UNDESCRIBED_PROVIDER_ERROR.to_string());
        tracing::warn!(
            code = ?error.code,
            status = ?error.status,
            "Provider returned an error: {}",
            message
        );
        return Err(ProxyError::ProviderError(message));
    }

    let reply = match response.first_text() {
        Some(text) => text.to_string(),
        None => {
            tracing::warn!(
                finish_reason = ?response.finish_reason(),
                "Provider response had no text, using fallback reply"
            );
            FALLBACK_REPLY.to_string()
        }
    };

    tracing::info!("SUCCESS");
    Ok(Json(ChatReply { reply }))
}

pub async fn method_not_allowed() -> ProxyError {
    ProxyError::MethodNotAllowed
}

fn parse_message(body: &[u8]) -> Result<String, ProxyError> {
    serde_json::from_slice::<ChatRequest>(body)
        .ok()
        .map(|request| request.message)
        .filter(|message| !message.is_empty())
        .ok_or(ProxyError::InvalidInput(MESSAGE_REQUIRED))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_must_be_a_non_empty_string() {
        assert_eq!(parse_message(br#"{"message":"hi"}"#).unwrap(), "hi");
        let bodies: [&[u8]; 6] = [
            b"",
            b"not json",
            b"{}",
            br#"{"message":""}"#,
            br#"{"message":42}"#,
            br#"{"message":null}"#,
        ];
        for body in bodies {
            assert!(matches!(
                parse_message(body),
                Err(ProxyError::InvalidInput(MESSAGE_REQUIRED))
            ));
        }
    }
}
