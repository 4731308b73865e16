use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

use crate::config::Config;
use crate::models::assistant::ChatMessage;

/// Returned when the gateway answers 200 but the payload shape is unexpected.
pub const FALLBACK_REPLY: &str = "I'm sorry, I couldn't process that request.";

/// Upstream completion failures, classified by what the caller should tell
/// the end user. No retries happen at this layer — every failure surfaces
/// immediately as a conversational message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompletionError {
    #[error("completion endpoint rate limited")]
    RateLimited,
    #[error("completion endpoint out of quota")]
    QuotaExhausted,
    #[error("completion request timed out")]
    Timeout,
    #[error("completion endpoint failure: {0}")]
    Upstream(String),
}

impl CompletionError {
    pub fn user_message(&self) -> &'static str {
        match self {
            CompletionError::RateLimited => "Too many requests. Please try again in a moment.",
            CompletionError::QuotaExhausted => {
                "Service temporarily unavailable. Please try again later."
            }
            CompletionError::Timeout => {
                "The assistant took too long to respond. Please try again."
            }
            CompletionError::Upstream(_) => "Failed to get AI response",
        }
    }
}

/// Thin client for the chat-completions gateway. One outbound call per
/// request, bounded token budget, fixed temperature.
pub struct CompletionClient {
    client: Client,
    url: String,
    api_key: String,
    model: String,
}

impl CompletionClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.ai_timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            url: config.ai_gateway_url.clone(),
            api_key: config.ai_api_key.clone(),
            model: config.ai_model.clone(),
        })
    }

    pub async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
    ) -> Result<String, CompletionError> {
        let mut messages = vec![json!({ "role": "system", "content": system_prompt })];
        messages.extend(
            history
                .iter()
                .map(|m| json!({ "role": m.role, "content": m.content })),
        );

        let body = json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": 500,
            "temperature": 0.7,
        });

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout
                } else {
                    CompletionError::Upstream(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("AI gateway error {status}: {text}");
            return Err(classify_status(status.as_u16()));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| CompletionError::Upstream(e.to_string()))?;

        Ok(extract_content(&data).unwrap_or_else(|| FALLBACK_REPLY.to_string()))
    }
}

fn classify_status(status: u16) -> CompletionError {
    match status {
        429 => CompletionError::RateLimited,
        402 => CompletionError::QuotaExhausted,
        other => CompletionError::Upstream(format!("HTTP {other}")),
    }
}

/// Pull `choices[0].message.content` out of the gateway payload.
fn extract_content(data: &Value) -> Option<String> {
    data.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_429_maps_to_rate_limited() {
        let err = classify_status(429);
        assert_eq!(err, CompletionError::RateLimited);
        assert_eq!(
            err.user_message(),
            "Too many requests. Please try again in a moment."
        );
    }

    #[test]
    fn status_402_maps_to_quota_exhausted() {
        let err = classify_status(402);
        assert_eq!(err, CompletionError::QuotaExhausted);
        assert!(err.user_message().contains("temporarily unavailable"));
    }

    #[test]
    fn other_statuses_map_to_generic_upstream() {
        assert!(matches!(classify_status(500), CompletionError::Upstream(_)));
        assert_eq!(classify_status(503).user_message(), "Failed to get AI response");
    }

    #[test]
    fn well_formed_payload_yields_content() {
        let data = serde_json::json!({
            "choices": [{ "message": { "content": "Lunch is injera." } }]
        });
        assert_eq!(extract_content(&data).as_deref(), Some("Lunch is injera."));
    }

    #[test]
    fn empty_choices_falls_back_to_apology() {
        let data = serde_json::json!({ "choices": [] });
        let reply = extract_content(&data).unwrap_or_else(|| FALLBACK_REPLY.to_string());
        assert_eq!(reply, FALLBACK_REPLY);
    }

    #[test]
    fn missing_content_falls_back_to_apology() {
        let data = serde_json::json!({ "choices": [{ "message": {} }] });
        assert!(extract_content(&data).is_none());
    }
}
