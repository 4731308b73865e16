use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::{
    middleware::rate_limit::check_rate_limit,
    models::assistant::{ChatRequest, ChatResponse, TelegramUpdate},
    services::assistant::CompletionError,
    state::AppState,
};

/// Sent on Telegram when the pipeline fails for any reason. The webhook
/// itself still answers 200 so Telegram does not retry the update.
const OFFLINE_MESSAGE: &str = "🔧 Campus Buddy is offline right now. Please try again later!";

fn start_greeting(first_name: &str) -> String {
    format!(
        "👋 Hello {first_name}! I'm Campus Buddy, your school meal assistant 🎓\n\n\
         I can help you with:\n\
         • Today's menu and meal times\n\
         • Upcoming menus for the week\n\
         • School information & FAQs\n\n\
         Just ask me anything!"
    )
}

/// POST /assistant/chat — the web chat widget. Stateless: the client resends
/// the whole conversation each turn.
pub async fn chat(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<Value>)> {
    let mut redis = state.redis.clone();
    check_rate_limit(&mut redis, &format!("chat:{}", addr.ip()), 20, 60).await?;

    match state.assistant.answer(&state.db, &body.messages).await {
        Ok(message) => Ok(Json(ChatResponse { message })),
        Err(e) => {
            error!("Chat completion failed: {e}");
            let status = match e {
                CompletionError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                CompletionError::QuotaExhausted => StatusCode::PAYMENT_REQUIRED,
                CompletionError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                CompletionError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((status, Json(json!({ "error": e.user_message() }))))
        }
    }
}

/// POST /assistant/telegram — webhook target. Always answers 200 "OK":
/// Telegram re-delivers updates on any other status, which would replay
/// failed messages at the bot forever.
pub async fn telegram_webhook(
    State(state): State<AppState>,
    Json(update): Json<TelegramUpdate>,
) -> (StatusCode, &'static str) {
    let Some(telegram) = state.telegram.clone() else {
        error!("Telegram webhook hit but TELEGRAM_BOT_TOKEN is not configured");
        return (StatusCode::OK, "OK");
    };

    // Edited messages, stickers, joins etc. carry no text to answer.
    let Some(message) = update.message else {
        return (StatusCode::OK, "OK");
    };
    let Some(text) = message.text else {
        return (StatusCode::OK, "OK");
    };

    let chat_id = message.chat.id;
    let first_name = message
        .from
        .and_then(|u| u.first_name)
        .unwrap_or_else(|| "Student".to_string());
    info!("Telegram message from {first_name} ({chat_id})");

    if text == "/start" {
        if let Err(e) = telegram.send_message(chat_id, &start_greeting(&first_name)).await {
            error!("Failed to send greeting to {chat_id}: {e}");
        }
        return (StatusCode::OK, "OK");
    }

    let history = [crate::models::assistant::ChatMessage {
        role: "user".to_string(),
        content: text,
    }];

    let reply = match state.assistant.answer(&state.db, &history).await {
        Ok(message) => message,
        Err(e) => {
            error!("Telegram completion failed: {e}");
            OFFLINE_MESSAGE.to_string()
        }
    };

    if let Err(e) = telegram.send_message(chat_id, &reply).await {
        error!("Failed to send reply to {chat_id}: {e}");
    }

    (StatusCode::OK, "OK")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_addresses_the_sender() {
        let greeting = start_greeting("Chaltu");
        assert!(greeting.starts_with("👋 Hello Chaltu!"));
        assert!(greeting.contains("meal times"));
    }

    #[test]
    fn non_text_update_deserializes_without_text() {
        let update: TelegramUpdate =
            serde_json::from_str(r#"{"message": {"chat": {"id": 7}, "sticker": {}}}"#).unwrap();
        assert!(update.message.unwrap().text.is_none());
    }

    #[test]
    fn update_without_message_is_accepted() {
        let update: TelegramUpdate =
            serde_json::from_str(r#"{"update_id": 123, "edited_message": {}}"#).unwrap();
        assert!(update.message.is_none());
    }
}
