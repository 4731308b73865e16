use std::sync::Arc;

use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::config::Config;
use crate::services::assistant::AssistantService;
use crate::services::email::EmailService;
use crate::services::telegram::TelegramClient;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub redis: redis::aio::MultiplexedConnection,
    pub redis_client: RedisClient,
    pub config: Arc<Config>,
    pub assistant: Arc<AssistantService>,
    pub telegram: Option<Arc<TelegramClient>>,
    pub email: Option<Arc<EmailService>>,
}
