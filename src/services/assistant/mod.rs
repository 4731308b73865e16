//! Chat assistant pipeline: read menu/schedule/FAQ context, resolve
//! date-specific menus against the weekly template, assemble one system
//! prompt, forward to the completion gateway. Shared by the web chat
//! endpoint and the Telegram webhook; the transports only differ in how
//! they deliver the reply.

pub mod completion;
pub mod context;
pub mod prompt;

use chrono::Utc;
use sqlx::PgPool;

use crate::config::Config;
use crate::models::assistant::ChatMessage;

pub use completion::{CompletionClient, CompletionError, FALLBACK_REPLY};
pub use context::MenuContextReader;

/// How far ahead dated menus are loaded into the prompt.
const MENU_WINDOW_DAYS: i64 = 7;

pub struct AssistantService {
    completion: CompletionClient,
}

impl AssistantService {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            completion: CompletionClient::new(config)?,
        })
    }

    /// One stateless request/response cycle. Data-read failures degrade the
    /// prompt (never the request); only completion failures reach the caller,
    /// already classified for user-facing messaging.
    pub async fn answer(
        &self,
        pool: &PgPool,
        history: &[ChatMessage],
    ) -> Result<String, CompletionError> {
        let today = Utc::now().date_naive();
        let ctx = MenuContextReader::fetch(pool, today, MENU_WINDOW_DAYS).await;
        let system_prompt = prompt::build_system_prompt(&ctx);
        self.completion.complete(&system_prompt, history).await
    }
}
