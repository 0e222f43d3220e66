use async_trait::async_trait;

use crate::application::errors::BotError;

/// Bot trait - abstraction for messaging platform adapters. The router only
/// produces reply text; delivery goes through this trait.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Start the bot and prepare for message delivery.
    async fn start(&self) -> Result<(), BotError>;

    /// Send a text reply to a conversation.
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}
