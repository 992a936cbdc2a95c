use crate::buttons::ButtonMenu;
use crate::error::Result;
use async_trait::async_trait;

/// Where a user request came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageContext {
    pub chat_id: i64,
    pub message_id: i64,
}

/// A message the bot has sent and may edit later
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: i64,
    pub message_id: i64,
}

/// Messenger: the chat transport the bot talks through
#[async_trait]
pub trait Messenger: Sync + Send {
    /// Reply to the message in `ctx`
    async fn send_message(&self, ctx: &MessageContext, text: &str) -> Result<SentMessage>;

    /// Replace the text of a sent message, optionally attaching inline buttons
    async fn edit_message_text(
        &self,
        sent: &SentMessage,
        text: &str,
        markup: Option<&ButtonMenu>,
    ) -> Result<()>;
}
