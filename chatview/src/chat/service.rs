use async_trait::async_trait;

use crate::models::{Message, OutgoingMessage};

pub trait SessionContext: Send + Sync {
    fn current_user_id(&self) -> String;
}

/// Message history and sending for a single conversation.
#[async_trait]
pub trait ConversationService: Send + Sync {
    /// Loads up to `limit` messages older than `before`, oldest first.
    async fn load_history(
        &self,
        before: Option<&Message>,
        limit: usize,
    ) -> Result<Vec<Message>, anyhow::Error>;

    async fn send_message(&self, message: OutgoingMessage) -> Result<Message, anyhow::Error>;
}
