//! Conversation storage and analytics interfaces

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::answer::AnswerResult;
use crate::conversation::{ConversationContext, NewMessage};
use crate::error::StoreError;
use crate::modes::AnswerMode;

/// Conversation persistence
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Register a new conversation
    async fn create_conversation(
        &self,
        conversation_id: &str,
        tenant_id: &str,
        user_id: Option<&str>,
    ) -> Result<(), StoreError>;

    /// Snapshot of the last `limit` messages, oldest first
    async fn recent_messages(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<ConversationContext, StoreError>;

    async fn append_message(&self, message: NewMessage) -> Result<(), StoreError>;
}

/// Analytics record for one completed answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerEvent {
    pub tenant_id: String,
    pub user_id: Option<String>,
    pub mode: AnswerMode,
    pub question: String,
    pub result: AnswerResult,
    pub recorded_at: DateTime<Utc>,
}

/// Fire-and-forget analytics destination
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: AnswerEvent) -> Result<(), StoreError>;
}
