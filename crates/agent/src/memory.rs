//! In-process collaborators
//!
//! - `InMemoryConversationStore` - HashMap-backed store for tests, the CLI and
//!   single-node deployments
//! - `TracingEventSink` - writes answer events to the log

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use answer_engine_core::{
    AnswerEvent, ConversationContext, ConversationStore, ConversationTurn, EventSink, NewMessage,
    StoreError,
};

/// Stored conversation
#[derive(Debug, Clone)]
pub struct ConversationRecord {
    pub tenant_id: String,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<NewMessage>,
}

#[derive(Default)]
pub struct InMemoryConversationStore {
    conversations: RwLock<HashMap<String, ConversationRecord>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of a stored conversation
    pub fn get(&self, conversation_id: &str) -> Option<ConversationRecord> {
        self.conversations.read().get(conversation_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.conversations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.read().is_empty()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn create_conversation(
        &self,
        conversation_id: &str,
        tenant_id: &str,
        user_id: Option<&str>,
    ) -> Result<(), StoreError> {
        self.conversations
            .write()
            .entry(conversation_id.to_string())
            .or_insert_with(|| ConversationRecord {
                tenant_id: tenant_id.to_string(),
                user_id: user_id.map(String::from),
                created_at: Utc::now(),
                messages: Vec::new(),
            });
        Ok(())
    }

    async fn recent_messages(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<ConversationContext, StoreError> {
        let conversations = self.conversations.read();
        let record = conversations
            .get(conversation_id)
            .ok_or_else(|| StoreError::NotFound(conversation_id.to_string()))?;

        let start = record.messages.len().saturating_sub(limit);
        let turns = record.messages[start..]
            .iter()
            .map(|m| ConversationTurn::new(m.role, m.content.clone()))
            .collect();
        Ok(ConversationContext::new(conversation_id, turns))
    }

    async fn append_message(&self, message: NewMessage) -> Result<(), StoreError> {
        let mut conversations = self.conversations.write();
        let record = conversations
            .get_mut(&message.conversation_id)
            .ok_or_else(|| StoreError::NotFound(message.conversation_id.clone()))?;
        record.messages.push(message);
        Ok(())
    }
}

/// Logs each answer event at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn emit(&self, event: AnswerEvent) -> Result<(), StoreError> {
        let confidence = event.result.confidence.as_ref().map(|c| c.score);
        tracing::info!(
            tenant_id = %event.tenant_id,
            user_id = ?event.user_id,
            conversation_id = %event.result.conversation_id,
            mode = %event.mode,
            model = %event.result.model_used,
            citations = event.result.citations.len(),
            confidence = ?confidence,
            total_ms = event.result.timing.total_ms,
            cost = event.result.cost,
            "Answer event"
        );
        Ok(())
    }
}
