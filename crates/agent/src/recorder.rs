//! Conversation recording and analytics
//!
//! Runs after the answer is complete. Nothing here can fail the request:
//! store and sink errors are logged and dropped.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use answer_engine_core::{
    AnswerEvent, AnswerResult, AskRequest, ConversationStore, EventSink, NewMessage, TurnRole,
};

pub struct ConversationRecorder {
    store: Arc<dyn ConversationStore>,
    events: Arc<dyn EventSink>,
    record_conversations: bool,
    emit_events: bool,
}

impl ConversationRecorder {
    pub fn new(store: Arc<dyn ConversationStore>, events: Arc<dyn EventSink>) -> Self {
        Self {
            store,
            events,
            record_conversations: true,
            emit_events: true,
        }
    }

    pub fn with_recording(mut self, enabled: bool) -> Self {
        self.record_conversations = enabled;
        self
    }

    pub fn with_events(mut self, enabled: bool) -> Self {
        self.emit_events = enabled;
        self
    }

    /// User message followed by the assistant answer
    pub fn messages(request: &AskRequest, result: &AnswerResult) -> [NewMessage; 2] {
        let user = NewMessage {
            conversation_id: result.conversation_id.clone(),
            role: TurnRole::User,
            content: request.question.text.clone(),
            metadata: json!({
                "mode": result.mode,
                "language": request.question.language,
            }),
        };
        let assistant = NewMessage {
            conversation_id: result.conversation_id.clone(),
            role: TurnRole::Assistant,
            content: result.answer.clone(),
            metadata: json!({
                "citations": result.citations,
                "confidence": result.confidence,
                "model": result.model_used,
                "mode": result.mode,
            }),
        };
        [user, assistant]
    }

    pub async fn record(&self, request: &AskRequest, result: &AnswerResult) {
        if self.record_conversations {
            for message in Self::messages(request, result) {
                let role = message.role;
                if let Err(e) = self.store.append_message(message).await {
                    tracing::warn!(
                        conversation_id = %result.conversation_id,
                        role = role.as_str(),
                        error = %e,
                        "Failed to record conversation message"
                    );
                }
            }
        }

        if self.emit_events {
            let event = AnswerEvent {
                tenant_id: request.question.tenant_id.clone(),
                user_id: request.question.user_id.clone(),
                mode: result.mode,
                question: request.question.text.clone(),
                result: result.clone(),
                recorded_at: Utc::now(),
            };
            if let Err(e) = self.events.emit(event).await {
                tracing::warn!(
                    conversation_id = %result.conversation_id,
                    error = %e,
                    "Failed to emit answer event"
                );
            }
        }
    }
}
