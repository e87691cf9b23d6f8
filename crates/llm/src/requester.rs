//! Answer Requester
//!
//! Sends an assembled prompt to the model router exactly once.

use std::sync::Arc;

use answer_engine_core::{
    AskRequest, GenerationRequest, GenerationRequirements, GenerationResult, ModeProfile,
    ModelRouter,
};

use crate::prompt::AssembledPrompt;
use crate::LlmError;

pub struct AnswerRequester {
    router: Arc<dyn ModelRouter>,
}

impl AnswerRequester {
    pub fn new(router: Arc<dyn ModelRouter>) -> Self {
        Self { router }
    }

    /// Router request for a prompt
    pub fn build_request(prompt: &AssembledPrompt, request: &AskRequest) -> GenerationRequest {
        let question = &request.question;
        GenerationRequest {
            messages: prompt.messages.clone(),
            tenant_id: question.tenant_id.clone(),
            user_id: question.user_id.clone(),
            model_preference: request.model_preference.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            requirements: GenerationRequirements {
                supports_citations: request.include_citations,
                language: question.language.clone(),
                requires_reasoning: true,
            },
        }
    }

    pub async fn request(
        &self,
        prompt: &AssembledPrompt,
        request: &AskRequest,
        profile: &ModeProfile,
    ) -> Result<GenerationResult, LlmError> {
        let generation = Self::build_request(prompt, request);

        match self.router.generate(&generation).await {
            Ok(result) => {
                tracing::debug!(
                    router = self.router.name(),
                    mode = %profile.mode,
                    model = %result.model_used,
                    latency_ms = result.latency_ms,
                    completion_tokens = result.token_usage.completion_tokens,
                    "Generation complete"
                );
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(
                    router = self.router.name(),
                    mode = %profile.mode,
                    tenant_id = %generation.tenant_id,
                    error = %e,
                    "Generation failed"
                );
                Err(LlmError::Router(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use answer_engine_core::{AnswerMode, GenerationError, Message, TokenUsage};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    struct RecordingRouter {
        fail: bool,
        seen: Mutex<Vec<GenerationRequest>>,
    }

    #[async_trait]
    impl ModelRouter for RecordingRouter {
        async fn generate(
            &self,
            request: &GenerationRequest,
        ) -> Result<GenerationResult, GenerationError> {
            self.seen.lock().push(request.clone());
            if self.fail {
                return Err(GenerationError::Api("HTTP 500: boom".to_string()));
            }
            Ok(GenerationResult {
                text: "Answer [1]".to_string(),
                model_used: "test-model".to_string(),
                cost: 0.001,
                latency_ms: 12,
                token_usage: TokenUsage::new(100, 20),
            })
        }
    }

    fn prompt() -> AssembledPrompt {
        AssembledPrompt {
            messages: vec![Message::system("system"), Message::user("What is ML?")],
            context_block: String::new(),
            history_block: String::new(),
        }
    }

    #[tokio::test]
    async fn test_request_carries_options() {
        let router = Arc::new(RecordingRouter {
            fail: false,
            seen: Mutex::new(Vec::new()),
        });
        let requester = AnswerRequester::new(router.clone());
        let request = AskRequest::new("What is ML?", "tenant-a")
            .with_user("u1")
            .with_language("de")
            .with_model("big-model")
            .with_temperature(0.2)
            .with_max_tokens(300)
            .without_citations();

        let result = requester
            .request(&prompt(), &request, ModeProfile::for_mode(AnswerMode::Standard))
            .await
            .unwrap();
        assert_eq!(result.model_used, "test-model");

        let seen = router.seen.lock();
        assert_eq!(seen.len(), 1);
        let sent = &seen[0];
        assert_eq!(sent.messages.len(), 2);
        assert_eq!(sent.tenant_id, "tenant-a");
        assert_eq!(sent.user_id.as_deref(), Some("u1"));
        assert_eq!(sent.model_preference.as_deref(), Some("big-model"));
        assert_eq!(sent.max_tokens, Some(300));
        assert!((sent.temperature - 0.2).abs() < f32::EPSILON);
        assert!(!sent.requirements.supports_citations);
        assert!(sent.requirements.requires_reasoning);
        assert_eq!(sent.requirements.language, "de");
    }

    #[tokio::test]
    async fn test_failure_is_not_retried() {
        let router = Arc::new(RecordingRouter {
            fail: true,
            seen: Mutex::new(Vec::new()),
        });
        let requester = AnswerRequester::new(router.clone());
        let request = AskRequest::new("q", "t");

        let err = requester
            .request(&prompt(), &request, ModeProfile::for_mode(AnswerMode::Standard))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Router(GenerationError::Api(_))));
        assert_eq!(router.seen.lock().len(), 1);
    }
}
