//! Answer Agent
//!
//! Drives one question through the pipeline:
//!
//! ```text
//! START -> (conversation_id? RESUME : CREATE) -> ENHANCE -> RETRIEVE
//!       -> ASSEMBLE_PROMPT -> GENERATE -> STRUCTURE_RESPONSE
//!       -> SCORE_CONFIDENCE -> RECORD -> DONE
//! ```
//!
//! Retrieval with no usable passages, search failures and generation
//! failures end the request. History, recording and event failures are
//! logged and the request continues.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use uuid::Uuid;

use answer_engine_config::{PipelineConfig, Settings};
use answer_engine_core::{
    AnswerResult, AnswerTiming, AskRequest, ConversationContext, ConversationStore, Error,
    EventSink, ModeProfile, ModelRouter, Result, SearchBackend,
};
use answer_engine_llm::{AnswerRequester, HttpModelRouter, HttpRouterConfig, PromptAssembler};
use answer_engine_rag::{
    ContextRetriever, EnhancerConfig, HttpSearchBackend, HttpSearchConfig, QueryEnhancer,
};

use crate::citations::CitationExtractor;
use crate::confidence::ConfidenceScorer;
use crate::memory::{InMemoryConversationStore, TracingEventSink};
use crate::metrics;
use crate::recorder::ConversationRecorder;

/// Pipeline states, used as the `stage` field in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Start,
    Resume,
    Create,
    Enhance,
    Retrieve,
    AssemblePrompt,
    Generate,
    StructureResponse,
    ScoreConfidence,
    Record,
    Done,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Start => "start",
            PipelineStage::Resume => "resume",
            PipelineStage::Create => "create",
            PipelineStage::Enhance => "enhance",
            PipelineStage::Retrieve => "retrieve",
            PipelineStage::AssemblePrompt => "assemble_prompt",
            PipelineStage::Generate => "generate",
            PipelineStage::StructureResponse => "structure_response",
            PipelineStage::ScoreConfidence => "score_confidence",
            PipelineStage::Record => "record",
            PipelineStage::Done => "done",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grounded question answering over injected collaborators
///
/// Holds no per-request state; `ask` may be called concurrently.
pub struct AnswerAgent {
    store: Arc<dyn ConversationStore>,
    enhancer: QueryEnhancer,
    retriever: ContextRetriever,
    assembler: PromptAssembler,
    requester: AnswerRequester,
    extractor: CitationExtractor,
    scorer: ConfidenceScorer,
    recorder: ConversationRecorder,
    config: PipelineConfig,
}

impl AnswerAgent {
    pub fn new(
        search: Arc<dyn SearchBackend>,
        router: Arc<dyn ModelRouter>,
        store: Arc<dyn ConversationStore>,
        events: Arc<dyn EventSink>,
        config: PipelineConfig,
    ) -> Self {
        let recorder = ConversationRecorder::new(store.clone(), events)
            .with_recording(config.record_conversations)
            .with_events(config.emit_events);

        Self {
            store,
            enhancer: QueryEnhancer::new(EnhancerConfig::from(&config)),
            retriever: ContextRetriever::new(search),
            assembler: PromptAssembler::new(),
            requester: AnswerRequester::new(router),
            extractor: CitationExtractor::new(config.excerpt_chars),
            scorer: ConfidenceScorer::new(),
            recorder,
            config,
        }
    }

    /// HTTP collaborators from settings, with the in-memory store and the
    /// tracing event sink
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let search = HttpSearchBackend::new(HttpSearchConfig::from(&settings.search))?;
        let router = HttpModelRouter::new(HttpRouterConfig::from(&settings.router))?;

        Ok(Self::new(
            Arc::new(search),
            Arc::new(router),
            Arc::new(InMemoryConversationStore::new()),
            Arc::new(TracingEventSink),
            settings.pipeline.clone(),
        ))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Answer one question
    pub async fn ask(&self, request: AskRequest) -> Result<AnswerResult> {
        let start = Instant::now();
        let mode = request.mode;
        metrics::record_request(mode);

        match self.run(request, start).await {
            Ok(result) => {
                metrics::record_latency(result.timing.total_ms);
                if let Some(ref confidence) = result.confidence {
                    metrics::record_confidence(confidence.score);
                }
                tracing::info!(
                    conversation_id = %result.conversation_id,
                    mode = %mode,
                    model = %result.model_used,
                    passages = result.passages_used,
                    citations = result.citations.len(),
                    total_ms = result.timing.total_ms,
                    "Answered question"
                );
                Ok(result)
            }
            Err(e) => {
                metrics::record_failure(e.kind());
                tracing::warn!(mode = %mode, kind = e.kind(), error = %e, "Question failed");
                Err(e)
            }
        }
    }

    async fn run(&self, mut request: AskRequest, start: Instant) -> Result<AnswerResult> {
        request.validate()?;
        if request.max_tokens.is_none() {
            request.max_tokens = self.config.default_max_tokens;
        }

        let profile = ModeProfile::for_mode(request.mode);
        let question = &request.question;
        tracing::debug!(
            stage = %PipelineStage::Start,
            mode = %profile.mode,
            tenant_id = %question.tenant_id,
            "Processing question"
        );

        let (conversation_id, history) = match question.conversation_id.clone() {
            Some(id) => {
                let history = self.resume(&id, profile).await;
                (id, history)
            }
            None => {
                let id = self.create(&request).await;
                let history = ConversationContext::empty(id.clone());
                (id, history)
            }
        };

        let query = self.enhancer.enhance(&question.text, profile.mode, &history);
        tracing::debug!(
            stage = %PipelineStage::Enhance,
            enhanced = query != question.text,
            "Retrieval query ready"
        );

        let retrieval = self.retriever.retrieve(&query, question, profile).await?;
        tracing::debug!(
            stage = %PipelineStage::Retrieve,
            candidates = retrieval.candidates_considered,
            passages = retrieval.passages.len(),
            method = ?retrieval.method,
            "Context retrieved"
        );

        let prompt = self.assembler.assemble(
            &question.text,
            profile,
            &retrieval.passages,
            &history,
            &question.language,
        );
        tracing::debug!(
            stage = %PipelineStage::AssemblePrompt,
            context_chars = prompt.context_block.len(),
            history_chars = prompt.history_block.len(),
            "Prompt assembled"
        );

        let generation_start = Instant::now();
        let generation = self.requester.request(&prompt, &request, profile).await?;
        let generation_ms = generation_start.elapsed().as_millis() as u64;
        tracing::debug!(
            stage = %PipelineStage::Generate,
            model = %generation.model_used,
            generation_ms,
            "Answer generated"
        );

        let extracted = self
            .extractor
            .extract(&generation.text, &retrieval.passages);
        let (citations, degraded) = match extracted {
            Ok(citations) => (citations, false),
            Err(e) if !e.is_fatal() => {
                tracing::warn!(
                    stage = %PipelineStage::StructureResponse,
                    conversation_id = %conversation_id,
                    error = %e,
                    "Could not structure answer; continuing without citations"
                );
                (Vec::new(), true)
            }
            Err(e) => return Err(e),
        };
        tracing::debug!(
            stage = %PipelineStage::StructureResponse,
            citations = citations.len(),
            degraded,
            "Response structured"
        );

        let confidence = if request.include_confidence {
            let assessment = self.scorer.assess(
                &retrieval.passages,
                &generation.text,
                citations.len(),
                degraded,
            );
            tracing::debug!(
                stage = %PipelineStage::ScoreConfidence,
                score = assessment.score,
                level = %assessment.level,
                "Confidence scored"
            );
            Some(assessment)
        } else {
            None
        };

        let result = AnswerResult {
            conversation_id,
            answer: generation.text,
            citations: if request.include_citations { citations } else { Vec::new() },
            confidence,
            retrieval_method: retrieval.method,
            mode: profile.mode,
            model_used: generation.model_used,
            timing: AnswerTiming {
                retrieval_ms: retrieval.elapsed_ms,
                generation_ms,
                total_ms: start.elapsed().as_millis() as u64,
            },
            candidates_considered: retrieval.candidates_considered,
            passages_used: retrieval.passages.len(),
            cost: generation.cost,
            token_usage: generation.token_usage,
            created_at: Utc::now(),
        };

        tracing::debug!(
            stage = %PipelineStage::Record,
            conversation_id = %result.conversation_id,
            "Recording"
        );
        self.recorder.record(&request, &result).await;

        tracing::debug!(stage = %PipelineStage::Done, "Pipeline complete");
        Ok(result)
    }

    /// History snapshot for an existing conversation; empty on failure
    async fn resume(&self, conversation_id: &str, profile: &ModeProfile) -> ConversationContext {
        if !profile.uses_history() {
            tracing::debug!(
                stage = %PipelineStage::Resume,
                conversation_id,
                "Mode does not use history; skipping fetch"
            );
            return ConversationContext::empty(conversation_id);
        }

        match self
            .store
            .recent_messages(conversation_id, self.config.history_turns)
            .await
        {
            Ok(history) => {
                tracing::debug!(
                    stage = %PipelineStage::Resume,
                    conversation_id,
                    turns = history.len(),
                    "Loaded conversation history"
                );
                history
            }
            Err(e) => {
                let err = Error::from(e);
                tracing::warn!(
                    stage = %PipelineStage::Resume,
                    conversation_id,
                    error = %err,
                    "History unavailable; continuing without it"
                );
                ConversationContext::empty(conversation_id)
            }
        }
    }

    /// Mint a conversation id and register it with the store
    async fn create(&self, request: &AskRequest) -> String {
        let id = Uuid::new_v4().to_string();
        let question = &request.question;

        if self.config.record_conversations {
            if let Err(e) = self
                .store
                .create_conversation(&id, &question.tenant_id, question.user_id.as_deref())
                .await
            {
                tracing::warn!(
                    stage = %PipelineStage::Create,
                    conversation_id = %id,
                    error = %e,
                    "Failed to create conversation; continuing"
                );
            }
        }

        tracing::debug!(
            stage = %PipelineStage::Create,
            conversation_id = %id,
            "Started conversation"
        );
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(PipelineStage::AssemblePrompt.to_string(), "assemble_prompt");
        assert_eq!(PipelineStage::Done.as_str(), "done");
    }

    #[test]
    fn test_agent_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AnswerAgent>();
    }
}
