//! Grounded Answer Agent
//!
//! Features:
//! - End-to-end question answering state machine over injected collaborators
//! - Citation extraction bound to the retrieved passage order
//! - Weighted confidence scoring with explanations
//! - Best-effort conversation recording and analytics events
//! - In-memory conversation store and tracing event sink

pub mod agent;
pub mod citations;
pub mod confidence;
pub mod memory;
pub mod metrics;
pub mod recorder;

pub use agent::{AnswerAgent, PipelineStage};
pub use citations::CitationExtractor;
pub use confidence::ConfidenceScorer;
pub use memory::{ConversationRecord, InMemoryConversationStore, TracingEventSink};
pub use recorder::ConversationRecorder;
