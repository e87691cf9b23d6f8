//! Core traits and types for the grounded answer engine
//!
//! This crate provides foundational types used across all other crates:
//! - Operating modes and the per-mode parameter table
//! - Request, passage, citation and answer types
//! - Confidence assessment types
//! - Conversation snapshot types
//! - Collaborator traits (search, model routing, conversation store, events)
//! - Error types

pub mod answer;
pub mod citation;
pub mod confidence;
pub mod conversation;
pub mod error;
pub mod llm_types;
pub mod modes;
pub mod passage;
pub mod question;
pub mod text;
pub mod traits;

pub use answer::{AnswerResult, AnswerTiming, RetrievalMethod};
pub use citation::Citation;
pub use confidence::{ConfidenceAssessment, ConfidenceFactors, ConfidenceLevel};
pub use conversation::{ConversationContext, ConversationTurn, NewMessage, TurnRole};
pub use error::{Error, GenerationError, Result, SearchError, StoreError};
pub use llm_types::{
    GenerationRequest, GenerationRequirements, GenerationResult, Message, Role, TokenUsage,
};
pub use modes::{AnswerMode, ModeProfile, RetrievalParams};
pub use passage::RetrievedPassage;
pub use question::{AskRequest, Question};

pub use traits::{
    AnswerEvent, ConversationStore, EventSink, ModelRouter, SearchBackend, SearchFilters,
    SearchRequest,
};
