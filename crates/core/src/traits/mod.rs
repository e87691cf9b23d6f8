//! Collaborator traits for the answer engine
//!
//! The pipeline never talks to a concrete search engine, model provider or
//! database. Each collaborator sits behind one of these traits so it can be
//! swapped by configuration and mocked in tests.
//!
//! # Trait Hierarchy
//!
//! ```text
//! Retrieval:
//!   - SearchBackend: hybrid vector + lexical search over the corpus
//!
//! Generation:
//!   - ModelRouter: picks a model for the requirements and generates
//!
//! Conversation:
//!   - ConversationStore: history snapshot, conversation creation, message append
//!   - EventSink: analytics events for completed answers
//! ```
//!
//! All traits are object safe and `Send + Sync`; the pipeline holds them as
//! `Arc<dyn Trait>` and calls them concurrently from many requests.

mod conversation;
mod llm;
mod search;

pub use conversation::{AnswerEvent, ConversationStore, EventSink};
pub use llm::ModelRouter;
pub use search::{SearchBackend, SearchFilters, SearchRequest};
