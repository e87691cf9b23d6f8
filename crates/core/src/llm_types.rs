//! Types exchanged with the model-routing collaborator

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Capabilities the chosen model must have
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequirements {
    pub supports_citations: bool,
    pub language: String,
    pub requires_reasoning: bool,
}

/// Everything the router needs for one generation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub messages: Vec<Message>,
    pub tenant_id: String,
    pub user_id: Option<String>,
    pub model_preference: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: f32,
    pub requirements: GenerationRequirements,
}

/// Token accounting reported by the router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }
}

/// Raw generation output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
    /// Identifier of the model that actually handled the request
    pub model_used: String,
    pub cost: f64,
    pub latency_ms: u64,
    pub token_usage: TokenUsage,
}
