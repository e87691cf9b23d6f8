//! Question and request types

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::modes::AnswerMode;

/// Immutable input for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    /// Language tag, e.g. `en` or `hi`
    pub language: String,
    pub tenant_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
    /// Restrict retrieval to these source ids
    #[serde(default)]
    pub sources: Option<Vec<String>>,
}

impl Question {
    pub fn new(text: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: "en".to_string(),
            tenant_id: tenant_id.into(),
            user_id: None,
            conversation_id: None,
            sources: None,
        }
    }
}

/// A question plus the per-request generation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: Question,
    /// Unknown mode tags fall back to `Standard`
    #[serde(default, deserialize_with = "AnswerMode::deserialize_lenient")]
    pub mode: AnswerMode,
    #[serde(default)]
    pub model_preference: Option<String>,
    pub temperature: f32,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default = "default_true")]
    pub include_citations: bool,
    #[serde(default = "default_true")]
    pub include_confidence: bool,
}

fn default_true() -> bool {
    true
}

impl AskRequest {
    pub fn new(text: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        Self {
            question: Question::new(text, tenant_id),
            mode: AnswerMode::Standard,
            model_preference: None,
            temperature: 0.7,
            max_tokens: None,
            include_citations: true,
            include_confidence: true,
        }
    }

    pub fn with_mode(mut self, mode: AnswerMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.question.user_id = Some(user_id.into());
        self
    }

    pub fn with_conversation(mut self, conversation_id: impl Into<String>) -> Self {
        self.question.conversation_id = Some(conversation_id.into());
        self
    }

    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.question.sources = Some(sources);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.question.language = language.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model_preference = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn without_citations(mut self) -> Self {
        self.include_citations = false;
        self
    }

    pub fn without_confidence(mut self) -> Self {
        self.include_confidence = false;
        self
    }

    /// Reject requests the pipeline cannot answer at all
    pub fn validate(&self) -> Result<()> {
        if self.question.text.trim().is_empty() {
            return Err(Error::InvalidRequest("question text is empty".to_string()));
        }
        if self.question.tenant_id.trim().is_empty() {
            return Err(Error::InvalidRequest("tenant_id is required".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::InvalidRequest(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        if self.max_tokens == Some(0) {
            return Err(Error::InvalidRequest("max_tokens must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let req = AskRequest::new("What is ML?", "tenant-a");
        assert_eq!(req.mode, AnswerMode::Standard);
        assert_eq!(req.question.language, "en");
        assert!(req.include_citations);
        assert!(req.include_confidence);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert!(AskRequest::new("  ", "t").validate().is_err());
        assert!(AskRequest::new("q", "").validate().is_err());
        assert!(AskRequest::new("q", "t").with_temperature(3.0).validate().is_err());
        assert!(AskRequest::new("q", "t").with_max_tokens(0).validate().is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{
            "question": {"text": "Compare A and B", "language": "en", "tenant_id": "t1"},
            "mode": "comparison",
            "temperature": 0.2
        }"#;
        let req: AskRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.mode, AnswerMode::Comparison);
        assert!(req.include_citations);
        assert!(req.question.sources.is_none());
    }

    #[test]
    fn test_deserialize_unknown_mode_as_standard() {
        let json = r#"{
            "question": {"text": "Write me a poem", "language": "en", "tenant_id": "t1"},
            "mode": "poetry",
            "temperature": 0.2
        }"#;
        let req: AskRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.mode, AnswerMode::Standard);

        let json = r#"{
            "question": {"text": "Is it true?", "language": "en", "tenant_id": "t1"},
            "mode": "fact-check",
            "temperature": 0.2
        }"#;
        let req: AskRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.mode, AnswerMode::FactCheck);
    }

    #[test]
    fn test_deserialize_missing_mode_is_standard() {
        let json = r#"{
            "question": {"text": "q", "language": "en", "tenant_id": "t1"},
            "temperature": 0.2
        }"#;
        let req: AskRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.mode, AnswerMode::Standard);
    }
}
