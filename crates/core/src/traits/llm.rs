//! Model-routing collaborator interface

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::llm_types::{GenerationRequest, GenerationResult};

/// Selects a model that meets the request's requirements and generates.
///
/// Retry, backoff and timeouts are the router's concern; callers make a
/// single attempt.
#[async_trait]
pub trait ModelRouter: Send + Sync {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError>;

    /// Router name for logs
    fn name(&self) -> &str {
        "model-router"
    }
}
