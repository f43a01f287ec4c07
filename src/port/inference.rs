//! Structured-inference port.
//!
//! The inference service receives a prompt plus a single JSON-schema
//! "tool" definition with tool choice forced to it, and must answer with
//! exactly one structured call matching that schema. Anything else is a
//! contract violation, surfaced as
//! [`Error::InferenceContract`](crate::error::Error::InferenceContract)
//! and never retried.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// The schema constraint for one structured inference call.
#[derive(Debug, Clone)]
pub struct ToolSchema {
    /// Function name the service is forced to call.
    pub name: &'static str,
    /// Short description steering the model.
    pub description: &'static str,
    /// JSON schema for the call's arguments.
    pub parameters: Value,
}

/// One schema-constrained inference request.
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    pub system: String,
    pub user: String,
    pub tool: ToolSchema,
}

/// Client for the structured-inference service.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - `invoke` returns the arguments of the single structured call,
///   already parsed as JSON
/// - A response carrying no matching call must be reported as
///   [`Error::InferenceContract`](crate::error::Error::InferenceContract),
///   not papered over with a retry
#[async_trait]
pub trait StructuredInference: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &'static str;

    /// Run one structured inference call and return its arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails in transport or the service
    /// breaks the one-structured-call contract.
    async fn invoke(&self, request: &InferenceRequest) -> Result<Value>;
}
