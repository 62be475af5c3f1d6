//! Final response object returned to the request-handling layer.

use crate::types::IntentKind;
use serde::{Deserialize, Serialize};

/// Provenance of one fact used in the answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub title: String,
    pub url: String,
    pub relevance: f64,
}

/// Assembled answer. Created once per query, never mutated after return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineResponse {
    pub text: String,
    pub confidence: f64,
    pub sources: Vec<SourceRef>,
    pub intent: IntentKind,
    pub requires_human: bool,
    pub suggested_actions: Vec<String>,
    pub elapsed_ms: u64,
    pub language: String,
}
