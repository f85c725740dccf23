use async_trait::async_trait;
use chrono::Duration;

use crate::error::CoreError;
use crate::types::{RawComment, RawSubmission};

/// The content-source collaborator: keyword search plus bounded reply
/// expansion. The pipeline only ever talks to this trait, so tests can feed
/// it canned submissions.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Search for submissions mentioning `term`, newest first, created within
    /// the trailing `within` window, up to `limit` submissions.
    async fn search(
        &self,
        term: &str,
        within: Duration,
        limit: u32,
    ) -> Result<Vec<RawSubmission>, CoreError>;

    /// Flatten the submission's reply tree into comments. At most
    /// `max_expansions` collapsed thread stubs are expanded; the rest are
    /// dropped, trading completeness for latency.
    async fn expand_replies(
        &self,
        submission: &RawSubmission,
        max_expansions: u32,
    ) -> Result<Vec<RawComment>, CoreError>;
}

/// One free-text generation request against the narrative engine.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

/// Outcome of a generation call. `text` and `blocked_reason` are mutually
/// exclusive; both `None` means the provider returned an empty candidate.
#[derive(Debug, Clone, Default)]
pub struct GenerationOutcome {
    pub text: Option<String>,
    pub blocked_reason: Option<String>,
}

/// The narrative-generation collaborator. Calls are independent; no shared
/// conversation state.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationOutcome, CoreError>;
}
