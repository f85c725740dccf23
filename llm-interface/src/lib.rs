//! Narrative-generation collaborator: a Gemini `generateContent` client
//! behind the [`NarrativeGenerator`] seam. Calls are independent and carry no
//! conversation state.

use std::time::Duration;

use async_trait::async_trait;
use mentionlens_core::{CoreError, GenerationOutcome, GenerationRequest, LlmError, NarrativeGenerator};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Categories blocked at medium probability and above. Reddit text trips
/// these often enough that the block reason must surface as a degraded
/// field, not an error.
const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

#[derive(Debug, Serialize)]
struct GenerateContentBody {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
    #[serde(rename = "safetySettings")]
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

pub struct GeminiClient {
    http_client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Result<Self, CoreError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(CoreError::Network)?;

        Ok(Self {
            http_client,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl NarrativeGenerator for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationOutcome, CoreError> {
        let url = format!("{}/models/{}:generateContent", GEMINI_API_BASE, self.model);
        let body = GenerateContentBody {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(request.prompt),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens,
            },
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|category| SafetySetting {
                    category,
                    threshold: "BLOCK_MEDIUM_AND_ABOVE",
                })
                .collect(),
        };

        debug!("Gemini generate request to model {}", self.model);
        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CoreError::Llm(LlmError::RequestTimeout)
                } else {
                    CoreError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Gemini request failed ({}): {}", status, message);
            return Err(CoreError::Llm(LlmError::RequestFailed {
                status_code: status.as_u16(),
                message,
            }));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            CoreError::Llm(LlmError::InvalidResponseFormat {
                details: e.to_string(),
            })
        })?;

        // A blocked prompt produces no candidates at all
        if let Some(feedback) = parsed.prompt_feedback {
            if let Some(reason) = feedback.block_reason {
                warn!("Gemini blocked prompt: {}", reason);
                return Ok(GenerationOutcome {
                    text: None,
                    blocked_reason: Some(reason),
                });
            }
        }

        let Some(candidate) = parsed.candidates.into_iter().next() else {
            return Err(CoreError::Llm(LlmError::InvalidResponseFormat {
                details: "response contained no candidates".to_string(),
            }));
        };

        // Generation can also be cut off by a safety check mid-candidate
        if candidate.finish_reason.as_deref() == Some("SAFETY") {
            return Ok(GenerationOutcome {
                text: None,
                blocked_reason: Some("SAFETY".to_string()),
            });
        }

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|text| !text.is_empty());

        Ok(GenerationOutcome {
            text,
            blocked_reason: None,
        })
    }
}
