//! Follow-up question answering over caller-supplied mention context. The
//! prompt constrains the answer to the supplied excerpts; the engine is told
//! to say so when they are not enough.

use mentionlens_core::{
    ContextMention, GenerationRequest, MentionKind, NarrativeGenerator,
};
use tracing::warn;

const QNA_MAX_TOKENS: u32 = 512;
const QNA_TEMPERATURE: f32 = 0.2;
const QNA_CONTEXT_MAX_CHARS: usize = 12_000;

#[derive(Debug, Clone, Default)]
pub struct QnaOutcome {
    pub answer: Option<String>,
    pub error: Option<String>,
}

fn context_block(context: &[ContextMention]) -> String {
    let entries: Vec<String> = context
        .iter()
        .map(|mention| {
            let kind = match mention.kind {
                MentionKind::Submission => "submission",
                MentionKind::Comment => "comment",
            };
            match mention.text.as_deref().filter(|t| !t.is_empty()) {
                Some(text) => format!(
                    "[{} | score {}] {}\n{}",
                    kind, mention.score, mention.title, text
                ),
                None => format!("[{} | score {}] {}", kind, mention.score, mention.title),
            }
        })
        .collect();

    let mut block = entries.join("\n---\n");
    if block.chars().count() > QNA_CONTEXT_MAX_CHARS {
        block = block.chars().take(QNA_CONTEXT_MAX_CHARS).collect();
    }
    block
}

fn qna_prompt(question: &str, search_term: &str, context: &[ContextMention]) -> String {
    format!(
        "You are answering a question about Reddit discussions of \"{term}\".\n\
         Answer using ONLY the excerpts below. If they do not contain the \
         answer, say that the retrieved mentions do not cover it. Do not use \
         outside knowledge.\n\n\
         Excerpts:\n{context}\n\n\
         Question: {question}",
        term = search_term,
        context = context_block(context),
        question = question
    )
}

pub async fn answer_question(
    generator: &dyn NarrativeGenerator,
    question: &str,
    search_term: &str,
    context: &[ContextMention],
) -> QnaOutcome {
    let request = GenerationRequest {
        prompt: qna_prompt(question, search_term, context),
        max_output_tokens: QNA_MAX_TOKENS,
        temperature: QNA_TEMPERATURE,
    };

    match generator.generate(request).await {
        Ok(outcome) => {
            if let Some(answer) = outcome.text {
                QnaOutcome {
                    answer: Some(answer),
                    error: None,
                }
            } else {
                let reason = outcome
                    .blocked_reason
                    .unwrap_or_else(|| "no text returned".to_string());
                warn!("Q&A generation produced no answer: {}", reason);
                QnaOutcome {
                    answer: None,
                    error: Some(format!("answer unavailable: {}", reason)),
                }
            }
        }
        Err(e) => {
            warn!("Q&A generation failed: {}", e);
            QnaOutcome {
                answer: None,
                error: Some(format!("answer failed: {}", e)),
            }
        }
    }
}
