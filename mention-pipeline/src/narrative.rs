//! Optional narrative augmentation: builds a bounded corpus from the
//! collected mentions and issues independent summary and theme requests.
//! Every failure degrades to a null field; nothing here aborts a run.

use mentionlens_core::{
    CoreError, GenerationOutcome, GenerationRequest, Mention, MentionKind, NarrativeGenerator,
};
use tracing::warn;

/// How many of the newest mentions feed the corpus.
pub const CORPUS_MAX_MENTIONS: usize = 30;
/// Hard cap on corpus size.
pub const CORPUS_MAX_CHARS: usize = 12_000;
/// Per-mention body snippet cap inside the corpus.
const BODY_SNIPPET_MAX_CHARS: usize = 500;

const CORPUS_SEPARATOR: &str = "\n---\n";
const GENERATION_MAX_TOKENS: u32 = 256;
const GENERATION_TEMPERATURE: f32 = 0.3;

#[derive(Debug, Clone, Default)]
pub struct NarrativeOutcome {
    pub summary: Option<String>,
    pub themes: Option<Vec<String>>,
    pub error: Option<String>,
}

/// Concatenate display text of the newest mentions into a bounded corpus.
/// Expects `mentions` sorted newest first.
pub fn build_corpus(mentions: &[Mention], max_mentions: usize, max_chars: usize) -> String {
    let entries: Vec<String> = mentions
        .iter()
        .take(max_mentions)
        .map(|mention| match mention.kind {
            MentionKind::Submission => match &mention.body {
                Some(body) => format!("{}\n{}", mention.title, snippet(body)),
                None => mention.title.clone(),
            },
            MentionKind::Comment => mention
                .body
                .as_deref()
                .map(snippet)
                .unwrap_or_default(),
        })
        .filter(|entry| !entry.is_empty())
        .collect();

    let mut corpus = entries.join(CORPUS_SEPARATOR);
    if corpus.chars().count() > max_chars {
        corpus = corpus.chars().take(max_chars).collect();
    }
    corpus
}

fn snippet(body: &str) -> String {
    body.chars().take(BODY_SNIPPET_MAX_CHARS).collect()
}

fn summary_prompt(search_term: &str, corpus: &str) -> String {
    format!(
        "You are analyzing Reddit discussions that mention \"{term}\".\n\
         Write a short, objective summary (3-4 sentences) of what people are \
         saying. Do not speculate beyond the excerpts.\n\n\
         Excerpts:\n{corpus}",
        term = search_term,
        corpus = corpus
    )
}

fn themes_prompt(search_term: &str, corpus: &str) -> String {
    format!(
        "You are analyzing Reddit discussions that mention \"{term}\".\n\
         List the recurring themes as a numbered list, one short phrase per \
         line, most prominent first. No commentary.\n\n\
         Excerpts:\n{corpus}",
        term = search_term,
        corpus = corpus
    )
}

/// Strip list markers ("1.", "2)", "-", "*") from generated theme lines.
pub fn parse_themes(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(|c: char| c.is_ascii_digit())
                .trim_start_matches(['.', ')', '-', '*'])
                .trim()
        })
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Run both generation requests concurrently and fold the results. Disabled
/// feature or empty corpus short-circuits to an all-`None` outcome.
pub async fn augment(
    generator: &dyn NarrativeGenerator,
    search_term: &str,
    corpus: &str,
) -> NarrativeOutcome {
    if corpus.is_empty() {
        return NarrativeOutcome::default();
    }

    let summary_request = GenerationRequest {
        prompt: summary_prompt(search_term, corpus),
        max_output_tokens: GENERATION_MAX_TOKENS,
        temperature: GENERATION_TEMPERATURE,
    };
    let themes_request = GenerationRequest {
        prompt: themes_prompt(search_term, corpus),
        max_output_tokens: GENERATION_MAX_TOKENS,
        temperature: GENERATION_TEMPERATURE,
    };

    let (summary_result, themes_result) = tokio::join!(
        generator.generate(summary_request),
        generator.generate(themes_request)
    );

    let mut errors: Vec<String> = Vec::new();
    let summary = unwrap_generation("summary", summary_result, &mut errors);
    let themes = unwrap_generation("themes", themes_result, &mut errors)
        .map(|text| parse_themes(&text))
        .filter(|themes| !themes.is_empty());

    NarrativeOutcome {
        summary,
        themes,
        error: if errors.is_empty() {
            None
        } else {
            Some(errors.join("; "))
        },
    }
}

fn unwrap_generation(
    field: &str,
    result: Result<GenerationOutcome, CoreError>,
    errors: &mut Vec<String>,
) -> Option<String> {
    match result {
        Ok(GenerationOutcome {
            text: Some(text), ..
        }) => Some(text),
        Ok(GenerationOutcome {
            blocked_reason: Some(reason),
            ..
        }) => {
            warn!("Narrative {} blocked: {}", field, reason);
            errors.push(format!("{} blocked: {}", field, reason));
            None
        }
        Ok(_) => {
            errors.push(format!("{} returned no text", field));
            None
        }
        Err(e) => {
            warn!("Narrative {} failed: {}", field, e);
            errors.push(format!("{} failed: {}", field, e));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mentionlens_core::SentimentLabel;

    fn mention(kind: MentionKind, title: &str, body: Option<&str>) -> Mention {
        Mention {
            id: "m".to_string(),
            kind,
            title: title.to_string(),
            body: body.map(str::to_string),
            url: "https://reddit.com/x".to_string(),
            subreddit: "rust".to_string(),
            score: 0,
            created_utc: Utc::now(),
            author: None,
            sentiment_score: 0.0,
            sentiment_label: SentimentLabel::Neutral,
        }
    }

    #[test]
    fn test_corpus_uses_title_and_body_for_submissions() {
        let mentions = vec![
            mention(MentionKind::Submission, "Widget thoughts", Some("long body")),
            mention(MentionKind::Comment, "Comment in: Widget thoughts", Some("reply text")),
        ];
        let corpus = build_corpus(&mentions, 30, 12_000);
        assert!(corpus.contains("Widget thoughts\nlong body"));
        assert!(corpus.contains("reply text"));
        // Comment display titles stay out of the corpus
        assert!(!corpus.contains("Comment in:"));
    }

    #[test]
    fn test_corpus_respects_mention_cap() {
        let mentions: Vec<Mention> = (0..10)
            .map(|i| mention(MentionKind::Submission, &format!("title{}", i), None))
            .collect();
        let corpus = build_corpus(&mentions, 3, 12_000);
        assert!(corpus.contains("title2"));
        assert!(!corpus.contains("title3"));
    }

    #[test]
    fn test_corpus_hard_char_cap() {
        let mentions = vec![mention(
            MentionKind::Submission,
            &"a".repeat(400),
            None,
        )];
        let corpus = build_corpus(&mentions, 30, 100);
        assert_eq!(corpus.chars().count(), 100);
    }

    #[test]
    fn test_parse_themes_strips_markers() {
        let text = "1. Price complaints\n2) Durability praise\n- Availability\n\n  3. Shipping\n";
        assert_eq!(
            parse_themes(text),
            vec![
                "Price complaints",
                "Durability praise",
                "Availability",
                "Shipping"
            ]
        );
    }
}
