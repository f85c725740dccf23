use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A Reddit submission, normalized at the client boundary. Internal logic
/// never sees the raw listing envelopes.
#[derive(Debug, Clone)]
pub struct RawSubmission {
    pub id: String,
    pub title: String,
    pub selftext: Option<String>,
    pub permalink: String,
    pub subreddit: String,
    pub score: i64,
    pub created_utc: DateTime<Utc>,
    pub author: Option<String>,
}

/// A comment from a submission's reply tree, flattened and normalized.
#[derive(Debug, Clone)]
pub struct RawComment {
    pub id: String,
    pub body: String,
    pub permalink: String,
    pub subreddit: String,
    pub score: i64,
    pub created_utc: DateTime<Utc>,
    pub author: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionKind {
    Submission,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

/// Report-level sentiment label. `Mixed` only appears here: a near-even split
/// of polarized mentions averages to a near-zero compound score that is not
/// truly neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallSentiment {
    Positive,
    Neutral,
    Negative,
    Mixed,
}

/// Output of the sentiment classifier for one text span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentReading {
    pub score: f64,
    pub label: SentimentLabel,
}

/// One piece of content matching the search term. Comment ids carry a `c_`
/// prefix so submissions and comments share a single dedup namespace.
/// Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mention {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MentionKind,
    pub title: String,
    #[serde(rename = "text_content")]
    pub body: Option<String>,
    pub url: String,
    pub subreddit: String,
    pub score: i64,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_utc: DateTime<Utc>,
    pub author: Option<String>,
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionTypeCounts {
    pub submission: u64,
    pub comment: u64,
}

/// The full report exposed to callers. Field names and casing match the wire
/// shape the frontend consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentionReport {
    pub search_term: String,
    pub mention_count: u64,
    pub average_score: f64,
    pub top_subreddits: Vec<(String, u64)>,
    pub average_sentiment: f64,
    pub overall_sentiment_label: OverallSentiment,
    pub sentiment_distribution: SentimentDistribution,
    pub top_authors: Vec<(String, u64)>,
    pub mention_type_counts: MentionTypeCounts,
    pub mentions: Vec<Mention>,
    pub llm_summary: Option<String>,
    pub llm_key_themes: Option<Vec<String>>,
    pub llm_error: Option<String>,
}

/// Trimmed-down mention supplied as Q&A context by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextMention {
    #[serde(rename = "type")]
    pub kind: MentionKind,
    pub title: String,
    pub text: Option<String>,
    pub score: i64,
}
