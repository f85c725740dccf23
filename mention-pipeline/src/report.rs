//! Finalizes aggregator state into the response shape: derived averages, the
//! overall label with its mixed tie-break, stable top-K rankings, and the
//! truncated newest-first mention list.

use mentionlens_core::{
    Mention, MentionReport, OverallSentiment, SentimentDistribution, SentimentLabel,
};
use sentiment_engine::label_for_score;

use crate::aggregate::AggregateState;
use crate::MIXED_SPLIT_RATIO;

#[derive(Debug, Clone)]
pub struct ReportLimits {
    pub top_subreddits_k: usize,
    pub top_authors_k: usize,
    pub mentions_list_limit: usize,
}

impl Default for ReportLimits {
    fn default() -> Self {
        Self {
            top_subreddits_k: 5,
            top_authors_k: 5,
            mentions_list_limit: 50,
        }
    }
}

/// Build the final report. Truncation of the mention list happens here,
/// after aggregation, so totals and averages reflect the full matched set.
pub fn build_report(
    search_term: &str,
    state: AggregateState,
    mut mentions: Vec<Mention>,
    limits: &ReportLimits,
) -> MentionReport {
    let average_score = if state.count > 0 {
        state.total_score as f64 / state.count as f64
    } else {
        0.0
    };

    let average_sentiment = if state.sentiment_scores.is_empty() {
        0.0
    } else {
        state.sentiment_scores.iter().sum::<f64>() / state.sentiment_scores.len() as f64
    };

    let overall_sentiment_label =
        overall_label(average_sentiment, &state.sentiment_distribution, state.count);

    // Stable sort on timestamp; insertion (extraction) order breaks ties
    mentions.sort_by(|a, b| b.created_utc.cmp(&a.created_utc));
    mentions.truncate(limits.mentions_list_limit);

    MentionReport {
        search_term: search_term.to_string(),
        mention_count: state.count,
        average_score: round_to(average_score, 2),
        top_subreddits: top_k(&state.per_subreddit, limits.top_subreddits_k),
        average_sentiment: round_to(average_sentiment, 3),
        overall_sentiment_label,
        sentiment_distribution: state.sentiment_distribution,
        top_authors: top_k(&state.per_author, limits.top_authors_k),
        mention_type_counts: state.type_counts,
        mentions,
        llm_summary: None,
        llm_key_themes: None,
        llm_error: None,
    }
}

/// Classify the run-level average with the per-mention thresholds, then apply
/// the mixed tie-break: a near-even split of polarized mentions averages out
/// to a near-zero score that is not truly neutral.
pub fn overall_label(
    average_sentiment: f64,
    distribution: &SentimentDistribution,
    count: u64,
) -> OverallSentiment {
    match label_for_score(average_sentiment) {
        SentimentLabel::Positive => OverallSentiment::Positive,
        SentimentLabel::Negative => OverallSentiment::Negative,
        SentimentLabel::Neutral => {
            let split = (distribution.positive as f64 - distribution.negative as f64).abs();
            if distribution.positive > 0
                && distribution.negative > 0
                && split < count as f64 * MIXED_SPLIT_RATIO
            {
                OverallSentiment::Mixed
            } else {
                OverallSentiment::Neutral
            }
        }
    }
}

fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

fn top_k(counts: &[(String, u64)], k: usize) -> Vec<(String, u64)> {
    let mut ranked = counts.to_vec();
    ranked.sort_by(|a, b| b.1.cmp(&a.1)); // stable: first-seen order breaks ties
    ranked.truncate(k);
    ranked
}
