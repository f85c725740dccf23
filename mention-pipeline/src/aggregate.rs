use mentionlens_core::{Mention, MentionKind, MentionTypeCounts, SentimentDistribution, SentimentLabel};

/// Running counters for one aggregation run. Mutated only by
/// [`accept`](Self::accept) in extraction order, read-only once the run
/// completes. Count maps keep first-seen order; the report builder's stable
/// sort turns that into the ranking tie-break.
#[derive(Debug, Default)]
pub struct AggregateState {
    pub total_score: i64,
    pub count: u64,
    pub per_subreddit: Vec<(String, u64)>,
    pub per_author: Vec<(String, u64)>,
    pub sentiment_scores: Vec<f64>,
    pub sentiment_distribution: SentimentDistribution,
    pub type_counts: MentionTypeCounts,
}

impl AggregateState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self, mention: &Mention) {
        self.count += 1;
        self.total_score += mention.score;
        increment(&mut self.per_subreddit, &mention.subreddit);
        self.sentiment_scores.push(mention.sentiment_score);

        match mention.sentiment_label {
            SentimentLabel::Positive => self.sentiment_distribution.positive += 1,
            SentimentLabel::Neutral => self.sentiment_distribution.neutral += 1,
            SentimentLabel::Negative => self.sentiment_distribution.negative += 1,
        }

        match mention.kind {
            MentionKind::Submission => self.type_counts.submission += 1,
            MentionKind::Comment => self.type_counts.comment += 1,
        }

        // Deleted/anonymous authors count toward totals but never rank
        if let Some(author) = mention.author.as_deref().filter(|a| !a.is_empty()) {
            increment(&mut self.per_author, author);
        }
    }
}

fn increment(counts: &mut Vec<(String, u64)>, key: &str) {
    if let Some(entry) = counts.iter_mut().find(|(name, _)| name == key) {
        entry.1 += 1;
    } else {
        counts.push((key.to_string(), 1));
    }
}
