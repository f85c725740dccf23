use mentionlens_core::{SentimentLabel, SentimentReading};
use vader_sentiment::SentimentIntensityAnalyzer;

/// Compound scores above this are labeled positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Compound scores below this are labeled negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Lexicon-based polarity classifier. The VADER lexicon is compiled into the
/// binary and parsed once when the classifier is constructed, so build one at
/// process start and inject it into each run.
pub struct SentimentClassifier {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl SentimentClassifier {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }

    /// Score a text span. Pure function over the text: no state is carried
    /// between calls.
    pub fn classify(&self, text: &str) -> SentimentReading {
        let scores = self.analyzer.polarity_scores(text);
        let score = scores.get("compound").copied().unwrap_or(0.0);
        SentimentReading {
            score,
            label: label_for_score(score),
        }
    }
}

impl Default for SentimentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a compound score to its three-way label using the fixed thresholds.
/// Also used by the report builder for the run-level average.
pub fn label_for_score(score: f64) -> SentimentLabel {
    if score > POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else if score < NEGATIVE_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}
