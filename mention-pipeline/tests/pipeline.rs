//! End-to-end pipeline tests over in-memory collaborators.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use mention_pipeline::{MentionRun, RunConfig};
use mentionlens_core::{
    ContentSource, CoreError, GenerationOutcome, GenerationRequest, MentionKind,
    NarrativeGenerator, OverallSentiment, RawComment, RawSubmission,
};
use sentiment_engine::SentimentClassifier;

struct FakeSource {
    submissions: Vec<RawSubmission>,
    comments: HashMap<String, Vec<RawComment>>,
    fail_expand_for: Option<String>,
}

impl FakeSource {
    fn new(submissions: Vec<RawSubmission>) -> Self {
        Self {
            submissions,
            comments: HashMap::new(),
            fail_expand_for: None,
        }
    }

    fn with_comments(mut self, submission_id: &str, comments: Vec<RawComment>) -> Self {
        self.comments.insert(submission_id.to_string(), comments);
        self
    }
}

#[async_trait]
impl ContentSource for FakeSource {
    async fn search(
        &self,
        _term: &str,
        _within: Duration,
        limit: u32,
    ) -> Result<Vec<RawSubmission>, CoreError> {
        Ok(self.submissions.iter().take(limit as usize).cloned().collect())
    }

    async fn expand_replies(
        &self,
        submission: &RawSubmission,
        _max_expansions: u32,
    ) -> Result<Vec<RawComment>, CoreError> {
        if self.fail_expand_for.as_deref() == Some(submission.id.as_str()) {
            return Err(CoreError::Internal {
                message: "expansion exploded".to_string(),
            });
        }
        Ok(self.comments.get(&submission.id).cloned().unwrap_or_default())
    }
}

/// Succeeds for theme requests; summary behavior is configurable.
struct FakeGenerator {
    block_summary: bool,
}

#[async_trait]
impl NarrativeGenerator for FakeGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationOutcome, CoreError> {
        if request.prompt.contains("recurring themes") {
            return Ok(GenerationOutcome {
                text: Some("1. Theme one\n2. Theme two".to_string()),
                blocked_reason: None,
            });
        }
        if self.block_summary {
            Ok(GenerationOutcome {
                text: None,
                blocked_reason: Some("SAFETY".to_string()),
            })
        } else {
            Ok(GenerationOutcome {
                text: Some("A tidy summary.".to_string()),
                blocked_reason: None,
            })
        }
    }
}

fn submission(id: &str, title: &str, score: i64, hours_ago: i64) -> RawSubmission {
    RawSubmission {
        id: id.to_string(),
        title: title.to_string(),
        selftext: None,
        permalink: format!("/r/widgets/comments/{}/post/", id),
        subreddit: "widgets".to_string(),
        score,
        created_utc: Utc::now() - Duration::hours(hours_ago),
        author: Some("poster".to_string()),
    }
}

fn comment(id: &str, body: &str, hours_ago: i64) -> RawComment {
    RawComment {
        id: id.to_string(),
        body: body.to_string(),
        permalink: format!("/r/widgets/comments/s1/post/{}/", id),
        subreddit: "widgets".to_string(),
        score: 1,
        created_utc: Utc::now() - Duration::hours(hours_ago),
        author: Some("replier".to_string()),
    }
}

#[tokio::test]
async fn test_two_submission_run_metrics() {
    let source = FakeSource::new(vec![
        submission(
            "s1",
            "I absolutely love this widget, it is wonderful, amazing and great!",
            10,
            2,
        ),
        submission(
            "s2",
            "I absolutely hate this widget, it is horrible, awful and terrible!",
            -4,
            3,
        ),
    ]);
    let classifier = SentimentClassifier::new();
    let run = MentionRun::new(&source, &classifier, None, RunConfig::default());

    let report = run.execute("widget").await.unwrap();
    assert_eq!(report.mention_count, 2);
    assert_eq!(report.average_score, 3.0);
    assert_eq!(report.sentiment_distribution.positive, 1);
    assert_eq!(report.sentiment_distribution.neutral, 0);
    assert_eq!(report.sentiment_distribution.negative, 1);
    assert_eq!(report.mention_type_counts.submission, 2);
    // |1 - 1| = 0 < 2 * 0.1: the even split reads as mixed
    assert_eq!(report.overall_sentiment_label, OverallSentiment::Mixed);
    assert_eq!(report.top_subreddits, vec![("widgets".to_string(), 2)]);
}

#[tokio::test]
async fn test_duplicate_submission_processed_once() {
    let duplicated = submission("s1", "widget talk", 5, 1);
    let source = FakeSource::new(vec![duplicated.clone(), duplicated]);
    let classifier = SentimentClassifier::new();
    let run = MentionRun::new(&source, &classifier, None, RunConfig::default());

    let report = run.execute("widget").await.unwrap();
    assert_eq!(report.mention_count, 1);
}

#[tokio::test]
async fn test_comments_filtered_and_namespaced() {
    let source = FakeSource::new(vec![submission("s1", "widget megathread", 3, 1)])
        .with_comments(
            "s1",
            vec![
                comment("k1", "my widget arrived today", 2),
                comment("k2", "no relevant text here", 2),
                comment("k3", "widget from last month", 9 * 24), // outside window
            ],
        );
    let classifier = SentimentClassifier::new();
    let run = MentionRun::new(&source, &classifier, None, RunConfig::default());

    let report = run.execute("widget").await.unwrap();
    assert_eq!(report.mention_count, 2);
    assert_eq!(report.mention_type_counts.submission, 1);
    assert_eq!(report.mention_type_counts.comment, 1);

    let comment_mention = report
        .mentions
        .iter()
        .find(|m| m.kind == MentionKind::Comment)
        .unwrap();
    assert_eq!(comment_mention.id, "c_k1");
    assert_eq!(comment_mention.title, "Comment in: widget megathread");
}

#[tokio::test]
async fn test_expansion_failure_does_not_abort_run() {
    let mut source = FakeSource::new(vec![
        submission("s1", "widget one", 1, 1),
        submission("s2", "widget two", 2, 2),
    ])
    .with_comments("s2", vec![comment("k1", "widget reply", 1)]);
    source.fail_expand_for = Some("s1".to_string());

    let classifier = SentimentClassifier::new();
    let run = MentionRun::new(&source, &classifier, None, RunConfig::default());

    let report = run.execute("widget").await.unwrap();
    // Both submissions plus the surviving comment
    assert_eq!(report.mention_count, 3);
}

#[tokio::test]
async fn test_narrative_partial_degradation() {
    let source = FakeSource::new(vec![submission("s1", "widget thoughts", 1, 1)]);
    let classifier = SentimentClassifier::new();
    let generator = FakeGenerator { block_summary: true };
    let run = MentionRun::new(
        &source,
        &classifier,
        Some(&generator as &dyn NarrativeGenerator),
        RunConfig::default(),
    );

    let report = run.execute("widget").await.unwrap();
    assert_eq!(report.llm_summary, None);
    assert_eq!(
        report.llm_key_themes,
        Some(vec!["Theme one".to_string(), "Theme two".to_string()])
    );
    let error = report.llm_error.unwrap();
    assert!(error.contains("summary"), "unexpected error: {}", error);
}

#[tokio::test]
async fn test_narrative_success_populates_both_fields() {
    let source = FakeSource::new(vec![submission("s1", "widget thoughts", 1, 1)]);
    let classifier = SentimentClassifier::new();
    let generator = FakeGenerator {
        block_summary: false,
    };
    let run = MentionRun::new(
        &source,
        &classifier,
        Some(&generator as &dyn NarrativeGenerator),
        RunConfig::default(),
    );

    let report = run.execute("widget").await.unwrap();
    assert_eq!(report.llm_summary.as_deref(), Some("A tidy summary."));
    assert!(report.llm_key_themes.is_some());
    assert_eq!(report.llm_error, None);
}

#[tokio::test]
async fn test_narrative_disabled_leaves_fields_null() {
    let source = FakeSource::new(vec![submission("s1", "widget thoughts", 1, 1)]);
    let classifier = SentimentClassifier::new();
    let run = MentionRun::new(&source, &classifier, None, RunConfig::default());

    let report = run.execute("widget").await.unwrap();
    assert_eq!(report.llm_summary, None);
    assert_eq!(report.llm_key_themes, None);
    assert_eq!(report.llm_error, None);
}
