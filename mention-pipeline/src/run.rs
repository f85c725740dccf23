//! Run orchestrator: composes search, filtering, extraction, aggregation,
//! report building, and optional narrative augmentation for one query.

use chrono::{Duration, Utc};
use mentionlens_core::{ContentSource, CoreError, Mention, MentionReport, NarrativeGenerator};
use sentiment_engine::SentimentClassifier;
use tracing::{info, warn};

use crate::aggregate::AggregateState;
use crate::extract::{extract_from_comment, extract_from_submission};
use crate::filter::RunFilter;
use crate::narrative::{self, build_corpus};
use crate::report::{build_report, ReportLimits};
use crate::RETENTION_WINDOW_DAYS;

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Max submissions fetched from the content source.
    pub search_limit: u32,
    /// Max collapsed reply threads expanded per submission.
    pub expand_limit: u32,
    pub retention_window: Duration,
    pub limits: ReportLimits,
    pub corpus_mentions: usize,
    pub corpus_max_chars: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            search_limit: 25,
            expand_limit: 10,
            retention_window: Duration::days(RETENTION_WINDOW_DAYS),
            limits: ReportLimits::default(),
            corpus_mentions: narrative::CORPUS_MAX_MENTIONS,
            corpus_max_chars: narrative::CORPUS_MAX_CHARS,
        }
    }
}

/// One aggregation run. All state is run-scoped; construct a new one per
/// request and discard it afterwards.
pub struct MentionRun<'a> {
    source: &'a dyn ContentSource,
    classifier: &'a SentimentClassifier,
    narrative_engine: Option<&'a dyn NarrativeGenerator>,
    config: RunConfig,
}

impl<'a> MentionRun<'a> {
    pub fn new(
        source: &'a dyn ContentSource,
        classifier: &'a SentimentClassifier,
        narrative_engine: Option<&'a dyn NarrativeGenerator>,
        config: RunConfig,
    ) -> Self {
        Self {
            source,
            classifier,
            narrative_engine,
            config,
        }
    }

    pub async fn execute(&self, search_term: &str) -> Result<MentionReport, CoreError> {
        let now = Utc::now();
        let mut filter = RunFilter::new(now, self.config.retention_window);
        let mut state = AggregateState::new();
        let mut mentions: Vec<Mention> = Vec::new();

        info!(
            "Searching for {:?} with submission limit {}",
            search_term, self.config.search_limit
        );
        let submissions = self
            .source
            .search(
                search_term,
                self.config.retention_window,
                self.config.search_limit,
            )
            .await?;

        for submission in &submissions {
            // A rejected submission (duplicate or out of window) is skipped
            // wholesale, replies included
            if !filter.accept(&submission.id, submission.created_utc) {
                continue;
            }
            filter.mark_processed(submission.id.clone());

            if let Some(mention) =
                extract_from_submission(submission, search_term, self.classifier)
            {
                state.accept(&mention);
                mentions.push(mention);
            }

            let comments = match self
                .source
                .expand_replies(submission, self.config.expand_limit)
                .await
            {
                Ok(comments) => comments,
                Err(e) => {
                    warn!(
                        "Skipping replies for submission {}: {}",
                        submission.id, e
                    );
                    continue;
                }
            };

            for comment in &comments {
                let derived_id = format!("c_{}", comment.id);
                if !filter.accept(&derived_id, comment.created_utc) {
                    continue;
                }
                filter.mark_processed(derived_id);

                if let Some(mention) =
                    extract_from_comment(comment, &submission.title, search_term, self.classifier)
                {
                    state.accept(&mention);
                    mentions.push(mention);
                }
            }
        }

        info!(
            "Run for {:?}: {} submissions fetched, {} mentions matched",
            search_term,
            submissions.len(),
            state.count
        );
        debug_assert!(
            state.count as usize == state.sentiment_scores.len(),
            "aggregate count drifted from sentiment scores"
        );

        // Corpus wants newest-first before the list is truncated for display
        mentions.sort_by(|a, b| b.created_utc.cmp(&a.created_utc));
        let corpus = build_corpus(
            &mentions,
            self.config.corpus_mentions,
            self.config.corpus_max_chars,
        );

        let mut report = build_report(search_term, state, mentions, &self.config.limits);

        if let Some(engine) = self.narrative_engine {
            let outcome = narrative::augment(engine, search_term, &corpus).await;
            report.llm_summary = outcome.summary;
            report.llm_key_themes = outcome.themes;
            report.llm_error = outcome.error;
        }

        Ok(report)
    }
}
