//! Match/no-match decisions and mention construction. Submissions and
//! comments are separate stages so each is testable without pagination.

use mentionlens_core::{Mention, MentionKind, RawComment, RawSubmission};
use sentiment_engine::SentimentClassifier;

/// Display titles for comment mentions truncate the parent title to this
/// many characters.
pub const COMMENT_TITLE_MAX_CHARS: usize = 100;

const REDDIT_URL_BASE: &str = "https://reddit.com";

/// Match a submission against the search term over its title or body. The
/// exact text that was searched is the exact text scored: the title always
/// participates, the body joins only when it matched too.
pub fn extract_from_submission(
    submission: &RawSubmission,
    search_term: &str,
    classifier: &SentimentClassifier,
) -> Option<Mention> {
    let term = search_term.to_lowercase();
    let title_matched = submission.title.to_lowercase().contains(&term);
    let body_matched = submission
        .selftext
        .as_ref()
        .is_some_and(|body| body.to_lowercase().contains(&term));

    if !title_matched && !body_matched {
        return None;
    }

    let mut text_for_sentiment = submission.title.clone();
    if body_matched {
        if let Some(body) = &submission.selftext {
            text_for_sentiment.push(' ');
            text_for_sentiment.push_str(body);
        }
    }
    let reading = classifier.classify(&text_for_sentiment);

    Some(Mention {
        id: submission.id.clone(),
        kind: MentionKind::Submission,
        title: submission.title.clone(),
        body: submission.selftext.clone(),
        url: format!("{}{}", REDDIT_URL_BASE, submission.permalink),
        subreddit: submission.subreddit.clone(),
        score: submission.score,
        created_utc: submission.created_utc,
        author: submission.author.clone(),
        sentiment_score: reading.score,
        sentiment_label: reading.label,
    })
}

/// Match a comment against the search term over its body only. The display
/// title points back at the parent submission.
pub fn extract_from_comment(
    comment: &RawComment,
    parent_title: &str,
    search_term: &str,
    classifier: &SentimentClassifier,
) -> Option<Mention> {
    let term = search_term.to_lowercase();
    if !comment.body.to_lowercase().contains(&term) {
        return None;
    }

    let reading = classifier.classify(&comment.body);

    Some(Mention {
        id: format!("c_{}", comment.id),
        kind: MentionKind::Comment,
        title: comment_display_title(parent_title),
        body: Some(comment.body.clone()),
        url: format!("{}{}", REDDIT_URL_BASE, comment.permalink),
        subreddit: comment.subreddit.clone(),
        score: comment.score,
        created_utc: comment.created_utc,
        author: comment.author.clone(),
        sentiment_score: reading.score,
        sentiment_label: reading.label,
    })
}

fn comment_display_title(parent_title: &str) -> String {
    let truncated: String = parent_title.chars().take(COMMENT_TITLE_MAX_CHARS).collect();
    if parent_title.chars().count() > COMMENT_TITLE_MAX_CHARS {
        format!("Comment in: {}...", truncated)
    } else {
        format!("Comment in: {}", truncated)
    }
}
