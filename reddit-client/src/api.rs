//! Wire-level types for the Reddit listing API and their normalization into
//! the core schema. Everything past this module works with [`RawSubmission`]
//! and [`RawComment`] only.

use chrono::{DateTime, Utc};
use mentionlens_core::{RawComment, RawSubmission};
use serde::Deserialize;

pub const REDDIT_API_BASE: &str = "https://oauth.reddit.com";
pub const REDDIT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// Author name Reddit substitutes for deleted/suspended accounts.
const DELETED_AUTHOR: &str = "[deleted]";

#[derive(Debug, Clone, Deserialize)]
pub struct RedditListing<T> {
    pub data: RedditListingData<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditListingData<T> {
    pub children: Vec<RedditListingChild<T>>,
    #[serde(default)]
    pub after: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditListingChild<T> {
    pub kind: String,
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditSubmissionData {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    pub permalink: String,
    pub subreddit: String,
    #[serde(default)]
    pub score: i64,
    pub created_utc: f64,
    #[serde(default)]
    pub author: Option<String>,
}

/// Comment node from a `/comments/{article}` tree. `replies` is either an
/// empty string or a nested listing, so it stays a raw value until the tree
/// walk decides.
#[derive(Debug, Clone, Deserialize)]
pub struct RedditCommentData {
    pub id: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub replies: serde_json::Value,
}

/// `kind == "more"` stub: ids of collapsed children not present in the tree.
#[derive(Debug, Clone, Deserialize)]
pub struct RedditMoreData {
    #[serde(default)]
    pub children: Vec<String>,
}

/// Envelope of an `/api/morechildren` response.
#[derive(Debug, Clone, Deserialize)]
pub struct MoreChildrenResponse {
    pub json: MoreChildrenJson,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoreChildrenJson {
    pub data: MoreChildrenData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoreChildrenData {
    #[serde(default)]
    pub things: Vec<RedditListingChild<serde_json::Value>>,
}

fn timestamp_from_epoch(created_utc: f64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(created_utc as i64, 0).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

fn normalize_author(author: Option<String>) -> Option<String> {
    author.filter(|name| !name.is_empty() && name != DELETED_AUTHOR)
}

impl From<RedditSubmissionData> for RawSubmission {
    fn from(data: RedditSubmissionData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            selftext: if data.selftext.is_empty() {
                None
            } else {
                Some(data.selftext)
            },
            permalink: data.permalink,
            subreddit: data.subreddit,
            score: data.score,
            created_utc: timestamp_from_epoch(data.created_utc),
            author: normalize_author(data.author),
        }
    }
}

impl From<RedditCommentData> for RawComment {
    fn from(data: RedditCommentData) -> Self {
        Self {
            id: data.id,
            body: data.body,
            permalink: data.permalink,
            subreddit: data.subreddit,
            score: data.score,
            created_utc: timestamp_from_epoch(data.created_utc),
            author: normalize_author(data.author),
        }
    }
}

/// Walk a comment listing, collecting comment nodes depth-first and the ids
/// of any `more` stubs encountered. Nesting depth is irrelevant to matching,
/// so the output is flat.
pub fn flatten_comment_tree(
    listing: &serde_json::Value,
    comments: &mut Vec<RedditCommentData>,
    more_ids: &mut Vec<String>,
) {
    let Some(children) = listing
        .get("data")
        .and_then(|data| data.get("children"))
        .and_then(|children| children.as_array())
    else {
        return;
    };

    for child in children {
        let kind = child.get("kind").and_then(|k| k.as_str()).unwrap_or("");
        let Some(data) = child.get("data") else {
            continue;
        };

        match kind {
            "t1" => {
                if let Ok(comment) = serde_json::from_value::<RedditCommentData>(data.clone()) {
                    let replies = comment.replies.clone();
                    comments.push(comment);
                    if replies.is_object() {
                        flatten_comment_tree(&replies, comments, more_ids);
                    }
                }
            }
            "more" => {
                if let Ok(more) = serde_json::from_value::<RedditMoreData>(data.clone()) {
                    more_ids.extend(more.children);
                }
            }
            _ => {}
        }
    }
}
