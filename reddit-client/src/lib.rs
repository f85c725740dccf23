//! Application-only Reddit client: client-credentials token management,
//! keyword search over `r/all` with cursor pagination, and bounded
//! comment-tree expansion.

pub mod api;
pub mod retry;
mod tests;

use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use mentionlens_core::{
    ContentSource, CoreError, RawComment, RawSubmission, RedditApiError,
};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use api::{
    flatten_comment_tree, MoreChildrenResponse, RedditCommentData, RedditListing,
    RedditSubmissionData, REDDIT_API_BASE, REDDIT_TOKEN_URL,
};
use retry::{with_retry, RetryConfig};

/// Reddit caps listing pages at 100 items regardless of the requested limit.
const MAX_PAGE_SIZE: u32 = 100;

/// Refresh the token this long before it actually expires.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct RedditToken {
    access_token: String,
    expires_at: SystemTime,
}

impl RedditToken {
    fn needs_refresh(&self) -> bool {
        SystemTime::now() + TOKEN_EXPIRY_MARGIN >= self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Clone)]
pub struct RedditClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

pub struct RedditClient {
    http_client: Client,
    config: RedditClientConfig,
    token: Mutex<Option<RedditToken>>,
    retry_config: RetryConfig,
}

impl RedditClient {
    pub fn new(config: RedditClientConfig) -> Result<Self, CoreError> {
        let http_client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(CoreError::Network)?;

        Ok(Self {
            http_client,
            config,
            token: Mutex::new(None),
            retry_config: RetryConfig::reddit(),
        })
    }

    /// Return a valid access token, fetching a fresh one via the
    /// client-credentials grant when the cached token is absent or near
    /// expiry.
    async fn access_token(&self) -> Result<String, CoreError> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref() {
            if !token.needs_refresh() {
                return Ok(token.access_token.clone());
            }
        }

        debug!("Requesting app-only Reddit token");
        let response = self
            .http_client
            .post(REDDIT_TOKEN_URL)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CoreError::RedditApi(RedditApiError::RequestTimeout)
                } else {
                    CoreError::Network(e)
                }
            })?;

        if !response.status().is_success() {
            return Err(CoreError::RedditApi(RedditApiError::AuthenticationFailed {
                reason: format!("token endpoint returned {}", response.status()),
            }));
        }

        let token_response: TokenResponse = response.json().await.map_err(|_| {
            CoreError::RedditApi(RedditApiError::InvalidResponse {
                details: "Failed to parse token response".to_string(),
            })
        })?;

        let token = RedditToken {
            access_token: token_response.access_token.clone(),
            expires_at: SystemTime::now() + Duration::from_secs(token_response.expires_in),
        };
        *guard = Some(token);
        info!("Obtained Reddit access token");
        Ok(token_response.access_token)
    }

    /// Issue an authenticated GET, mapping HTTP failures into the typed
    /// error taxonomy.
    async fn get_json(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
    ) -> Result<serde_json::Value, CoreError> {
        let access_token = self.access_token().await?;
        let url = format!("{}{}", REDDIT_API_BASE, endpoint);

        debug!("Reddit API request: GET {}", endpoint);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&access_token)
            .query(query_params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CoreError::RedditApi(RedditApiError::RequestTimeout)
                } else {
                    CoreError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status {
                StatusCode::UNAUTHORIZED => CoreError::RedditApi(RedditApiError::InvalidToken),
                StatusCode::FORBIDDEN => CoreError::RedditApi(RedditApiError::Forbidden {
                    resource: endpoint.to_string(),
                }),
                StatusCode::TOO_MANY_REQUESTS => {
                    let retry_after = response
                        .headers()
                        .get("retry-after")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(60);
                    warn!("Rate limited, retry after {} seconds", retry_after);
                    CoreError::RedditApi(RedditApiError::RateLimitExceeded { retry_after })
                }
                s if s.is_server_error() => CoreError::RedditApi(RedditApiError::ServerError {
                    status_code: s.as_u16(),
                }),
                s => CoreError::RedditApi(RedditApiError::InvalidResponse {
                    details: format!("unexpected status {} for {}", s, endpoint),
                }),
            });
        }

        response.json().await.map_err(|_| {
            CoreError::RedditApi(RedditApiError::InvalidResponse {
                details: format!("Failed to parse response for {}", endpoint),
            })
        })
    }

    async fn search_page(
        &self,
        term: &str,
        time_filter: &str,
        page_size: u32,
        after: Option<&str>,
    ) -> Result<RedditListing<RedditSubmissionData>, CoreError> {
        let page_size_str = page_size.to_string();
        let mut params = vec![
            ("q", term),
            ("sort", "new"),
            ("t", time_filter),
            ("limit", page_size_str.as_str()),
        ];
        if let Some(cursor) = after {
            params.push(("after", cursor));
        }

        let value = self.get_json("/r/all/search", &params).await?;
        serde_json::from_value(value).map_err(|_| {
            CoreError::RedditApi(RedditApiError::InvalidResponse {
                details: "Failed to parse search listing".to_string(),
            })
        })
    }

    /// Fetch comments omitted from the tree as `more` stubs. Returns them
    /// flat; `/api/morechildren` does not nest.
    async fn fetch_more_children(
        &self,
        submission_id: &str,
        child_ids: &[String],
    ) -> Result<Vec<RedditCommentData>, CoreError> {
        let link_id = format!("t3_{}", submission_id);
        let children = child_ids.join(",");
        let params = [
            ("api_type", "json"),
            ("link_id", link_id.as_str()),
            ("children", children.as_str()),
        ];

        let value = self.get_json("/api/morechildren", &params).await?;
        let parsed: MoreChildrenResponse = serde_json::from_value(value).map_err(|_| {
            CoreError::RedditApi(RedditApiError::InvalidResponse {
                details: "Failed to parse morechildren response".to_string(),
            })
        })?;

        Ok(parsed
            .json
            .data
            .things
            .into_iter()
            .filter(|thing| thing.kind == "t1")
            .filter_map(|thing| serde_json::from_value(thing.data).ok())
            .collect())
    }
}

/// Map a trailing window to Reddit's coarse `t=` search filter.
fn time_filter_for(within: chrono::Duration) -> &'static str {
    if within <= chrono::Duration::days(1) {
        "day"
    } else if within <= chrono::Duration::days(7) {
        "week"
    } else if within <= chrono::Duration::days(31) {
        "month"
    } else {
        "year"
    }
}

#[async_trait]
impl ContentSource for RedditClient {
    async fn search(
        &self,
        term: &str,
        within: chrono::Duration,
        limit: u32,
    ) -> Result<Vec<RawSubmission>, CoreError> {
        let time_filter = time_filter_for(within);
        let mut submissions: Vec<RawSubmission> = Vec::new();
        let mut after: Option<String> = None;

        while (submissions.len() as u32) < limit {
            let remaining = limit - submissions.len() as u32;
            let page_size = remaining.min(MAX_PAGE_SIZE);
            let cursor = after.clone();

            let listing = with_retry(&self.retry_config, "search page", || {
                self.search_page(term, time_filter, page_size, cursor.as_deref())
            })
            .await?;

            let page_len = listing.data.children.len();
            submissions.extend(
                listing
                    .data
                    .children
                    .into_iter()
                    .map(|child| child.data.into()),
            );
            debug!("Fetched search page of {} submissions", page_len);

            after = listing.data.after;
            if after.is_none() || page_len == 0 {
                break;
            }
        }

        submissions.truncate(limit as usize);
        info!(
            "Search for {:?} returned {} submissions",
            term,
            submissions.len()
        );
        Ok(submissions)
    }

    async fn expand_replies(
        &self,
        submission: &RawSubmission,
        max_expansions: u32,
    ) -> Result<Vec<RawComment>, CoreError> {
        let endpoint = format!("/comments/{}", submission.id);
        let params = [("limit", "500")];
        let value = with_retry(&self.retry_config, "comment tree", || {
            self.get_json(&endpoint, &params)
        })
        .await?;

        // The endpoint returns [submission listing, comment listing]
        let comment_listing = value.get(1).ok_or_else(|| {
            CoreError::RedditApi(RedditApiError::InvalidResponse {
                details: format!("comment response for {} is not a pair", submission.id),
            })
        })?;

        let mut comment_data = Vec::new();
        let mut more_ids = Vec::new();
        flatten_comment_tree(comment_listing, &mut comment_data, &mut more_ids);

        // Each morechildren call resolves one batch of collapsed ids; the cap
        // bounds how many batches we are willing to pay for.
        let mut expansions = 0;
        while expansions < max_expansions && !more_ids.is_empty() {
            let batch_len = more_ids.len().min(100);
            let batch: Vec<String> = more_ids.drain(..batch_len).collect();
            match self.fetch_more_children(&submission.id, &batch).await {
                Ok(expanded) => comment_data.extend(expanded),
                Err(e) => {
                    warn!(
                        "Skipping collapsed thread batch for {}: {}",
                        submission.id, e
                    );
                    break;
                }
            }
            expansions += 1;
        }

        debug!(
            "Expanded {} comments for submission {} ({} collapsed ids left)",
            comment_data.len(),
            submission.id,
            more_ids.len()
        );
        Ok(comment_data.into_iter().map(RawComment::from).collect())
    }
}
