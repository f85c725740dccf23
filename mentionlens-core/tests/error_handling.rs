use mentionlens_core::{
    ConfigError, CoreError, ErrorExt, LlmError, MentionKind, OverallSentiment, RedditApiError,
    SentimentLabel,
};
use std::time::Duration;

#[test]
fn test_error_codes() {
    let reddit_error = CoreError::RedditApi(RedditApiError::InvalidToken);
    assert_eq!(reddit_error.error_code(), "REDDIT_API");

    let llm_error = CoreError::Llm(LlmError::NotConfigured);
    assert_eq!(llm_error.error_code(), "LLM");

    let config_error = CoreError::Config(ConfigError::MissingEnvironmentVariable {
        var_name: "REDDIT_CLIENT_ID".to_string(),
    });
    assert_eq!(config_error.error_code(), "CONFIG");

    let input_error = CoreError::InvalidInput {
        message: "empty term".to_string(),
    };
    assert_eq!(input_error.error_code(), "INVALID_INPUT");
}

#[test]
fn test_retryable_errors() {
    let retryable =
        CoreError::RedditApi(RedditApiError::RateLimitExceeded { retry_after: 60 });
    assert!(retryable.is_retryable());

    let server_error = CoreError::RedditApi(RedditApiError::ServerError { status_code: 502 });
    assert!(server_error.is_retryable());

    let auth_error = CoreError::RedditApi(RedditApiError::InvalidToken);
    assert!(!auth_error.is_retryable());

    let config_error = CoreError::Config(ConfigError::MissingEnvironmentVariable {
        var_name: "REDDIT_CLIENT_SECRET".to_string(),
    });
    assert!(!config_error.is_retryable());

    // Content blocks are a provider decision, not a transient fault
    let blocked = CoreError::Llm(LlmError::ContentBlocked {
        reason: "SAFETY".to_string(),
    });
    assert!(!blocked.is_retryable());
}

#[test]
fn test_retry_after() {
    let rate_limit_error =
        CoreError::RedditApi(RedditApiError::RateLimitExceeded { retry_after: 60 });
    assert_eq!(
        rate_limit_error.retry_after(),
        Some(Duration::from_secs(60))
    );

    let timeout_error = CoreError::RedditApi(RedditApiError::RequestTimeout);
    assert_eq!(timeout_error.retry_after(), Some(Duration::from_secs(5)));

    let input_error = CoreError::InvalidInput {
        message: "bad payload".to_string(),
    };
    assert_eq!(input_error.retry_after(), None);
}

#[test]
fn test_label_wire_casing() {
    assert_eq!(
        serde_json::to_string(&SentimentLabel::Positive).unwrap(),
        "\"positive\""
    );
    assert_eq!(
        serde_json::to_string(&OverallSentiment::Mixed).unwrap(),
        "\"mixed\""
    );
    assert_eq!(
        serde_json::to_string(&MentionKind::Comment).unwrap(),
        "\"comment\""
    );
}
