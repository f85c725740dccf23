#[cfg(test)]
mod tests {
    use crate::{time_filter_for, RedditClient, RedditClientConfig, RedditToken};
    use std::time::{Duration, SystemTime};

    fn create_test_config() -> RedditClientConfig {
        RedditClientConfig {
            client_id: "test_client_id".to_string(),
            client_secret: "test_client_secret".to_string(),
            user_agent: "mentionlens/0.1 by test_user".to_string(),
        }
    }

    #[test]
    fn test_client_creation() {
        let client = RedditClient::new(create_test_config());
        assert!(client.is_ok());
    }

    #[test]
    fn test_token_refresh_margin() {
        let fresh = RedditToken {
            access_token: "tok".to_string(),
            expires_at: SystemTime::now() + Duration::from_secs(3600),
        };
        assert!(!fresh.needs_refresh());

        // Inside the 60 s refresh margin
        let nearly_expired = RedditToken {
            access_token: "tok".to_string(),
            expires_at: SystemTime::now() + Duration::from_secs(30),
        };
        assert!(nearly_expired.needs_refresh());

        let expired = RedditToken {
            access_token: "tok".to_string(),
            expires_at: SystemTime::now() - Duration::from_secs(10),
        };
        assert!(expired.needs_refresh());
    }

    #[test]
    fn test_time_filter_mapping() {
        assert_eq!(time_filter_for(chrono::Duration::hours(12)), "day");
        assert_eq!(time_filter_for(chrono::Duration::days(7)), "week");
        assert_eq!(time_filter_for(chrono::Duration::days(30)), "month");
        assert_eq!(time_filter_for(chrono::Duration::days(90)), "year");
    }
}
