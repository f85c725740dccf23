use crate::error::ConfigError;

const DEFAULT_USER_AGENT: &str = "mentionlens/0.1 (by /u/mentionlens)";
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Application configuration loaded from environment variables. Holds only
/// secrets and env-specific tunables; pipeline constants live with the
/// pipeline.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // Reddit (app-only OAuth)
    pub reddit_client_id: String,
    pub reddit_client_secret: String,
    pub reddit_user_agent: String,
    /// Max submissions fetched per run. Fetching comments for many posts is
    /// slow, so this is deliberately small.
    pub reddit_search_limit: u32,
    /// Max collapsed comment threads expanded per submission.
    pub reddit_expand_limit: u32,

    // Narrative engine; absent key disables summarization and Q&A
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,

    // HTTP surface
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Self {
            reddit_client_id: require("REDDIT_CLIENT_ID")?,
            reddit_client_secret: require("REDDIT_CLIENT_SECRET")?,
            reddit_user_agent: std::env::var("REDDIT_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
            reddit_search_limit: parse_var("REDDIT_SEARCH_LIMIT", 25)?,
            reddit_expand_limit: parse_var("REDDIT_EXPAND_LIMIT", 10)?,
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|v| !v.is_empty()),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            port: parse_var("MENTIONLENS_PORT", 8000)?,
        };

        config.log_keys();
        Ok(config)
    }

    fn log_keys(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  REDDIT_CLIENT_ID: {}", preview(&self.reddit_client_id));
        tracing::info!(
            "  GEMINI_API_KEY: {}",
            match &self.gemini_api_key {
                Some(key) => preview(key),
                None => "<not set, narrative features disabled>".to_string(),
            }
        );
        tracing::info!("  REDDIT_SEARCH_LIMIT: {}", self.reddit_search_limit);
        tracing::info!("  REDDIT_EXPAND_LIMIT: {}", self.reddit_expand_limit);
    }
}

/// Loggable preview of a secret: first few characters plus the length.
/// Truncates on characters, not bytes, so multibyte values cannot panic.
fn preview(val: &str) -> String {
    let head: String = val.chars().take(5).collect();
    format!("{}...({} chars)", head, val.len())
}

fn require(var_name: &str) -> Result<String, ConfigError> {
    std::env::var(var_name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingEnvironmentVariable {
            var_name: var_name.to_string(),
        })
}

fn parse_var<T: std::str::FromStr>(var_name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var_name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            field: var_name.to_string(),
            value: raw,
        }),
        Err(_) => Ok(default),
    }
}
