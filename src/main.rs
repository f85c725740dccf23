use std::sync::Arc;

use mention_pipeline::RunConfig;
use mentionlens_core::AppConfig;
use reddit_client::{RedditClient, RedditClientConfig};
use sentiment_engine::SentimentClassifier;
use server::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting MentionLens - Reddit Mention Tracker");

    let config = AppConfig::from_env()?;

    // The VADER lexicon is parsed once here; requests reuse the classifier
    let classifier = SentimentClassifier::new();

    let content_source = Arc::new(RedditClient::new(RedditClientConfig {
        client_id: config.reddit_client_id.clone(),
        client_secret: config.reddit_client_secret.clone(),
        user_agent: config.reddit_user_agent.clone(),
    })?);

    let narrative_engine = match &config.gemini_api_key {
        Some(api_key) => {
            let client =
                llm_interface::GeminiClient::new(api_key.clone(), config.gemini_model.clone())?;
            Some(Arc::new(client) as Arc<dyn mentionlens_core::NarrativeGenerator>)
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not set; narrative summarization and Q&A disabled");
            None
        }
    };

    let run_config = RunConfig {
        search_limit: config.reddit_search_limit,
        expand_limit: config.reddit_expand_limit,
        ..RunConfig::default()
    };

    let state = Arc::new(AppState::new(
        classifier,
        content_source,
        narrative_engine,
        run_config,
    ));
    let app = server::build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("MentionLens server listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
