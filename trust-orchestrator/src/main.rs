use std::sync::Arc;

use tracing::{info, warn};
use warp::Filter;

use trust_orchestrator::agents::AggregatorConfig;
use trust_orchestrator::api::{self, AppState};
use trust_orchestrator::classifier::HttpClassifier;
use trust_orchestrator::config::Config;
use trust_orchestrator::db::{self, PgStore};
use trust_orchestrator::fetcher::HttpFetcher;
use trust_orchestrator::llm_client::OpenAiChat;
use trust_orchestrator::middleware;
use trust_orchestrator::store::{MemoryStore, VerificationStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!("Starting trust-tiered context orchestrator");

    let store: Arc<dyn VerificationStore> = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url).await?;
            info!("Database connection pool created");
            db::run_migrations(&pool).await?;
            info!("Database migrations applied");
            Arc::new(PgStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory verification store");
            Arc::new(MemoryStore::new())
        }
    };

    if config.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY not set, chat requests will fail");
    }

    let fetcher = Arc::new(HttpFetcher::new(config.fetch_timeout())?);
    let classifier = Arc::new(HttpClassifier::new(
        config.classifier_url.clone(),
        config.classify_timeout(),
    )?);
    let model = Arc::new(OpenAiChat::new(
        config.openai_base_url.clone(),
        config.openai_api_key.clone(),
        config.chat_model.clone(),
        config.llm_timeout(),
    )?);

    let state = AppState::new(
        store,
        fetcher,
        classifier,
        model,
        AggregatorConfig {
            fetch_timeout: config.fetch_timeout(),
            max_concurrency: config.max_concurrent_fetches,
        },
    );

    let routes = api::service(state)
        .with(warp::log("api"))
        .with(middleware::cors());

    // Start server
    let addr = ([0, 0, 0, 0], config.port);
    info!("Server listening on {}", addr.1);

    warp::serve(routes).run(addr).await;

    Ok(())
}
