use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Postgres connection string; the in-memory store is used when unset.
    pub database_url: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub chat_model: String,
    pub classifier_url: String,
    pub fetch_timeout_secs: u64,
    pub classify_timeout_secs: u64,
    pub llm_timeout_secs: u64,
    pub max_concurrent_fetches: usize,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_source(config::Environment::default().try_parsing(true))
    }

    /// Layers `source` over the built-in defaults.
    pub fn from_source(source: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("port", 8080)?
            .set_default("openai_base_url", "https://api.openai.com/v1")?
            .set_default("chat_model", "gpt-4-turbo")?
            .set_default("classifier_url", "http://localhost:5000/api/query")?
            .set_default("fetch_timeout_secs", 5)?
            .set_default("classify_timeout_secs", 30)?
            .set_default("llm_timeout_secs", 60)?
            .set_default("max_concurrent_fetches", 8)?
            .set_default("log_level", "info")?
            .add_source(source)
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn classify_timeout(&self) -> Duration {
        Duration::from_secs(self.classify_timeout_secs)
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }
}
