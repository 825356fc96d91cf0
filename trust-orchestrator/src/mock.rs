//! Canned collaborators for tests and local runs.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::classifier::{Classification, TrustClassifier, Verdict};
use crate::error::{ClassificationError, FetchError, LlmError, StoreError};
use crate::fetcher::ContentFetcher;
use crate::llm_client::{ChatCompletion, ChatMessage, ChatModel};
use crate::models::{Document, TokenUsage};
use crate::store::VerificationStore;
use crate::trust::TrustTier;

/// Serves fixed page text per URL; unknown URLs fail with a 404.
#[derive(Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    hanging: HashSet<String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, text: &str) -> Self {
        self.pages.insert(url.to_string(), text.to_string());
        self
    }

    /// Requests for `url` never complete on their own.
    pub fn with_hanging(mut self, url: &str) -> Self {
        self.hanging.insert(url.to_string());
        self
    }
}

#[async_trait]
impl ContentFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if self.hanging.contains(url) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        self.pages.get(url).cloned().ok_or(FetchError::Status(404))
    }
}

/// Returns a fixed classification per URL; unknown URLs are an error.
#[derive(Default)]
pub struct StaticClassifier {
    verdicts: HashMap<String, Classification>,
}

impl StaticClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verdict(mut self, url: &str, trusted: bool, analysis: &str, content: &str) -> Self {
        let (verdict, label) = if trusted {
            (Verdict::Trusted, "Trusted")
        } else {
            (Verdict::Untrusted, "Untrusted")
        };
        self.verdicts.insert(
            url.to_string(),
            Classification {
                verdict,
                label: label.to_string(),
                analysis: analysis.to_string(),
                content: content.to_string(),
            },
        );
        self
    }
}

#[async_trait]
impl TrustClassifier for StaticClassifier {
    async fn classify(&self, url: &str) -> Result<Classification, ClassificationError> {
        self.verdicts
            .get(url)
            .cloned()
            .ok_or_else(|| ClassificationError::Malformed(format!("no verdict for {}", url)))
    }
}

/// Answers every request with the same text and records what it was sent.
pub struct CannedChatModel {
    reply: String,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl CannedChatModel {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn last_request(&self) -> Option<Vec<ChatMessage>> {
        self.requests.lock().ok().and_then(|r| r.last().cloned())
    }
}

#[async_trait]
impl ChatModel for CannedChatModel {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatCompletion, LlmError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(messages.to_vec());
        }
        Ok(ChatCompletion {
            text: self.reply.clone(),
            usage: Some(TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
        })
    }
}

/// A store whose every call fails, for exercising fatal persistence paths.
pub struct UnavailableStore;

#[async_trait]
impl VerificationStore for UnavailableStore {
    async fn get(&self, _id: &str) -> Result<Option<Document>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn put(&self, _document: &Document) -> Result<(), StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn list_by_min_tier(&self, _tier: TrustTier) -> Result<Vec<(String, TrustTier)>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn list_all(&self) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }
}
