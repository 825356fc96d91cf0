// Retriever Agent: gathers source content and buckets it by trust tier

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::error::{ContextError, FetchError, StoreError};
use crate::fetcher::ContentFetcher;
use crate::metrics;
use crate::models::Document;
use crate::store::VerificationStore;
use crate::trust::TrustTier;

pub const NO_CONTEXT: &str = "No context provided.";

const UNCHECKED_HEADING: &str = "UNCHECKED SOURCES";
const UNCHECKED_LABEL: &str = "Unchecked Source";

/// Resolved content grouped by where it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierBuckets {
    pub unchecked: Vec<String>,
    pub tiers: [Vec<String>; 4],
}

impl TierBuckets {
    pub fn push_trusted(&mut self, tier: TrustTier, content: String) {
        self.tiers[tier.level() as usize].push(content);
    }

    pub fn tier(&self, tier: TrustTier) -> &[String] {
        &self.tiers[tier.level() as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.unchecked.is_empty() && self.tiers.iter().all(Vec::is_empty)
    }

    /// Renders the labeled context block. Empty sections are omitted.
    pub fn render(&self) -> String {
        let mut sections = Vec::new();
        if !self.unchecked.is_empty() {
            sections.push(render_section(UNCHECKED_HEADING, UNCHECKED_LABEL, &self.unchecked));
        }
        for tier in TrustTier::ALL {
            let entries = self.tier(tier);
            if !entries.is_empty() {
                sections.push(render_section(tier.section_heading(), tier.entry_label(), entries));
            }
        }

        if sections.is_empty() {
            NO_CONTEXT.to_string()
        } else {
            sections.join("\n\n")
        }
    }
}

fn render_section(heading: &str, label: &str, entries: &[String]) -> String {
    let body = entries
        .iter()
        .enumerate()
        .map(|(i, content)| format!("[{} {}]:\n{}", label, i + 1, content))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("{}:\n{}", heading, body)
}

#[derive(Debug, Clone)]
pub struct ContextBundle {
    pub text: String,
    /// Whether the caller supplied any sources, regardless of what resolved.
    pub has_context: bool,
    pub buckets: TierBuckets,
}

impl ContextBundle {
    /// Sources were requested but none produced content.
    pub fn is_unavailable(&self) -> bool {
        self.has_context && self.buckets.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AggregatorConfig {
    pub fetch_timeout: Duration,
    pub max_concurrency: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(5),
            max_concurrency: 8,
        }
    }
}

pub struct ContextAggregator {
    store: Arc<dyn VerificationStore>,
    fetcher: Arc<dyn ContentFetcher>,
    config: AggregatorConfig,
}

impl ContextAggregator {
    pub fn new(
        store: Arc<dyn VerificationStore>,
        fetcher: Arc<dyn ContentFetcher>,
        config: AggregatorConfig,
    ) -> Self {
        Self { store, fetcher, config }
    }

    fn concurrency(&self) -> usize {
        self.config.max_concurrency.max(1)
    }

    /// Resolves every source and renders the tier-labeled context.
    ///
    /// Unknown trusted ids and unfetchable untrusted URLs are skipped. A
    /// trusted record without content, or a store failure, aborts the whole
    /// aggregation.
    pub async fn aggregate(
        &self,
        trusted_ids: &[String],
        untrusted_urls: &[String],
    ) -> Result<ContextBundle, ContextError> {
        let has_context = !trusted_ids.is_empty() || !untrusted_urls.is_empty();
        info!(
            trusted = trusted_ids.len(),
            untrusted = untrusted_urls.len(),
            "Retriever: Gathering context"
        );

        // A fatal trusted-side error drops the in-flight fetches.
        let resolved = tokio::try_join!(self.resolve_trusted(trusted_ids), async {
            Ok::<_, ContextError>(self.resolve_untrusted(untrusted_urls).await)
        });
        let (trusted, unchecked) = match resolved {
            Ok(resolved) => resolved,
            Err(e) => {
                metrics::AGGREGATIONS.with_label_values(&[e.kind()]).inc();
                return Err(e);
            }
        };

        let mut buckets = TierBuckets {
            unchecked,
            ..TierBuckets::default()
        };
        for (tier, content) in trusted {
            buckets.push_trusted(tier, content);
        }

        let text = buckets.render();
        let outcome = if buckets.is_empty() { "empty" } else { "ok" };
        metrics::AGGREGATIONS.with_label_values(&[outcome]).inc();

        Ok(ContextBundle {
            text,
            has_context,
            buckets,
        })
    }

    async fn resolve_trusted(&self, ids: &[String]) -> Result<Vec<(TrustTier, String)>, ContextError> {
        let lookups: Vec<Result<Option<Document>, StoreError>> = stream::iter(ids.iter().cloned())
            .map(|id| async move { self.store.get(&id).await })
            .buffered(self.concurrency())
            .collect()
            .await;

        let mut resolved = Vec::with_capacity(ids.len());
        for (id, lookup) in ids.iter().zip(lookups) {
            match lookup? {
                None => {
                    debug!(id = %id, "Trusted id not in store, skipping");
                    metrics::SOURCES.with_label_values(&["trusted", "absent"]).inc();
                }
                Some(doc) => match doc.usable_content() {
                    Some(content) => {
                        metrics::SOURCES.with_label_values(&["trusted", "resolved"]).inc();
                        resolved.push((doc.trust_tier, content.to_string()));
                    }
                    None => {
                        warn!(id = %id, tier = %doc.trust_tier, "Trusted record has no content");
                        return Err(ContextError::MissingContent { id: id.clone() });
                    }
                },
            }
        }
        Ok(resolved)
    }

    async fn resolve_untrusted(&self, urls: &[String]) -> Vec<String> {
        let timeout = self.config.fetch_timeout;
        let fetched: Vec<(String, Result<String, FetchError>)> = stream::iter(urls.iter().cloned())
            .map(|url| async move {
                let outcome = match tokio::time::timeout(timeout, self.fetcher.fetch(&url)).await {
                    Ok(result) => result,
                    Err(_) => Err(FetchError::Timeout(timeout)),
                };
                (url, outcome)
            })
            .buffered(self.concurrency())
            .collect()
            .await;

        let mut contents = Vec::with_capacity(fetched.len());
        for (url, outcome) in fetched {
            match outcome {
                Ok(text) if !text.trim().is_empty() => {
                    metrics::SOURCES.with_label_values(&["unchecked", "resolved"]).inc();
                    contents.push(text);
                }
                Ok(_) => {
                    warn!(url = %url, "Unchecked source produced no text, skipping");
                    metrics::SOURCES.with_label_values(&["unchecked", "failed"]).inc();
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Error fetching unchecked source, skipping");
                    metrics::SOURCES.with_label_values(&["unchecked", "failed"]).inc();
                }
            }
        }
        contents
    }
}
