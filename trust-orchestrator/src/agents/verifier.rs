// Verifier Agent: moves documents between trust tiers

use std::sync::Arc;

use tracing::info;

use crate::classifier::{Classification, TrustClassifier};
use crate::error::VerificationError;
use crate::metrics;
use crate::models::Document;
use crate::store::VerificationStore;
use crate::trust::{self, TrustTier};

#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub document: Document,
    pub is_trusted: bool,
    pub preserved: bool,
}

/// Runs the verification workflows: automated checks, spot checks, and
/// manual decisions. Each is a single read-transition-write against the
/// store; concurrent writers to the same URL are last-writer-wins.
pub struct VerifierAgent {
    store: Arc<dyn VerificationStore>,
    classifier: Arc<dyn TrustClassifier>,
}

impl VerifierAgent {
    pub fn new(store: Arc<dyn VerificationStore>, classifier: Arc<dyn TrustClassifier>) -> Self {
        Self { store, classifier }
    }

    /// Classifies `url` and records the automated verdict.
    pub async fn check(&self, url: &str) -> Result<CheckOutcome, VerificationError> {
        let classification = self.classifier.classify(url).await?;
        let is_trusted = classification.verdict.is_trusted();

        let existing = self.store.get(url).await?;
        let transition = trust::apply_automated_classification(
            existing,
            url,
            is_trusted,
            Some(classification.content).filter(|c| !c.trim().is_empty()),
            Some(classification.analysis),
        );
        self.store.put(&transition.document).await?;

        record_transition("automated", transition.document.trust_tier);
        info!(
            url,
            is_trusted,
            tier = %transition.document.trust_tier,
            preserved = transition.preserved,
            query_count = transition.document.query_count,
            "Verifier: Recorded automated classification"
        );

        Ok(CheckOutcome {
            document: transition.document,
            is_trusted,
            preserved: transition.preserved,
        })
    }

    /// Classifies `url` for human review without touching the store.
    pub async fn spot_check(&self, url: &str) -> Result<Classification, VerificationError> {
        let classification = self.classifier.classify(url).await?;
        info!(url, label = %classification.label, "Verifier: Spot check analysis ready");
        Ok(classification)
    }

    /// Applies a human spot-check decision.
    pub async fn decide(&self, url: &str, is_trusted: bool) -> Result<Document, VerificationError> {
        let existing = self.store.get(url).await?;
        let document = trust::apply_manual_verification(existing, url, is_trusted);
        self.store.put(&document).await?;

        record_transition("manual", document.trust_tier);
        info!(url, is_trusted, tier = %document.trust_tier, "Verifier: Recorded human decision");
        Ok(document)
    }

    /// Marks `url` as verified without an AI check.
    pub async fn register(&self, url: &str) -> Result<Document, VerificationError> {
        let existing = self.store.get(url).await?;
        let document = trust::apply_manual_registration(existing, url);
        self.store.put(&document).await?;

        record_transition("registration", document.trust_tier);
        info!(url, tier = %document.trust_tier, "Verifier: Registered manually verified source");
        Ok(document)
    }
}

fn record_transition(kind: &str, tier: TrustTier) {
    let level = tier.level().to_string();
    metrics::TRANSITIONS.with_label_values(&[kind, level.as_str()]).inc();
}
