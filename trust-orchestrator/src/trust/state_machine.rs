//! Trust tier transitions.
//!
//! Every function here is pure: it takes the record as last read from the
//! store (or `None` for an unknown URL) plus the new signal, and returns the
//! record to write back. Automated signals can only move a document between
//! `Untrusted` and `MachineChecked`; once a human has elevated it to
//! `AiAssisted` or above, automated re-checks leave the tier alone.

use crate::models::Document;
use crate::trust::TrustTier;

/// Result of applying an automated classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub document: Document,
    /// The tier was kept because it was already human-elevated.
    pub preserved: bool,
}

fn automated_tier(verdict: bool) -> TrustTier {
    if verdict {
        TrustTier::MachineChecked
    } else {
        TrustTier::Untrusted
    }
}

pub fn apply_automated_classification(
    existing: Option<Document>,
    url: &str,
    verdict: bool,
    content: Option<String>,
    analysis: Option<String>,
) -> Transition {
    match existing {
        None => {
            let mut document = Document::new(url, automated_tier(verdict));
            document.query_count = 1;
            document.content = content;
            document.last_analysis = analysis;
            Transition {
                document,
                preserved: false,
            }
        }
        Some(mut document) => {
            let preserved = document.trust_tier.is_protected();
            if !preserved {
                document.trust_tier = automated_tier(verdict);
            }
            document.query_count = document.query_count.saturating_add(1);
            document.content = content;
            document.last_analysis = analysis;
            Transition { document, preserved }
        }
    }
}

/// A spot-check decision. Human judgment overrides any earlier state.
pub fn apply_manual_verification(existing: Option<Document>, url: &str, is_trusted: bool) -> Document {
    let tier = if is_trusted {
        TrustTier::AiAssisted
    } else {
        TrustTier::Untrusted
    };
    match existing {
        Some(mut document) => {
            document.trust_tier = tier;
            document
        }
        None => Document::new(url, tier),
    }
}

/// Direct manual elevation to `AiAssisted`. Never lowers a `HumanVerified` record.
pub fn apply_manual_registration(existing: Option<Document>, url: &str) -> Document {
    match existing {
        Some(mut document) => {
            document.trust_tier = document.trust_tier.max(TrustTier::AiAssisted);
            document
        }
        None => Document::new(url, TrustTier::AiAssisted),
    }
}
