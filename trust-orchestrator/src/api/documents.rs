use percent_encoding::percent_decode_str;
use tracing::info;
use warp::{Rejection, Reply};

use crate::api::AppState;
use crate::error::{reject, ApiError, ValidationError};
use crate::models::{LevelQuery, TrustedDocSummary, TrustedDocView, UrlQuery};
use crate::trust::TrustTier;
use crate::validation::require_url;

pub async fn handle_list_documents(state: AppState) -> Result<impl Reply, Rejection> {
    let documents = state.store.list_all().await.map_err(reject)?;
    Ok(warp::reply::json(&documents))
}

pub async fn handle_get_document(raw_id: String, state: AppState) -> Result<impl Reply, Rejection> {
    let id = percent_decode_str(&raw_id)
        .decode_utf8()
        .map_err(|_| reject(ValidationError::malformed("id", "document id is not valid UTF-8")))?
        .into_owned();
    info!(id = %id, "Fetching document");

    match state.store.get(&id).await.map_err(reject)? {
        Some(document) => Ok(warp::reply::json(&document)),
        None => Err(reject(ApiError::NotFound(id))),
    }
}

/// Minimum tier for a `level` query value; `None` when nothing can match.
fn min_tier(level: i32) -> Option<TrustTier> {
    if level > TrustTier::HumanVerified.level() {
        None
    } else {
        TrustTier::from_level(level.max(0))
    }
}

pub async fn handle_trusted_docs(query: LevelQuery, state: AppState) -> Result<impl Reply, Rejection> {
    let min = match query.level.as_deref() {
        None => Some(TrustTier::Untrusted),
        Some(raw) => {
            let level: i32 = raw
                .trim()
                .parse()
                .map_err(|_| reject(ValidationError::malformed("level", "Invalid trust level format")))?;
            min_tier(level)
        }
    };

    let docs: Vec<TrustedDocSummary> = match min {
        Some(tier) => state
            .store
            .list_by_min_tier(tier)
            .await
            .map_err(reject)?
            .into_iter()
            .map(|(id, trust_level)| TrustedDocSummary { id, trust_level })
            .collect(),
        None => Vec::new(),
    };

    Ok(warp::reply::json(&docs))
}

pub async fn handle_trusted_doc_by_url(query: UrlQuery, state: AppState) -> Result<impl Reply, Rejection> {
    let url = require_url(query.url.as_deref()).map_err(reject)?;

    match state.store.get(&url).await.map_err(reject)? {
        Some(document) => Ok(warp::reply::json(&TrustedDocView {
            id: document.id,
            content: document.content,
            trust_level: document.trust_tier,
        })),
        None => Err(reject(ApiError::NotFound(url))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_bounds_are_clamped() {
        assert_eq!(min_tier(-3), Some(TrustTier::Untrusted));
        assert_eq!(min_tier(2), Some(TrustTier::AiAssisted));
        assert_eq!(min_tier(4), None);
    }
}
