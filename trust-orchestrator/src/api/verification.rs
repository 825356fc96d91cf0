use tracing::info;
use warp::{Rejection, Reply};

use crate::api::AppState;
use crate::error::{reject, ValidationError, VerificationError};
use crate::models::{SpotCheckDecision, SpotCheckResponse, TierResponse, UrlRequest, VerifyResponse};
use crate::validation::require_url;

fn validated_url(raw: Option<&str>) -> Result<String, Rejection> {
    require_url(raw).map_err(|e| reject(VerificationError::from(e)))
}

pub async fn handle_verify(request: UrlRequest, state: AppState) -> Result<impl Reply, Rejection> {
    let url = validated_url(request.url.as_deref())?;
    info!(url = %url, "Starting verification process");

    let outcome = state.verifier.check(&url).await.map_err(reject)?;

    Ok(warp::reply::json(&VerifyResponse {
        success: true,
        is_trusted: outcome.is_trusted,
        verification_level: outcome.document.trust_tier,
        preserved: outcome.preserved,
    }))
}

pub async fn handle_spot_check_start(request: UrlRequest, state: AppState) -> Result<impl Reply, Rejection> {
    let url = validated_url(request.url.as_deref())?;

    let classification = state.verifier.spot_check(&url).await.map_err(reject)?;

    Ok(warp::reply::json(&SpotCheckResponse {
        success: true,
        analysis: classification.label,
        gpt_analysis: classification.analysis,
    }))
}

pub async fn handle_spot_check_verify(
    request: SpotCheckDecision,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    let url = validated_url(request.url.as_deref())?;
    let is_trusted = request
        .is_trusted
        .ok_or_else(|| reject(ValidationError::missing("isTrusted")))?;

    let document = state.verifier.decide(&url, is_trusted).await.map_err(reject)?;

    Ok(warp::reply::json(&TierResponse {
        success: true,
        verification_level: document.trust_tier,
    }))
}

pub async fn handle_manual_verify(request: UrlRequest, state: AppState) -> Result<impl Reply, Rejection> {
    let url = validated_url(request.url.as_deref())?;

    let document = state.verifier.register(&url).await.map_err(reject)?;

    Ok(warp::reply::json(&TierResponse {
        success: true,
        verification_level: document.trust_tier,
    }))
}
