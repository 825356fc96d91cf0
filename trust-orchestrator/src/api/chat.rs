use tracing::{error, info};
use uuid::Uuid;
use warp::{Rejection, Reply};

use crate::api::AppState;
use crate::error::reject;
use crate::models::{ChatRequest, ChatResponse};
use crate::validation::require_prompt;

pub async fn handle_chat(request: ChatRequest, state: AppState) -> Result<impl Reply, Rejection> {
    let request_id = Uuid::new_v4();
    let prompt = require_prompt(request.prompt.as_deref()).map_err(reject)?;
    info!(
        %request_id,
        trusted = request.trusted_urls.len(),
        untrusted = request.untrusted_urls.len(),
        "Processing chat request"
    );

    let context = state
        .aggregator
        .aggregate(&request.trusted_urls, &request.untrusted_urls)
        .await
        .map_err(|e| {
            error!(%request_id, kind = e.kind(), error = %e, "Context aggregation failed");
            reject(e)
        })?;

    let completion = state.summarizer.answer(&prompt, &context).await.map_err(|e| {
        error!(%request_id, error = %e, "Chat completion failed");
        reject(e)
    })?;

    Ok(warp::reply::json(&ChatResponse {
        response: completion.text,
        usage: completion.usage,
        has_context: context.has_context,
    }))
}
