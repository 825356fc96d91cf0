use tracing::{info, warn};
use warp::{Rejection, Reply};

use crate::api::AppState;
use crate::error::reject;
use crate::models::{PageContentResponse, UrlRequest};
use crate::validation::require_url;

pub async fn handle_page_content(request: UrlRequest, state: AppState) -> Result<impl Reply, Rejection> {
    let url = require_url(request.url.as_deref()).map_err(reject)?;
    info!(url = %url, "Extracting page content");

    let text = state.fetcher.fetch(&url).await.map_err(|e| {
        warn!(url = %url, error = %e, "Content extraction failed");
        reject(e)
    })?;

    Ok(warp::reply::json(&PageContentResponse { text }))
}
