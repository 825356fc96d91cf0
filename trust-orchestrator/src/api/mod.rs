use std::sync::Arc;

use warp::{Filter, Rejection, Reply};

use crate::agents::{AggregatorConfig, ContextAggregator, SummarizerAgent, VerifierAgent};
use crate::classifier::TrustClassifier;
use crate::error::handle_rejection;
use crate::fetcher::ContentFetcher;
use crate::llm_client::ChatModel;
use crate::metrics;
use crate::store::VerificationStore;

mod chat;
mod content;
mod documents;
mod verification;

/// Shared handles injected into every route.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn VerificationStore>,
    pub fetcher: Arc<dyn ContentFetcher>,
    pub aggregator: Arc<ContextAggregator>,
    pub verifier: Arc<VerifierAgent>,
    pub summarizer: Arc<SummarizerAgent>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn VerificationStore>,
        fetcher: Arc<dyn ContentFetcher>,
        classifier: Arc<dyn TrustClassifier>,
        model: Arc<dyn ChatModel>,
        aggregator_config: AggregatorConfig,
    ) -> Self {
        let aggregator = ContextAggregator::new(store.clone(), fetcher.clone(), aggregator_config);
        let verifier = VerifierAgent::new(store.clone(), classifier);
        Self {
            store,
            fetcher,
            aggregator: Arc::new(aggregator),
            verifier: Arc::new(verifier),
            summarizer: Arc::new(SummarizerAgent::new(model)),
        }
    }
}

pub fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let chat_route = warp::path!("api" / "v1" / "chat")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(chat::handle_chat);

    let verify_route = warp::path!("api" / "v1" / "verify")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(verification::handle_verify);

    let spot_check_start_route = warp::path!("api" / "v1" / "spot-check" / "start")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(verification::handle_spot_check_start);

    let spot_check_verify_route = warp::path!("api" / "v1" / "spot-check" / "verify")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(verification::handle_spot_check_verify);

    let manual_verify_route = warp::path!("api" / "v1" / "manual-verify")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(verification::handle_manual_verify);

    let documents_route = warp::path!("api" / "v1" / "documents")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(documents::handle_list_documents);

    let document_route = warp::path!("api" / "v1" / "documents" / String)
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(documents::handle_get_document);

    let trusted_docs_route = warp::path!("api" / "v1" / "trusted-docs")
        .and(warp::get())
        .and(warp::query())
        .and(with_state(state.clone()))
        .and_then(documents::handle_trusted_docs);

    let trusted_doc_route = warp::path!("api" / "v1" / "trusted-doc")
        .and(warp::get())
        .and(warp::query())
        .and(with_state(state.clone()))
        .and_then(documents::handle_trusted_doc_by_url);

    let page_content_route = warp::path!("api" / "v1" / "page-content")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_state(state))
        .and_then(content::handle_page_content);

    chat_route
        .or(verify_route)
        .or(spot_check_start_route)
        .or(spot_check_verify_route)
        .or(manual_verify_route)
        .or(documents_route)
        .or(document_route)
        .or(trusted_docs_route)
        .or(trusted_doc_route)
        .or(page_content_route)
}

/// API routes plus health and metrics, with error replies applied.
pub fn service(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({"status": "healthy"})));

    let metrics_route = warp::path("metrics").and(warp::get()).map(|| {
        let (buffer, content_type) = metrics::render();
        warp::reply::with_header(buffer, "Content-Type", content_type)
    });

    health.or(metrics_route).or(routes(state)).recover(handle_rejection)
}

fn with_state(
    state: AppState,
) -> impl Filter<Extract = (AppState,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || state.clone())
}
