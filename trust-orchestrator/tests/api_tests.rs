//! Integration tests for the HTTP surface.
//!
//! Every route is driven through `warp::test` against the in-memory store
//! and canned collaborators.

use std::sync::Arc;

use serde_json::{json, Value};
use warp::http::StatusCode;

use trust_orchestrator::agents::AggregatorConfig;
use trust_orchestrator::api::{self, AppState};
use trust_orchestrator::mock::{CannedChatModel, StaticClassifier, StaticFetcher};
use trust_orchestrator::models::Document;
use trust_orchestrator::store::{MemoryStore, VerificationStore};
use trust_orchestrator::trust::TrustTier;

const NEWS: &str = "https://news.example/story";

struct Harness {
    store: Arc<MemoryStore>,
    model: Arc<CannedChatModel>,
    state: AppState,
}

fn harness(documents: Vec<Document>, fetcher: StaticFetcher, classifier: StaticClassifier) -> Harness {
    let store = Arc::new(MemoryStore::with_documents(documents));
    let model = Arc::new(CannedChatModel::new("Answer"));
    let state = AppState::new(
        store.clone(),
        Arc::new(fetcher),
        Arc::new(classifier),
        model.clone(),
        AggregatorConfig::default(),
    );
    Harness { store, model, state }
}

fn empty_harness() -> Harness {
    harness(Vec::new(), StaticFetcher::new(), StaticClassifier::new())
}

fn doc(id: &str, tier: TrustTier, content: Option<&str>) -> Document {
    let mut d = Document::new(id, tier);
    d.content = content.map(str::to_string);
    d
}

async fn post(h: &Harness, path: &str, body: Value) -> (StatusCode, Value) {
    let resp = warp::test::request()
        .method("POST")
        .path(path)
        .json(&body)
        .reply(&api::service(h.state.clone()))
        .await;
    let status = resp.status();
    let body = serde_json::from_slice(resp.body()).unwrap_or(Value::Null);
    (status, body)
}

async fn get(h: &Harness, path: &str) -> (StatusCode, Value) {
    let resp = warp::test::request()
        .method("GET")
        .path(path)
        .reply(&api::service(h.state.clone()))
        .await;
    let status = resp.status();
    let body = serde_json::from_slice(resp.body()).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_reports_healthy() {
    let (status, body) = get(&empty_harness(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn chat_requires_prompt() {
    let (status, body) = post(&empty_harness(), "/api/v1/chat", json!({ "trustedUrls": [] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "prompt");
}

#[tokio::test]
async fn chat_sends_tiered_context_to_model() {
    let h = harness(
        vec![doc("docA", TrustTier::MachineChecked, Some("Alpha"))],
        StaticFetcher::new().with_page("http://live.example", "Live text"),
        StaticClassifier::new(),
    );

    let (status, body) = post(
        &h,
        "/api/v1/chat",
        json!({
            "prompt": "What is alpha?",
            "trustedUrls": ["docA"],
            "untrustedUrls": ["http://live.example"],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Answer");
    assert_eq!(body["hasContext"], true);
    assert_eq!(body["usage"]["total_tokens"], 15);

    let sent = h.model.last_request().unwrap();
    let context = &sent[1].content;
    assert!(context.contains("UNCHECKED SOURCES:\n[Unchecked Source 1]:\nLive text"));
    assert!(context.contains("MACHINE CHECKED SOURCES:\n[Machine Checked Source 1]:\nAlpha"));
    assert!(sent.last().unwrap().content.ends_with("What is alpha?"));
}

#[tokio::test]
async fn chat_without_sources_uses_sentinel() {
    let h = empty_harness();
    let (status, body) = post(&h, "/api/v1/chat", json!({ "prompt": "Hello" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hasContext"], false);
    let sent = h.model.last_request().unwrap();
    assert!(sent.iter().any(|m| m.content.contains("No context provided.")));
}

#[tokio::test]
async fn chat_with_contentless_trusted_doc_reports_context_unavailable() {
    let h = harness(
        vec![doc("docB", TrustTier::AiAssisted, None)],
        StaticFetcher::new(),
        StaticClassifier::new(),
    );

    let (status, body) = post(&h, "/api/v1/chat", json!({ "prompt": "q", "trustedUrls": ["docB"] })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Context unavailable");
    assert_eq!(body["kind"], "missing_content");
    assert!(body["details"].as_str().unwrap().contains("docB"));
    assert!(h.model.last_request().is_none());
}

#[tokio::test]
async fn verify_creates_then_preserves() {
    let h = harness(
        Vec::new(),
        StaticFetcher::new(),
        StaticClassifier::new().with_verdict(NEWS, true, "Reputable", "Story body"),
    );

    let (status, body) = post(&h, "/api/v1/verify", json!({ "url": NEWS })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["isTrusted"], true);
    assert_eq!(body["verificationLevel"], 1);
    assert_eq!(body["preserved"], false);

    let (status, body) = post(&h, "/api/v1/spot-check/verify", json!({ "url": NEWS, "isTrusted": true })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verificationLevel"], 2);

    let (_, body) = post(&h, "/api/v1/verify", json!({ "url": NEWS })).await;
    assert_eq!(body["verificationLevel"], 2);
    assert_eq!(body["preserved"], true);

    let stored = h.store.get(NEWS).await.unwrap().unwrap();
    assert_eq!(stored.query_count, 2);
    assert_eq!(stored.content.as_deref(), Some("Story body"));
    assert_eq!(stored.last_analysis.as_deref(), Some("Reputable"));
}

#[tokio::test]
async fn verify_rejects_malformed_url() {
    let (status, body) = post(&empty_harness(), "/api/v1/verify", json!({ "url": "not a url" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "url");

    let (status, _) = post(&empty_harness(), "/api/v1/verify", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn verify_fails_when_classifier_fails() {
    let h = empty_harness();
    let (status, body) = post(&h, "/api/v1/verify", json!({ "url": NEWS })).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Failed to process AI verification");
    assert!(h.store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn spot_check_start_returns_analysis_without_persisting() {
    let h = harness(
        Vec::new(),
        StaticFetcher::new(),
        StaticClassifier::new().with_verdict(NEWS, false, "Anonymous blog", "Body"),
    );

    let (status, body) = post(&h, "/api/v1/spot-check/start", json!({ "url": NEWS })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis"], "Untrusted");
    assert_eq!(body["gptAnalysis"], "Anonymous blog");
    assert!(h.store.get(NEWS).await.unwrap().is_none());
}

#[tokio::test]
async fn spot_check_decision_requires_verdict() {
    let h = harness(
        vec![doc(NEWS, TrustTier::HumanVerified, Some("Body"))],
        StaticFetcher::new(),
        StaticClassifier::new(),
    );

    let (status, body) = post(&h, "/api/v1/spot-check/verify", json!({ "url": NEWS })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "isTrusted");

    let stored = h.store.get(NEWS).await.unwrap().unwrap();
    assert_eq!(stored.trust_tier, TrustTier::HumanVerified);
}

#[tokio::test]
async fn manual_verify_never_lowers_human_verified() {
    let h = harness(
        vec![doc(NEWS, TrustTier::HumanVerified, Some("Body"))],
        StaticFetcher::new(),
        StaticClassifier::new(),
    );

    let (status, body) = post(&h, "/api/v1/manual-verify", json!({ "url": NEWS })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verificationLevel"], 3);

    let other = "https://fresh.example";
    let (_, body) = post(&h, "/api/v1/manual-verify", json!({ "url": other })).await;
    assert_eq!(body["verificationLevel"], 2);
}

#[tokio::test]
async fn trusted_docs_filter_by_level() {
    let h = harness(
        vec![
            doc("https://a.example", TrustTier::Untrusted, Some("a")),
            doc("https://b.example", TrustTier::AiAssisted, Some("b")),
            doc("https://c.example", TrustTier::HumanVerified, Some("c")),
        ],
        StaticFetcher::new(),
        StaticClassifier::new(),
    );

    let (_, all) = get(&h, "/api/v1/trusted-docs").await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, high) = get(&h, "/api/v1/trusted-docs?level=2").await;
    assert_eq!(
        high,
        json!([
            { "id": "https://b.example", "trustLevel": 2 },
            { "id": "https://c.example", "trustLevel": 3 },
        ])
    );

    let (status, _) = get(&h, "/api/v1/trusted-docs?level=high").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn documents_can_be_listed_and_fetched_by_encoded_id() {
    let h = harness(
        vec![doc(NEWS, TrustTier::MachineChecked, Some("Body"))],
        StaticFetcher::new(),
        StaticClassifier::new(),
    );

    let (_, list) = get(&h, "/api/v1/documents").await;
    assert_eq!(list[0]["id"], NEWS);
    assert_eq!(list[0]["trustTier"], 1);

    let (status, one) = get(&h, "/api/v1/documents/https%3A%2F%2Fnews.example%2Fstory").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(one["content"], "Body");

    let (status, _) = get(&h, "/api/v1/documents/unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(&h, "/api/v1/documents/bad%FFid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "id");

    let (status, view) = get(&h, "/api/v1/trusted-doc?url=https%3A%2F%2Fnews.example%2Fstory").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["trustLevel"], 1);
}

#[tokio::test]
async fn page_content_extracts_or_reports_failure() {
    let h = harness(
        Vec::new(),
        StaticFetcher::new().with_page("https://page.example", "Page text"),
        StaticClassifier::new(),
    );

    let (status, body) = post(&h, "/api/v1/page-content", json!({ "url": "https://page.example" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Page text");

    let (status, _) = post(&h, "/api/v1/page-content", json!({ "url": "https://gone.example" })).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let (status, _) = post(&h, "/api/v1/page-content", json!({ "url": "nope" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
