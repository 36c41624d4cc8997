use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use debate_model::{Llm, MockLlm};
use debate_rag::{MockRetriever, RagError, RetrievalPipeline, Retriever, SearchDocument};
use debate_server::{AppState, DebateService, RateLimiter, app_router};
use debate_synth::{SynthesisMode, Synthesizer};
use serde_json::{Value, json};

/// Counts retrievals, delegating to the mock.
#[derive(Default)]
struct CountingRetriever {
    calls: AtomicUsize,
}

#[async_trait]
impl Retriever for CountingRetriever {
    fn name(&self) -> &str {
        "counting"
    }

    async fn retrieve(&self, topic: &str, k: usize) -> debate_rag::Result<Vec<SearchDocument>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        MockRetriever.retrieve(topic, k).await
    }
}

struct BrokenRetriever;

#[async_trait]
impl Retriever for BrokenRetriever {
    fn name(&self) -> &str {
        "broken"
    }

    async fn retrieve(&self, _topic: &str, _k: usize) -> debate_rag::Result<Vec<SearchDocument>> {
        Err(RagError::RetrievalError { retriever: "broken".into(), message: "index offline".into() })
    }
}

fn pipeline_with(retriever: Arc<dyn Retriever>) -> RetrievalPipeline {
    RetrievalPipeline::builder().retriever(retriever).build().expect("pipeline")
}

fn heuristic_state() -> AppState {
    AppState::new(DebateService::new(
        pipeline_with(Arc::new(MockRetriever)),
        Synthesizer::new(SynthesisMode::KeywordHeuristic),
    ))
}

fn llm_state(llm: MockLlm) -> AppState {
    AppState::new(DebateService::new(
        pipeline_with(Arc::new(MockRetriever)),
        Synthesizer::new(SynthesisMode::LanguageModel).with_llm(Arc::new(llm) as Arc<dyn Llm>),
    ))
}

async fn spawn_server(state: AppState) -> (String, tokio::task::JoinHandle<()>) {
    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");

    let handle = tokio::spawn(async move {
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .expect("server run");
    });

    (format!("http://{}", addr), handle)
}

async fn post_json(base: &str, path: &str, body: Value) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("{}{}", base, path))
        .json(&body)
        .send()
        .await
        .expect("response");
    let status = response.status().as_u16();
    (status, response.json().await.expect("json body"))
}

#[tokio::test]
async fn health_reports_healthy() {
    let (base, handle) = spawn_server(heuristic_state()).await;

    let body: Value = reqwest::get(format!("{}/health", base))
        .await
        .expect("health response")
        .json()
        .await
        .expect("health json");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["languageModelConfigured"], false);
    assert!(body["timestamp"].is_string());

    handle.abort();
}

/// **Property 7: valid requests yield three sourced counter-arguments**
#[tokio::test]
async fn counter_arguments_for_valid_request() {
    let (base, handle) = spawn_server(heuristic_state()).await;

    let (status, body) = post_json(
        &base,
        "/api/generate-counter-arguments",
        json!({
            "topic": "Remote work is better than office work",
            "userStance": "Remote work should be mandatory because it reduces commute costs",
            "includeRAG": true
        }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    let arguments = body["counterArguments"].as_array().expect("arguments array");
    assert_eq!(arguments.len(), 3);
    for argument in arguments {
        assert!(!argument["text"].as_str().unwrap().is_empty());
        assert!(!argument["sources"].as_array().unwrap().is_empty());
        assert_eq!(argument["ragEnhanced"], true);
    }

    let metadata = &body["metadata"];
    assert_eq!(metadata["topic"], "Remote work is better than office work");
    assert_eq!(metadata["ragEnabled"], true);
    assert_eq!(metadata["synthesis"], "keyword_heuristic");
    assert_eq!(metadata["retrieval"]["searchResultsCount"], 5);
    assert!(metadata["requestId"].is_string());

    handle.abort();
}

#[tokio::test]
async fn counter_arguments_without_retrieval() {
    let (base, handle) = spawn_server(heuristic_state()).await;

    let (status, body) = post_json(
        &base,
        "/api/generate-counter-arguments",
        json!({ "topic": "Remote work", "userStance": "Offices are obsolete now", "includeRAG": false }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["counterArguments"].as_array().unwrap().len(), 3);
    assert_eq!(body["metadata"]["ragEnabled"], false);
    assert!(body["metadata"].get("retrieval").is_none());
    assert!(body["counterArguments"][0].get("ragEnhanced").is_none());

    handle.abort();
}

/// **Property 5: short stances are rejected before retrieval runs**
#[tokio::test]
async fn short_stance_is_rejected_without_retrieval() {
    let retriever = Arc::new(CountingRetriever::default());
    let state = AppState::new(DebateService::new(
        pipeline_with(retriever.clone()),
        Synthesizer::new(SynthesisMode::KeywordHeuristic),
    ));
    let (base, handle) = spawn_server(state).await;

    let (status, body) = post_json(
        &base,
        "/api/generate-counter-arguments",
        json!({ "topic": "Nuclear power", "userStance": "Too risky" }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Please provide a more detailed stance (at least 10 characters)");

    assert_eq!(retriever.calls.load(Ordering::SeqCst), 0);

    handle.abort();
}

#[tokio::test]
async fn llm_debate_accepts_bare_positions() {
    let (base, handle) = spawn_server(llm_state(MockLlm::replying("Let us weigh both sides."))).await;

    for stance in ["FOR", "AGAINST", "NEUTRAL"] {
        let (status, body) = post_json(
            &base,
            "/api/llm-debate",
            json!({ "topic": "Nuclear power", "stance": stance, "conversationHistory": [] }),
        )
        .await;
        assert_eq!(status, 200, "stance {stance}: {body}");
        assert_eq!(body["success"], true);
        assert_eq!(body["userStance"], stance);
    }

    handle.abort();
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let (base, handle) = spawn_server(heuristic_state()).await;

    let (status, body) =
        post_json(&base, "/api/generate-counter-arguments", json!({ "topic": "Nuclear power" })).await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "Topic and user stance are required");

    let (status, body) = post_json(&base, "/api/llm-debate", json!({ "stance": "a long enough stance" })).await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "Topic and stance are required");

    handle.abort();
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let (base, handle) = spawn_server(heuristic_state()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/generate-counter-arguments", base))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("response");
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());

    handle.abort();
}

#[tokio::test]
async fn llm_debate_returns_model_reply() {
    let llm = MockLlm::replying("Consider the storage costs.").with_name("gemini-2.5-flash");
    let (base, handle) = spawn_server(llm_state(llm)).await;

    let (status, body) = post_json(
        &base,
        "/api/llm-debate",
        json!({
            "topic": "Nuclear power",
            "stance": "It is the cleanest option we have",
            "conversationHistory": [
                { "type": "user", "content": "Nuclear is clean" },
                { "type": "ai", "content": "What about waste?" }
            ]
        }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["llmResponse"], "Consider the storage costs.");
    assert_eq!(body["userStance"], "It is the cleanest option we have");
    assert_eq!(body["conversational"], true);
    assert_eq!(body["ragContext"]["totalSources"], 5);
    assert_eq!(body["ragContext"]["searchResults"].as_array().unwrap().len(), 5);
    assert!(!body["ragContext"]["vectorSimilarity"].as_array().unwrap().is_empty());
    assert_eq!(body["metadata"]["responseType"], "conversational");
    assert_eq!(body["metadata"]["model"], "gemini-2.5-flash");
    assert!(body.get("error").is_none());

    handle.abort();
}

/// **Property 8: model failures degrade to the apology with HTTP 200**
#[tokio::test]
async fn llm_debate_failure_returns_apology() {
    let (base, handle) = spawn_server(llm_state(MockLlm::failing("quota exceeded"))).await;

    let (status, body) = post_json(
        &base,
        "/api/llm-debate",
        json!({ "topic": "Nuclear power", "stance": "It is the cleanest option we have" }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], false);
    assert!(body["llmResponse"].as_str().unwrap().starts_with("I apologize"));
    assert!(body["error"].as_str().unwrap().contains("quota exceeded"));
    assert_eq!(body["metadata"]["responseType"], "fallback");

    handle.abort();
}

#[tokio::test]
async fn counter_arguments_fall_back_when_model_fails() {
    let (base, handle) = spawn_server(llm_state(MockLlm::failing("upstream down"))).await;

    let (status, body) = post_json(
        &base,
        "/api/generate-counter-arguments",
        json!({ "topic": "Universal basic income", "userStance": "It would reduce poverty overall" }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["counterArguments"].as_array().unwrap().len(), 3);
    assert_eq!(body["metadata"]["synthesis"], "retrieval_fallback");
    assert!(body["metadata"]["error"].is_string());

    handle.abort();
}

#[tokio::test]
async fn rag_status_describes_capabilities() {
    let (base, handle) = spawn_server(heuristic_state()).await;

    let body: Value = reqwest::get(format!("{}/api/rag-status", base))
        .await
        .expect("status response")
        .json()
        .await
        .expect("status json");
    assert_eq!(body["ragSystemActive"], true);
    assert_eq!(body["features"].as_array().unwrap().len(), 5);
    assert_eq!(body["synthesisMode"], "keyword_heuristic");
    assert_eq!(body["languageModel"]["configured"], false);
    assert_eq!(body["retrieval"]["topK"], 5);
    assert_eq!(body["retrieval"]["scoring"], "term_overlap");

    handle.abort();
}

#[tokio::test]
async fn legacy_routes_redirect() {
    let (base, handle) = spawn_server(heuristic_state()).await;

    let body: Value = reqwest::get(format!("{}/api/debates", base))
        .await
        .expect("debates response")
        .json()
        .await
        .expect("debates json");
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["message"], "Debates endpoint - now using counter-arguments");

    let (status, body) = post_json(&base, "/api/ai-debates", json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Use /api/generate-counter-arguments instead");

    handle.abort();
}

#[tokio::test]
async fn unknown_route_lists_available_routes() {
    let (base, handle) = spawn_server(heuristic_state()).await;

    let response = reqwest::get(format!("{}/api/unknown", base)).await.expect("response");
    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["success"], false);
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("Route /api/unknown not found."));
    assert!(message.contains("/api/llm-debate"));

    handle.abort();
}

/// **Property 9: clients over budget receive 429 with a retry hint**
#[tokio::test]
async fn rate_limit_rejects_excess_requests() {
    let state = heuristic_state().with_rate_limiter(RateLimiter::new(2, Duration::from_secs(60)));
    let (base, handle) = spawn_server(state).await;
    let request = json!({ "topic": "Nuclear power", "userStance": "It is too expensive to build" });

    for _ in 0..2 {
        let (status, _) = post_json(&base, "/api/generate-counter-arguments", request.clone()).await;
        assert_eq!(status, 200);
    }

    let response = reqwest::Client::new()
        .post(format!("{}/api/generate-counter-arguments", base))
        .json(&request)
        .send()
        .await
        .expect("response");
    assert_eq!(response.status().as_u16(), 429);
    let retry_after: u64 = response.headers()["retry-after"].to_str().unwrap().parse().unwrap();
    assert!(retry_after > 0 && retry_after <= 60);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["message"], "Too many requests. Please try again later");
    assert!(body["retryAfterMs"].as_u64().unwrap() > 0);

    // status routes are not limited
    let health = reqwest::get(format!("{}/health", base)).await.expect("health");
    assert!(health.status().is_success());

    handle.abort();
}

#[tokio::test]
async fn retrieval_failure_is_internal_error() {
    let state = AppState::new(DebateService::new(
        pipeline_with(Arc::new(BrokenRetriever)),
        Synthesizer::new(SynthesisMode::KeywordHeuristic),
    ));
    let (base, handle) = spawn_server(state).await;

    let (status, body) = post_json(
        &base,
        "/api/generate-counter-arguments",
        json!({ "topic": "Nuclear power", "userStance": "It is too expensive to build" }),
    )
    .await;
    assert_eq!(status, 500);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "An unexpected error occurred");

    handle.abort();
}
