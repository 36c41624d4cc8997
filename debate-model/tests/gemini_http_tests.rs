//! Exercises [`GeminiModel`] against a local stub of the `generateContent` endpoint.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use debate_model::{GeminiModel, Llm, LlmRequest, ModelError};
use serde_json::{Value, json};

async fn generate(
    Path(action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some("test-key") {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}})),
        );
    }

    match action.as_str() {
        "gemini-ok:generateContent" => {
            let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default();
            let temperature = body["generationConfig"]["temperature"].as_f64().unwrap_or_default();
            (
                StatusCode::OK,
                Json(json!({
                    "candidates": [{
                        "content": {"role": "model", "parts": [{"text": format!("echo: {prompt} @ {temperature:.1}")}]},
                        "finishReason": "STOP"
                    }]
                })),
            )
        }
        "gemini-quota:generateContent" => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}})),
        ),
        "gemini-slow:generateContent" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            (StatusCode::OK, Json(json!({})))
        }
        _ => (StatusCode::NOT_FOUND, Json(json!({"error": {"message": "unknown model"}}))),
    }
}

async fn spawn_stub() -> (String, tokio::task::JoinHandle<()>) {
    let app = Router::new().route("/v1beta/models/{action}", post(generate));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/v1beta"), handle)
}

#[tokio::test]
async fn sends_prompt_and_config() {
    let (base, handle) = spawn_stub().await;
    let model = GeminiModel::new("test-key", "gemini-ok").unwrap().with_base_url(base);

    let response = model.generate(LlmRequest::new("hello there")).await.unwrap();
    assert_eq!(response.text, "echo: hello there @ 0.9");
    assert_eq!(response.model, "gemini-ok");

    handle.abort();
}

#[tokio::test]
async fn maps_api_errors_with_detail() {
    let (base, handle) = spawn_stub().await;

    let quota = GeminiModel::new("test-key", "gemini-quota").unwrap().with_base_url(base.clone());
    let err = quota.generate(LlmRequest::new("x")).await.unwrap_err();
    assert!(err.is_quota());
    assert!(err.to_string().contains("Quota exceeded"), "{err}");

    let bad_key = GeminiModel::new("wrong-key", "gemini-ok").unwrap().with_base_url(base);
    let err = bad_key.generate(LlmRequest::new("x")).await.unwrap_err();
    assert!(err.is_auth());

    handle.abort();
}

#[tokio::test]
async fn times_out() {
    let (base, handle) = spawn_stub().await;
    let model = GeminiModel::new("test-key", "gemini-slow")
        .unwrap()
        .with_base_url(base)
        .with_timeout(Duration::from_millis(200))
        .unwrap();

    let err = model.generate(LlmRequest::new("x")).await.unwrap_err();
    assert!(matches!(err, ModelError::Timeout { .. }), "{err:?}");

    handle.abort();
}

#[tokio::test]
async fn connection_refused_is_request_error() {
    let model =
        GeminiModel::new("test-key", "gemini-ok").unwrap().with_base_url("http://127.0.0.1:9/v1beta");
    let err = model.generate(LlmRequest::new("x")).await.unwrap_err();
    assert!(matches!(err, ModelError::RequestError { .. } | ModelError::Timeout { .. }), "{err:?}");
}
