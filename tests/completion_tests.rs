use relay_chatbot::config::OpenAiSettings;
use relay_chatbot::error::AppError;
use relay_chatbot::services::completion::{CompletionClient, OpenAiClient};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    routing::post,
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct Captured {
    auth: Option<String>,
    body: Option<Value>,
}

type Shared = Arc<Mutex<Captured>>;

/// Starts a fake completion API that answers every request with `status` and `reply`.
async fn spawn_fake_api(status: StatusCode, reply: Value) -> (String, Shared) {
    let captured: Shared = Arc::default();

    let app = Router::new()
        .route(
            "/v1/completions",
            post(
                move |State(captured): State<Shared>, headers: HeaderMap, Json(body): Json<Value>| {
                    let reply = reply.clone();
                    async move {
                        let mut guard = captured.lock().unwrap();
                        guard.auth = headers
                            .get("authorization")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        guard.body = Some(body);
                        (status, Json(reply))
                    }
                },
            ),
        )
        .with_state(captured.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), captured)
}

fn settings(base_url: String) -> OpenAiSettings {
    OpenAiSettings {
        api_key: Some("sk-test".to_string()),
        base_url,
        model: "gpt-3.5-turbo-instruct".to_string(),
        max_tokens: 150,
        timeout: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn sends_prompt_and_returns_first_choice() {
    let (base_url, captured) = spawn_fake_api(
        StatusCode::OK,
        json!({
            "id": "cmpl-1",
            "object": "text_completion",
            "choices": [{ "text": "\n\nParis", "index": 0, "finish_reason": "stop" }]
        }),
    )
    .await;

    let client = OpenAiClient::new(&settings(base_url)).unwrap();
    let text = client.complete("Capital of France?").await.unwrap();
    assert_eq!(text, "\n\nParis");

    let guard = captured.lock().unwrap();
    assert_eq!(guard.auth.as_deref(), Some("Bearer sk-test"));
    let body = guard.body.as_ref().unwrap();
    assert_eq!(body["model"], "gpt-3.5-turbo-instruct");
    assert_eq!(body["prompt"], "Capital of France?");
    assert_eq!(body["max_tokens"], 150);
}

#[tokio::test]
async fn api_error_message_is_surfaced() {
    let (base_url, _) = spawn_fake_api(
        StatusCode::UNAUTHORIZED,
        json!({
            "error": {
                "message": "Incorrect API key provided",
                "type": "invalid_request_error"
            }
        }),
    )
    .await;

    let client = OpenAiClient::new(&settings(base_url)).unwrap();
    let err = client.complete("hi").await.unwrap_err();
    match err {
        AppError::Upstream(msg) => {
            assert!(msg.contains("401"));
            assert!(msg.contains("Incorrect API key provided"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn empty_choices_is_an_error() {
    let (base_url, _) = spawn_fake_api(StatusCode::OK, json!({ "choices": [] })).await;

    let client = OpenAiClient::new(&settings(base_url)).unwrap();
    let err = client.complete("hi").await.unwrap_err();
    assert!(err.to_string().contains("no choices"));
}

#[tokio::test]
async fn unreachable_api_is_an_upstream_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = OpenAiClient::new(&settings(format!("http://{addr}"))).unwrap();
    let err = client.complete("hi").await.unwrap_err();
    assert!(matches!(err, AppError::Upstream(_)));
}

/// Starts a fake completion API that answers with a fixed non-JSON body.
async fn spawn_raw_api(status: StatusCode, content_type: &'static str, body: &'static str) -> String {
    let app = Router::new().route(
        "/v1/completions",
        post(move || async move { (status, [(header::CONTENT_TYPE, content_type)], body) }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn undecodable_success_body_is_an_upstream_error() {
    let base_url = spawn_raw_api(StatusCode::OK, "text/html", "<html>oops</html>").await;

    let client = OpenAiClient::new(&settings(base_url)).unwrap();
    let err = client.complete("hi").await.unwrap_err();
    match err {
        AppError::Upstream(msg) => assert!(msg.starts_with("Could not decode")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn error_without_envelope_uses_raw_body() {
    let base_url = spawn_raw_api(StatusCode::BAD_GATEWAY, "text/plain", "Bad gateway plain").await;

    let client = OpenAiClient::new(&settings(base_url)).unwrap();
    let err = client.complete("hi").await.unwrap_err();
    match err {
        AppError::Upstream(msg) => {
            assert!(msg.contains("502"));
            assert!(msg.contains("Bad gateway plain"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
