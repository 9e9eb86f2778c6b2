//! HTTP request handlers

use super::types::{ChatRequest, ErrorResponse, HealthResponse, HistoryQuery};
use super::AppState;
use crate::chat::{ChatError, ChatTurn};
use crate::store::ChatMessage;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

const INVALID_REQUEST: &str = "Invalid request";
const HISTORY_FAILED: &str = "Failed to fetch chat history";
const CHAT_FAILED: &str = "Failed to process chat message";

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Chatbot
        .route("/api/chat", post(send_chat))
        .route("/api/chat/history", get(chat_history))
        // Liveness
        .route("/health", get(health))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Chat
// ============================================================

async fn send_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatTurn>, AppError> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected chat request body");
        AppError::BadRequest(INVALID_REQUEST.to_string())
    })?;

    let turn = state
        .resolver
        .handle_chat_turn(&req.message)
        .await
        .map_err(|e| match e {
            ChatError::Validation(reason) => {
                tracing::debug!(reason, "Rejected chat message");
                AppError::BadRequest(INVALID_REQUEST.to_string())
            }
            ChatError::Store(err) => {
                tracing::error!(error = %err, "Error in chat API");
                AppError::Internal(CHAT_FAILED.to_string())
            }
        })?;

    Ok(Json(turn))
}

async fn chat_history(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let Query(query) = query.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected history query");
        AppError::BadRequest(INVALID_REQUEST.to_string())
    })?;

    let messages = state
        .store
        .get_chat_messages(query.user_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Error fetching chat history");
            AppError::Internal(HISTORY_FAILED.to_string())
        })?;

    Ok(Json(messages))
}

// ============================================================
// Health & Version
// ============================================================

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn get_version() -> &'static str {
    concat!("portfolio-chat ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ConversationStore, MemoryStore, SeedList, DEFAULT_KEYWORD};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app() -> (Router, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        (create_router(AppState::new(store.clone())), store)
    }

    fn post_chat(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn seed_response(keyword: &str) -> String {
        SeedList::builtin()
            .entries()
            .iter()
            .find(|e| e.keyword == keyword)
            .map(|e| e.response.clone())
            .unwrap()
    }

    #[tokio::test]
    async fn test_chat_returns_both_messages() {
        let (app, _store) = test_app();

        let response = app
            .oneshot(post_chat(r#"{"message": "Tell me about your skills"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["userMessage"]["message"], "Tell me about your skills");
        assert_eq!(json["userMessage"]["isBot"], false);
        assert!(json["userMessage"]["userId"].is_null());
        assert_eq!(json["botMessage"]["isBot"], true);
        assert_eq!(json["botMessage"]["message"], seed_response("skills"));
        assert!(json["botMessage"]["timestamp"].as_str().unwrap().ends_with('Z'));
        assert!(json["userMessage"]["id"].as_i64() < json["botMessage"]["id"].as_i64());
    }

    #[tokio::test]
    async fn test_chat_unknown_topic_gets_default() {
        let (app, _store) = test_app();

        let response = app
            .oneshot(post_chat(r#"{"message": "xyzxyz"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["botMessage"]["message"], seed_response(DEFAULT_KEYWORD));
    }

    #[tokio::test]
    async fn test_chat_rejects_bad_bodies() {
        let (app, store) = test_app();

        let bodies = [
            "not json",
            "{}",
            r#"{"message": 42}"#,
            r#"{"message": ""}"#,
            r#"{"message": "   "}"#,
        ];

        for body in bodies {
            let response = app.clone().oneshot(post_chat(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");

            let json = json_body(response).await;
            assert_eq!(json["message"], INVALID_REQUEST);
        }

        assert!(store.get_chat_messages(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chat_rejects_missing_content_type() {
        let (app, _store) = test_app();

        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .body(Body::from(r#"{"message": "hello"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_history_lists_turns_in_order() {
        let (app, _store) = test_app();

        for text in ["hello", "what are your hobbies"] {
            let body = format!(r#"{{"message": "{text}"}}"#);
            let response = app.clone().oneshot(post_chat(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app.oneshot(get("/api/chat/history")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        let messages = json.as_array().unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0]["message"], "hello");
        assert_eq!(messages[1]["message"], seed_response("hello"));
        assert_eq!(messages[2]["message"], "what are your hobbies");
        assert_eq!(messages[3]["message"], seed_response("hobbies"));

        let ids: Vec<i64> = messages.iter().map(|m| m["id"].as_i64().unwrap()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_history_filters_by_user() {
        let (app, store) = test_app();

        store
            .create_chat_message(crate::store::NewChatMessage {
                user_id: Some(7),
                message: "tagged".to_string(),
                is_bot: false,
                timestamp: "2024-05-01T12:00:00.000Z".to_string(),
            })
            .await
            .unwrap();
        app.clone()
            .oneshot(post_chat(r#"{"message": "hello"}"#))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(get("/api/chat/history?userId=7"))
            .await
            .unwrap();
        let json = json_body(response).await;
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["message"], "tagged");
        assert_eq!(json[0]["userId"], 7);

        let response = app.oneshot(get("/api/chat/history")).await.unwrap();
        let json = json_body(response).await;
        assert_eq!(json.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_history_rejects_bad_user_id() {
        let (app, _store) = test_app();

        let response = app
            .oneshot(get("/api/chat/history?userId=abc"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_history_internal_failure() {
        let (app, store) = test_app();
        store.poison_messages();

        let response = app.oneshot(get("/api/chat/history")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = json_body(response).await;
        assert_eq!(json["message"], HISTORY_FAILED);
    }

    #[tokio::test]
    async fn test_chat_internal_failure() {
        let (app, store) = test_app();
        store.poison_messages();

        let response = app
            .oneshot(post_chat(r#"{"message": "hello"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = json_body(response).await;
        assert_eq!(json["message"], CHAT_FAILED);
    }

    #[tokio::test]
    async fn test_chat_lookup_failure_degrades_to_fallback() {
        let (app, store) = test_app();
        store.poison_responses();

        let response = app
            .oneshot(post_chat(r#"{"message": "hello"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["botMessage"]["message"], crate::chat::FALLBACK_RESPONSE);

        let history = store.get_chat_messages(None).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(!history[0].is_bot);
        assert!(history[1].is_bot);
    }

    #[tokio::test]
    async fn test_health_and_version() {
        let (app, _store) = test_app();

        let response = app.clone().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));

        let response = app.oneshot(get("/version")).await.unwrap();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.starts_with(b"portfolio-chat "));
    }
}
