//! HTTP request handlers: GET /, POST /chat, GET /health.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::app::server::AppState;
use crate::domain::model::ChatRequest;

/// Body returned by POST /chat. Reply metadata stays server-side.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub emergency: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub async fn get_index(State(state): State<AppState>) -> Response {
    let path = state.static_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", path.display(), e);
            (
                StatusCode::NOT_FOUND,
                Html("<h1>index.html not found</h1>".to_string()),
            )
                .into_response()
        }
    }
}

fn error_response(status: StatusCode, error: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

/// 解析失敗只回固定文字，不把 serde 的錯誤內容轉給使用者
fn rejection_response(rejection: JsonRejection) -> Response {
    tracing::debug!("Rejected chat request body: {}", rejection.body_text());
    match rejection {
        JsonRejection::MissingJsonContentType(_) => error_response(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "expected a JSON body",
        ),
        _ => error_response(StatusCode::BAD_REQUEST, "invalid JSON body"),
    }
}

pub async fn post_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection),
    };

    let message = req.message.as_deref().unwrap_or_default().trim();
    if message.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "empty message");
    }

    let result = state.assistant.reply(message).await;
    if let Some(meta) = &result.meta {
        tracing::debug!(
            "Chat reply via {} (model: {})",
            meta.provider,
            meta.model.as_deref().unwrap_or("-")
        );
    }

    Json(ChatResponse {
        reply: result.reply,
        emergency: result.emergency,
    })
    .into_response()
}

pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
