//! HTTP handlers

use crate::page::render_index;
use crate::session::SessionView;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{Method, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use concierge_core::{ConciergeError, Submission};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Body returned whenever the upstream could not be reached or understood
pub const RELAY_ERROR_MESSAGE: &str = "Failed to get response from OpenAI";

/// Errors surfaced to HTTP clients as `{"error": "..."}`
#[derive(Debug)]
pub enum ApiError {
    /// 400
    BadRequest(String),
    /// 404
    NotFound(String),
    /// 405
    MethodNotAllowed,
    /// 500
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed".to_string(),
            ),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ConciergeError> for ApiError {
    fn from(err: ConciergeError) -> Self {
        match err {
            ConciergeError::Validation(msg) => ApiError::BadRequest(msg),
            ConciergeError::NotFound(msg) => ApiError::NotFound(msg),
            other => {
                error!("ConciergeError: {}", other);
                ApiError::Internal(other.to_string())
            }
        }
    }
}

/// `/api/chat`: forward one chat payload upstream
///
/// Mounted for every method so that anything but POST gets the JSON 405.
pub async fn relay_chat(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    if method != Method::POST {
        debug!(method = %method, "Rejected relay call");
        return Err(ApiError::MethodNotAllowed);
    }

    let body: Value = serde_json::from_slice(&body)
        .map_err(|_| ApiError::BadRequest("Invalid JSON body".to_string()))?;
    let payload = state.wrapper.prepare(body);

    match state.upstream.forward(&payload).await {
        Ok(upstream) => Ok(Json(upstream)),
        Err(e) => {
            error!(error = %e, "Relay to upstream failed");
            Err(ApiError::Internal(RELAY_ERROR_MESSAGE.to_string()))
        }
    }
}

/// `/`: browser front end
pub async fn index() -> Html<String> {
    Html(render_index())
}

/// `/health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `POST /api/sessions`
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let session = state.sessions.create()?;
    Ok((StatusCode::CREATED, Json(session.view())))
}

/// `GET /api/sessions/:id`
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let session = state
        .sessions
        .get(&id)
        .ok_or_else(|| session_not_found(&id))?;
    Ok(Json(session.view()))
}

/// `DELETE /api/sessions/:id`
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(&id))
    }
}

/// Guest input for a session
#[derive(Debug, Deserialize)]
pub struct MessageInput {
    /// Typed, spoken or sample-button text
    pub text: String,
}

/// Reply to a submitted message
#[derive(Debug, Serialize)]
pub struct MessageOutput {
    /// Reply and how it was produced
    #[serde(flatten)]
    pub submission: Submission,
    /// Conversation after the submission
    pub session: SessionView,
}

/// `POST /api/sessions/:id/messages`
pub async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    input: Result<Json<MessageInput>, JsonRejection>,
) -> Result<Json<MessageOutput>, ApiError> {
    let Json(input) = input.map_err(|rejection| {
        debug!(error = %rejection, "Rejected message body");
        ApiError::BadRequest(rejection.body_text())
    })?;
    let session = state
        .sessions
        .get(&id)
        .ok_or_else(|| session_not_found(&id))?;

    let submission = session.controller().submit(&input.text).await?;
    Ok(Json(MessageOutput {
        submission,
        session: session.view(),
    }))
}

fn session_not_found(id: &Uuid) -> ApiError {
    warn!(session_id = %id, "Unknown session");
    ApiError::NotFound(format!("Session {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_response() {
        let response = ApiError::MethodNotAllowed.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let response = ApiError::from(ConciergeError::validation("empty")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::from(ConciergeError::relay("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
