use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use farmwise_advisory::FlowError;
use farmwise_persist::PersistError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Chat not found: {0}")]
    SessionNotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Advisory service error: {0}")]
    Upstream(#[source] anyhow::Error),

    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "Chat not found".to_string()),
            ApiError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Upstream(ref e) => {
                tracing::error!("Gemini API error: {:#}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Failed to get AI response".to_string(),
                )
            }
            ApiError::Flow(ref e) => flow_error_response(e),
            ApiError::Persist(ref e) => persist_error_response(e),
            ApiError::Internal => {
                tracing::error!("Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

fn flow_error_response(error: &FlowError) -> (StatusCode, String) {
    match error {
        FlowError::EmptyMessage | FlowError::SessionEnded => {
            (StatusCode::BAD_REQUEST, error.to_string())
        }
        FlowError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "Chat not found".to_string()),
        FlowError::Generation(e) => {
            tracing::error!("Gemini API error: {:#}", e);
            (
                StatusCode::BAD_GATEWAY,
                "Failed to get AI response".to_string(),
            )
        }
        FlowError::Persist(e) => persist_error_response(e),
    }
}

fn persist_error_response(error: &PersistError) -> (StatusCode, String) {
    match error {
        // An unparseable or unknown id is indistinguishable from a missing
        // session as far as the client is concerned
        PersistError::SessionNotFound(_) | PersistError::InvalidObjectId(_) => {
            (StatusCode::NOT_FOUND, "Chat not found".to_string())
        }
        _ => {
            tracing::error!("Persistence error: {}", error);
            (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
