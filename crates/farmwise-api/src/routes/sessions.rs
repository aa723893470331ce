use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use farmwise_persist::{
    ChatSession, NewSession, ProductContext, SessionContext, SessionSummary, SessionUpdate,
    StoredMessage,
};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub user_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub context: Option<SessionContext>,
    #[serde(default)]
    pub messages: Option<Vec<StoredMessage>>,
    #[serde(default)]
    pub product_context: Option<ProductContext>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionRequest {
    pub user_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub context: Option<SessionContext>,
    #[serde(default)]
    pub messages: Option<Vec<StoredMessage>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendMessagesRequest {
    pub user_id: String,
    #[serde(default)]
    pub messages: Vec<StoredMessage>,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub chat: SessionPayload,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    pub id: String,
    pub title: String,
    pub context: SessionContext,
    pub messages: Vec<StoredMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_context: Option<ProductContext>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub success: bool,
    pub chats: Vec<SummaryPayload>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPayload {
    pub id: String,
    pub title: String,
    pub crop: String,
    pub message_count: usize,
    pub last_message: String,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct AppendMessagesResponse {
    pub success: bool,
    pub chat: AppendedSessionPayload,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendedSessionPayload {
    pub id: String,
    pub title: String,
    pub message_count: usize,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct DeleteSessionResponse {
    pub success: bool,
    pub message: String,
}

/// Create a new chat session
#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session created", body = SessionResponse),
        (status = 400, description = "Invalid request")
    ),
    tag = "sessions"
)]
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSessionRequest>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    let session = state
        .store
        .create_session(
            &req.user_id,
            NewSession {
                title: req.title,
                context: req.context.unwrap_or_default(),
                messages: req.messages.unwrap_or_default(),
                product_context: req.product_context,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            success: true,
            chat: session_to_payload(session),
        }),
    ))
}

/// List the caller's active chat sessions, most recently updated first
#[utoipa::path(
    get,
    path = "/api/sessions",
    params(
        ("user_id" = String, Query, description = "Owning user")
    ),
    responses(
        (status = 200, description = "Session summaries", body = SessionListResponse)
    ),
    tag = "sessions"
)]
pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<SessionListResponse>> {
    let summaries = state.store.list_sessions(&query.user_id).await?;

    Ok(Json(SessionListResponse {
        success: true,
        chats: summaries.into_iter().map(summary_to_payload).collect(),
    }))
}

/// Get a single chat session with all messages
#[utoipa::path(
    get,
    path = "/api/sessions/{session_id}",
    params(
        ("session_id" = String, Path, description = "Session ID"),
        ("user_id" = String, Query, description = "Owning user")
    ),
    responses(
        (status = 200, description = "Session details", body = SessionResponse),
        (status = 404, description = "Session not found")
    ),
    tag = "sessions"
)]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<SessionResponse>> {
    let session = state
        .store
        .get_session(&session_id, &query.user_id)
        .await?
        .ok_or(ApiError::SessionNotFound(session_id))?;

    Ok(Json(SessionResponse {
        success: true,
        chat: session_to_payload(session),
    }))
}

/// Replace a session's title, context, or messages wholesale
#[utoipa::path(
    put,
    path = "/api/sessions/{session_id}",
    params(
        ("session_id" = String, Path, description = "Session ID")
    ),
    request_body = UpdateSessionRequest,
    responses(
        (status = 200, description = "Session updated", body = SessionResponse),
        (status = 404, description = "Session not found")
    ),
    tag = "sessions"
)]
pub async fn update_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<UpdateSessionRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let session = state
        .store
        .update_session(
            &session_id,
            &req.user_id,
            SessionUpdate {
                title: req.title,
                context: req.context,
                messages: req.messages,
            },
        )
        .await?
        .ok_or(ApiError::SessionNotFound(session_id))?;

    Ok(Json(SessionResponse {
        success: true,
        chat: session_to_payload(session),
    }))
}

/// Append messages to the end of a session's conversation
#[utoipa::path(
    post,
    path = "/api/sessions/{session_id}/messages",
    params(
        ("session_id" = String, Path, description = "Session ID")
    ),
    request_body = AppendMessagesRequest,
    responses(
        (status = 200, description = "Messages appended", body = AppendMessagesResponse),
        (status = 400, description = "Empty messages array"),
        (status = 404, description = "Session not found")
    ),
    tag = "sessions"
)]
pub async fn append_messages(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<AppendMessagesRequest>,
) -> ApiResult<Json<AppendMessagesResponse>> {
    if req.messages.is_empty() {
        return Err(ApiError::BadRequest(
            "Messages array is required".to_string(),
        ));
    }

    let session = state
        .store
        .append_messages(&session_id, &req.user_id, req.messages)
        .await?
        .ok_or(ApiError::SessionNotFound(session_id))?;

    Ok(Json(AppendMessagesResponse {
        success: true,
        chat: AppendedSessionPayload {
            id: session.id,
            title: session.title,
            message_count: session.messages.len(),
            updated_at: session.updated_at,
        },
    }))
}

/// Soft-delete a chat session
#[utoipa::path(
    delete,
    path = "/api/sessions/{session_id}",
    params(
        ("session_id" = String, Path, description = "Session ID"),
        ("user_id" = String, Query, description = "Owning user")
    ),
    responses(
        (status = 200, description = "Session deleted", body = DeleteSessionResponse),
        (status = 404, description = "Session not found")
    ),
    tag = "sessions"
)]
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<DeleteSessionResponse>> {
    let deleted = state
        .store
        .soft_delete_session(&session_id, &query.user_id)
        .await?;

    if !deleted {
        return Err(ApiError::SessionNotFound(session_id));
    }

    Ok(Json(DeleteSessionResponse {
        success: true,
        message: "Chat deleted successfully".to_string(),
    }))
}

fn session_to_payload(session: ChatSession) -> SessionPayload {
    SessionPayload {
        id: session.id,
        title: session.title,
        context: session.context,
        messages: session.messages,
        product_context: session.product_context,
        created_at: session.created_at,
        updated_at: session.updated_at,
    }
}

fn summary_to_payload(summary: SessionSummary) -> SummaryPayload {
    SummaryPayload {
        id: summary.id,
        title: summary.title,
        crop: summary.crop,
        message_count: summary.message_count,
        last_message: summary.last_message,
        updated_at: summary.updated_at,
        created_at: summary.created_at,
    }
}
