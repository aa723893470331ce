use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use farmwise_advisory::{build_prompt, parse_reply, ChatContext, ChatFlow, ChatTurn};
use farmwise_llm::{GenerateOptions, GenerateRequest};
use farmwise_persist::ProductContext;

use crate::{
    config::GeminiConfig,
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequestBody {
    pub message: String,
    #[serde(default)]
    pub context: ChatContext,
    #[serde(default)]
    pub conversation_history: Vec<ChatTurn>,
    #[serde(default)]
    pub product_context: Option<ProductContext>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponseBody {
    pub success: bool,
    pub response: String,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Advisory turn endpoint
///
/// Without a `userId` the turn is stateless: the prompt is built from the
/// request's own context and history and nothing is persisted. With a
/// `userId` the turn drives a session flow — no `sessionId` lazily creates
/// one, a `sessionId` resumes it — and the response echoes the session id.
#[utoipa::path(
    post,
    path = "/api/advisory/chat",
    request_body = ChatRequestBody,
    responses(
        (status = 200, description = "Advisory turn completed", body = ChatResponseBody),
        (status = 400, description = "Missing or blank message"),
        (status = 404, description = "Session not found"),
        (status = 502, description = "Advisory service unavailable")
    ),
    tag = "advisory"
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatRequestBody>,
) -> ApiResult<Json<ChatResponseBody>> {
    let message = body.message.trim();
    if message.is_empty() {
        return Err(ApiError::BadRequest("Message is required".to_string()));
    }

    match body.user_id {
        Some(user_id) => {
            stateful_turn(
                &state,
                user_id,
                body.session_id,
                body.context,
                body.product_context,
                message,
            )
            .await
        }
        None => {
            stateless_turn(
                &state,
                &body.context,
                body.product_context.as_ref(),
                &body.conversation_history,
                message,
            )
            .await
        }
    }
}

async fn stateful_turn(
    state: &AppState,
    user_id: String,
    session_id: Option<String>,
    context: ChatContext,
    product_context: Option<ProductContext>,
    message: &str,
) -> ApiResult<Json<ChatResponseBody>> {
    let gemini = &state.config.gemini;

    let mut flow = match session_id {
        Some(session_id) => {
            ChatFlow::resume(state.store.clone(), state.llm.clone(), user_id, &session_id).await?
        }
        None => ChatFlow::new(
            state.store.clone(),
            state.llm.clone(),
            user_id,
            context,
            product_context,
        ),
    }
    .with_model(gemini.model.clone())
    .with_options(generate_options(gemini));

    let outcome = flow.send(message).await?;

    Ok(Json(ChatResponseBody {
        success: true,
        response: outcome.advice,
        explanation: outcome.explanation,
        session_id: Some(outcome.session_id),
    }))
}

async fn stateless_turn(
    state: &AppState,
    context: &ChatContext,
    product_context: Option<&ProductContext>,
    history: &[ChatTurn],
    message: &str,
) -> ApiResult<Json<ChatResponseBody>> {
    let gemini = &state.config.gemini;
    let prompt = build_prompt(context, product_context, history, message);

    let request =
        GenerateRequest::new(&gemini.model, prompt).with_options(generate_options(gemini));
    let response = state
        .llm
        .generate(request)
        .await
        .map_err(ApiError::Upstream)?;

    let parsed = parse_reply(&response.text, context);

    Ok(Json(ChatResponseBody {
        success: true,
        response: parsed.advice,
        explanation: parsed.explanation,
        session_id: None,
    }))
}

fn generate_options(gemini: &GeminiConfig) -> GenerateOptions {
    GenerateOptions::new()
        .temperature(gemini.temperature)
        .max_output_tokens(gemini.max_output_tokens)
}
