//! The session-lifecycle state machine for advisory turns.
//!
//! A flow starts `New` (no session id yet), lazily creates its session on
//! the first send, and stays `Active` until ended. A soft-deleted session
//! resumes straight into `Ended` and refuses further sends.

use std::sync::Arc;

use thiserror::Error;

use farmwise_llm::{GenerateOptions, GenerateRequest, GenerativeClient, DEFAULT_MODEL};
use farmwise_persist::{NewSession, PersistError, ProductContext, SessionStore, StoredMessage};

use crate::parse::parse_reply;
use crate::prompt::{build_prompt, initial_greeting};
use crate::types::{ChatContext, ChatTurn};

#[derive(Debug, Clone, PartialEq)]
pub enum FlowState {
    New,
    Active { session_id: String },
    Ended,
}

/// Result of one successful advisory turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub session_id: String,
    pub advice: String,
    pub explanation: String,
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Message is required")]
    EmptyMessage,

    #[error("Session has ended; start a new chat")]
    SessionEnded,

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error("Generation failed: {0}")]
    Generation(#[source] anyhow::Error),
}

/// Orchestrates advisory turns against one session.
///
/// Ordering under concurrent sends is guaranteed by the store's atomic
/// append, not by an in-process lock; a racing pair of turns may interleave
/// but both land intact.
pub struct ChatFlow {
    store: Arc<dyn SessionStore>,
    llm: Arc<dyn GenerativeClient>,
    user_id: String,
    context: ChatContext,
    product_context: Option<ProductContext>,
    model: String,
    options: GenerateOptions,
    state: FlowState,
}

impl std::fmt::Debug for ChatFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatFlow")
            .field("user_id", &self.user_id)
            .field("model", &self.model)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl ChatFlow {
    /// Start a fresh flow; the session is created lazily on the first send
    pub fn new(
        store: Arc<dyn SessionStore>,
        llm: Arc<dyn GenerativeClient>,
        user_id: impl Into<String>,
        context: ChatContext,
        product_context: Option<ProductContext>,
    ) -> Self {
        Self {
            store,
            llm,
            user_id: user_id.into(),
            context,
            product_context,
            model: DEFAULT_MODEL.to_string(),
            options: GenerateOptions::default(),
            state: FlowState::New,
        }
    }

    /// Resume an existing session.
    ///
    /// A session that is missing (or owned by someone else) is an error; a
    /// soft-deleted one resumes as `Ended` and refuses further sends.
    pub async fn resume(
        store: Arc<dyn SessionStore>,
        llm: Arc<dyn GenerativeClient>,
        user_id: impl Into<String>,
        session_id: &str,
    ) -> Result<Self, FlowError> {
        let user_id = user_id.into();
        let session = store
            .get_session(session_id, &user_id)
            .await?
            .ok_or_else(|| FlowError::SessionNotFound(session_id.to_string()))?;

        let state = if session.is_active {
            FlowState::Active {
                session_id: session.id.clone(),
            }
        } else {
            FlowState::Ended
        };

        Ok(Self {
            store,
            llm,
            user_id,
            context: session.context.into(),
            product_context: session.product_context,
            model: DEFAULT_MODEL.to_string(),
            options: GenerateOptions::default(),
            state,
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn session_id(&self) -> Option<&str> {
        match &self.state {
            FlowState::Active { session_id } => Some(session_id),
            _ => None,
        }
    }

    /// Run one advisory turn.
    ///
    /// On upstream failure nothing is appended; the turn leaves the session
    /// exactly as it was and the user must resend.
    pub async fn send(&mut self, message: &str) -> Result<TurnOutcome, FlowError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(FlowError::EmptyMessage);
        }
        if self.state == FlowState::Ended {
            return Err(FlowError::SessionEnded);
        }

        if self.state == FlowState::New {
            let greeting = initial_greeting(self.product_context.as_ref());
            let session = self
                .store
                .create_session(
                    &self.user_id,
                    NewSession {
                        title: None,
                        context: self.context.clone().into(),
                        messages: vec![StoredMessage::assistant(greeting, None)],
                        product_context: self.product_context.clone(),
                    },
                )
                .await?;
            tracing::debug!(session_id = %session.id, "Created chat session");
            self.state = FlowState::Active {
                session_id: session.id,
            };
        }

        let session_id = match &self.state {
            FlowState::Active { session_id } => session_id.clone(),
            // New was promoted above, Ended rejected above
            _ => return Err(FlowError::SessionEnded),
        };

        let session = self
            .store
            .get_session(&session_id, &self.user_id)
            .await?
            .ok_or_else(|| FlowError::SessionNotFound(session_id.clone()))?;

        if !session.is_active {
            self.state = FlowState::Ended;
            return Err(FlowError::SessionEnded);
        }

        let context: ChatContext = session.context.into();
        let history: Vec<ChatTurn> = session
            .messages
            .into_iter()
            .map(ChatTurn::from)
            .collect();
        let prompt = build_prompt(
            &context,
            session.product_context.as_ref(),
            &history,
            message,
        );

        let request =
            GenerateRequest::new(&self.model, prompt).with_options(self.options.clone());
        let response = self
            .llm
            .generate(request)
            .await
            .map_err(FlowError::Generation)?;

        let parsed = parse_reply(&response.text, &context);

        self.store
            .append_messages(
                &session_id,
                &self.user_id,
                vec![
                    StoredMessage::user(message),
                    StoredMessage::assistant(
                        parsed.advice.clone(),
                        Some(parsed.explanation.clone()),
                    ),
                ],
            )
            .await?
            .ok_or_else(|| FlowError::SessionNotFound(session_id.clone()))?;

        tracing::debug!(session_id = %session_id, "Advisory turn completed");

        Ok(TurnOutcome {
            session_id,
            advice: parsed.advice,
            explanation: parsed.explanation,
        })
    }

    /// Soft-delete an active session and stop accepting turns.
    /// A flow that never created a session stays as it is.
    pub async fn end(&mut self) -> Result<(), FlowError> {
        if let FlowState::Active { session_id } = &self.state {
            let session_id = session_id.clone();
            self.store
                .soft_delete_session(&session_id, &self.user_id)
                .await?;
            tracing::debug!(session_id = %session_id, "Chat session ended");
            self.state = FlowState::Ended;
        }
        Ok(())
    }
}
