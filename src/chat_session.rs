use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::{SessionError, SessionResult, classify_remote_error};
use crate::gateway::SharedGateway;
use crate::models::{ChatRole, ChatTurn};

/// Fixed assistant text substituted when the backend cannot answer.
pub const CHAT_FAILURE_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

/// Owns the ordered chat history for one document view.
///
/// History is append-only. Sends are optimistic: the user turn lands in the
/// history immediately, and every send attempt produces exactly two turns
/// (user text, then either the backend's answer or the fixed failure text),
/// so the history length always matches the displayed send attempts.
///
/// Clones share the same history; concurrent sends queue behind an internal
/// lock so turns land in send order instead of interleaving.
#[derive(Clone)]
pub struct ChatSessionController {
    gateway: SharedGateway,
    document_id: Uuid,
    history: Arc<RwLock<Vec<ChatTurn>>>,
    send_lock: Arc<Mutex<()>>,
}

impl ChatSessionController {
    pub fn new(gateway: SharedGateway, document_id: Uuid) -> Self {
        Self {
            gateway,
            document_id,
            history: Arc::new(RwLock::new(Vec::new())),
            send_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Replace the local history with the backend's copy, as done when the
    /// chat view (re)mounts.
    pub async fn load_history(&self) -> SessionResult<()> {
        let turns = self
            .gateway
            .fetch_chat_history(self.document_id)
            .await
            .map_err(SessionError::Remote)?;

        crate::log_session_success!(
            "chat_session",
            "load_history",
            count = turns.len(),
            "history replaced from backend"
        );
        *self.history.write().await = turns;
        Ok(())
    }

    /// Snapshot of the current history.
    pub async fn history(&self) -> Vec<ChatTurn> {
        self.history.read().await.clone()
    }

    pub async fn turn_count(&self) -> usize {
        self.history.read().await.len()
    }

    /// Send one user message. Blank or whitespace-only text is rejected
    /// before anything is appended or sent. A remote failure is not an
    /// error to the caller: the fallback assistant turn carries it.
    pub async fn send_message(&self, text: &str) -> SessionResult<ChatTurn> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SessionError::validation("message must not be blank"));
        }

        // Serializes concurrent sends; waiters queue in send order so no
        // user turn can land between another send's user and assistant turns.
        let _send_guard = self.send_lock.lock().await;

        let user_turn = ChatTurn::user(trimmed);
        self.history.write().await.push(user_turn);
        debug!(document_id = %self.document_id, "User chat turn appended");

        let assistant_turn = match self.gateway.send_chat_turn(self.document_id, trimmed).await {
            Ok(reply) => {
                info!(
                    document_id = %self.document_id,
                    answer_length = reply.answer.len(),
                    reference_count = reply
                        .supporting_references
                        .as_ref()
                        .map(|r| r.len())
                        .unwrap_or(0),
                    "Assistant reply received"
                );
                ChatTurn::assistant(reply.answer, reply.supporting_references)
            }
            Err(error) => {
                let class = classify_remote_error(&error);
                crate::log_gateway_fallback!(
                    "chat_session",
                    "send_chat_turn",
                    error = error,
                    "substituting fixed assistant turn"
                );
                debug!(error_class = class, "Assistant turn replaced with fallback");
                ChatTurn::assistant(CHAT_FAILURE_MESSAGE, None)
            }
        };

        self.history.write().await.push(assistant_turn.clone());
        Ok(assistant_turn)
    }
}
