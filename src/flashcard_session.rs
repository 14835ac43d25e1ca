use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::StarWritePolicy;
use crate::errors::{ErrorContext, SessionError, SessionResult, classify_remote_error};
use crate::gateway::SharedGateway;
use crate::models::{Card, FlashcardSet};

/// Observable state of a flashcard study session.
///
/// `Empty` is terminal until a non-empty set is selected; while cards exist
/// every transition stays in `Viewing`, so there is no out-of-range state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashcardSessionState {
    Empty,
    Viewing(usize),
}

/// Drives one flashcard study session: cyclic navigation over the working
/// copy of a set, review bookkeeping, and star toggling.
///
/// The controller exclusively owns its working copy for the session's
/// lifetime; the backend stays the source of truth and is re-read via
/// `load`.
pub struct FlashcardSessionController {
    gateway: SharedGateway,
    star_write_policy: StarWritePolicy,
    set: Option<FlashcardSet>,
    current_index: usize,
}

impl FlashcardSessionController {
    pub fn new(gateway: SharedGateway, star_write_policy: StarWritePolicy) -> Self {
        Self {
            gateway,
            star_write_policy,
            set: None,
            current_index: 0,
        }
    }

    /// Re-fetch the working set for a document from the backend.
    pub async fn load(&mut self, document_id: Uuid) -> SessionResult<()> {
        crate::log_session_start!("flashcard_session", "load", document_id = document_id);
        let set = self
            .gateway
            .fetch_flashcard_set(document_id)
            .await
            .map_err(SessionError::Remote)?;

        match set {
            Some(set) => self.select_set(set),
            None => {
                self.set = None;
                self.current_index = 0;
            }
        }
        Ok(())
    }

    /// Switch to a set. Position is never preserved across sets.
    pub fn select_set(&mut self, set: FlashcardSet) {
        info!(
            set_id = %set.id,
            card_count = set.cards.len(),
            "Flashcard set selected"
        );
        self.set = Some(set);
        self.current_index = 0;
    }

    pub fn state(&self) -> FlashcardSessionState {
        match &self.set {
            Some(set) if !set.cards.is_empty() => FlashcardSessionState::Viewing(self.current_index),
            _ => FlashcardSessionState::Empty,
        }
    }

    pub fn card_count(&self) -> usize {
        self.set.as_ref().map(|s| s.cards.len()).unwrap_or(0)
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.set.as_ref()?.cards.get(self.current_index)
    }

    /// Advance to the next card, wrapping past the end.
    pub fn next(&mut self) {
        self.advance(|index, count| (index + 1) % count);
    }

    /// Go back one card, wrapping past the start.
    pub fn previous(&mut self) {
        self.advance(|index, count| (index + count - 1) % count);
    }

    fn advance(&mut self, step: fn(usize, usize) -> usize) {
        let count = self.card_count();
        if count == 0 {
            return;
        }

        self.emit_review();
        self.current_index = step(self.current_index, count);
        debug!(
            card_index = self.current_index,
            card_count = count,
            "Flashcard navigation"
        );
    }

    /// Record a review of the current card, fire-and-forget. A failure is
    /// logged but never blocks or reverts navigation, and completions may
    /// arrive out of order relative to navigation.
    fn emit_review(&mut self) {
        let position = self.current_index;
        let Some(card) = self
            .set
            .as_mut()
            .and_then(|set| set.cards.get_mut(position))
        else {
            return;
        };

        card.last_reviewed_at = Some(Utc::now());
        let card_id = card.id;

        let gateway = self.gateway.clone();
        tokio::spawn(async move {
            if let Err(error) = gateway.record_review(card_id, position).await {
                warn!(
                    card_id = %card_id,
                    position,
                    error_class = classify_remote_error(&error),
                    error = %error,
                    "Failed to record flashcard review"
                );
            }
        });
    }

    /// Toggle the star on one card. Under the optimistic policy the local
    /// flip happens before the backend acknowledges and is not rolled back
    /// on failure; the error is surfaced so the caller can decide to retry.
    /// Under write-through, local state only changes after the ack.
    pub async fn toggle_star(&mut self, card_id: Uuid) -> SessionResult<bool> {
        let card_exists = self
            .set
            .as_ref()
            .is_some_and(|set| set.cards.iter().any(|c| c.id == card_id));
        if !card_exists {
            return Err(SessionError::validation(format!(
                "card '{}' is not in the active set",
                card_id
            )));
        }

        match self.star_write_policy {
            StarWritePolicy::Optimistic => {
                let starred = self.flip_star(card_id);
                if let Err(error) = self.gateway.toggle_star(card_id).await {
                    let err = SessionError::Remote(error);
                    err.log_with_context(
                        &ErrorContext::new("toggle_star", "flashcard_session")
                            .with_id(&card_id.to_string()),
                    );
                    return Err(err);
                }
                Ok(starred)
            }
            StarWritePolicy::WriteThrough => {
                self.gateway
                    .toggle_star(card_id)
                    .await
                    .map_err(SessionError::Remote)?;
                Ok(self.flip_star(card_id))
            }
        }
    }

    fn flip_star(&mut self, card_id: Uuid) -> bool {
        let card = self
            .set
            .as_mut()
            .and_then(|set| set.cards.iter_mut().find(|c| c.id == card_id))
            .expect("card presence checked before flipping");
        card.starred = !card.starred;
        card.starred
    }

    /// Delete the active set on the backend, then clear local state. This is
    /// the one flashcard mutation that is confirmed before applying locally,
    /// since dropping cards is not recoverable by a retry.
    pub async fn delete_set(&mut self) -> SessionResult<()> {
        let set_id = match &self.set {
            Some(set) => set.id,
            None => {
                return Err(SessionError::EmptySession(
                    "no flashcard set selected".to_string(),
                ));
            }
        };

        self.gateway
            .delete_flashcard_set(set_id)
            .await
            .map_err(SessionError::Remote)?;

        info!(set_id = %set_id, "Flashcard set deleted");
        self.set = None;
        self.current_index = 0;
        Ok(())
    }
}
