use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use uuid::Uuid;

use crate::models::{ChatReply, ChatTurn, FlashcardSet, Quiz, QuizSubmissionAck};

/// Backend REST boundary consumed by the session controllers.
///
/// The backend is the source of truth; controllers re-fetch through this
/// trait on (re)initialization and otherwise call it best-effort. Any failure
/// surfaces as a generic transport error that the controllers degrade from
/// uniformly.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn fetch_flashcard_set(&self, document_id: Uuid) -> Result<Option<FlashcardSet>>;
    async fn record_review(&self, card_id: Uuid, position_index: usize) -> Result<()>;
    async fn toggle_star(&self, card_id: Uuid) -> Result<()>;
    async fn delete_flashcard_set(&self, set_id: Uuid) -> Result<()>;
    async fn fetch_quiz(&self, document_id: Uuid) -> Result<Option<Quiz>>;
    async fn submit_quiz(
        &self,
        quiz_id: Uuid,
        answers: &HashMap<usize, usize>,
    ) -> Result<QuizSubmissionAck>;
    async fn delete_quiz(&self, quiz_id: Uuid) -> Result<()>;
    async fn fetch_chat_history(&self, document_id: Uuid) -> Result<Vec<ChatTurn>>;
    async fn send_chat_turn(&self, document_id: Uuid, text: &str) -> Result<ChatReply>;
}

pub type SharedGateway = Arc<dyn RemoteGateway>;

/// Response envelope used by every backend endpoint.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    success: bool,
    data: Option<T>,
    message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    fn into_data(self, operation: &str) -> Result<T> {
        if !self.success {
            let message = self
                .message
                .unwrap_or_else(|| "backend reported failure".to_string());
            return Err(anyhow::anyhow!("{} failed: {}", operation, message));
        }
        self.data
            .ok_or_else(|| anyhow::anyhow!("{} returned no data", operation))
    }
}

#[derive(Debug, Serialize)]
struct SubmitQuizRequest<'a> {
    answers: &'a HashMap<usize, usize>,
}

/// Gateway implementation over the study-assistant REST backend.
#[derive(Debug, Clone)]
pub struct HttpRemoteGateway {
    client: Client,
    base_url: String,
}

impl HttpRemoteGateway {
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T>(&self, operation: &str, path: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.client.get(self.url(path)).send().await?;
        Self::parse_envelope(operation, response).await
    }

    async fn post_json<T, B>(&self, operation: &str, path: &str, body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::parse_envelope(operation, response).await
    }

    async fn delete_json(&self, operation: &str, path: &str) -> Result<()> {
        let response = self.client.delete(self.url(path)).send().await?;
        let _: serde_json::Value = Self::parse_envelope(operation, response).await?;
        Ok(())
    }

    async fn parse_envelope<T>(operation: &str, response: reqwest::Response) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(
                operation,
                status = %status,
                error = %error_text,
                "Gateway request failed"
            );
            return Err(anyhow::anyhow!(
                "{} failed with status {}: {}",
                operation,
                status,
                error_text
            ));
        }

        let envelope: ApiEnvelope<T> = response.json().await?;
        envelope.into_data(operation)
    }
}

#[async_trait]
impl RemoteGateway for HttpRemoteGateway {
    async fn fetch_flashcard_set(&self, document_id: Uuid) -> Result<Option<FlashcardSet>> {
        // The backend returns every set for the document; the newest one is
        // the working set, matching how the client picks response.data[0].
        let sets: Vec<FlashcardSet> = self
            .get_json(
                "fetch_flashcard_set",
                &format!("/api/documents/{}/flashcards", document_id),
            )
            .await?;
        info!(
            document_id = %document_id,
            set_count = sets.len(),
            "Fetched flashcard sets"
        );
        Ok(sets.into_iter().next())
    }

    async fn record_review(&self, card_id: Uuid, position_index: usize) -> Result<()> {
        let _: serde_json::Value = self
            .post_json(
                "record_review",
                &format!("/api/flashcards/{}/review", card_id),
                &json!({ "position": position_index }),
            )
            .await?;
        Ok(())
    }

    async fn toggle_star(&self, card_id: Uuid) -> Result<()> {
        let _: serde_json::Value = self
            .post_json(
                "toggle_star",
                &format!("/api/flashcards/{}/star", card_id),
                &json!({}),
            )
            .await?;
        Ok(())
    }

    async fn delete_flashcard_set(&self, set_id: Uuid) -> Result<()> {
        self.delete_json(
            "delete_flashcard_set",
            &format!("/api/flashcard-sets/{}", set_id),
        )
        .await
    }

    async fn fetch_quiz(&self, document_id: Uuid) -> Result<Option<Quiz>> {
        let quizzes: Vec<Quiz> = self
            .get_json(
                "fetch_quiz",
                &format!("/api/documents/{}/quizzes", document_id),
            )
            .await?;
        info!(
            document_id = %document_id,
            quiz_count = quizzes.len(),
            "Fetched quizzes"
        );
        Ok(quizzes.into_iter().next())
    }

    async fn submit_quiz(
        &self,
        quiz_id: Uuid,
        answers: &HashMap<usize, usize>,
    ) -> Result<QuizSubmissionAck> {
        let request = SubmitQuizRequest { answers };
        self.post_json(
            "submit_quiz",
            &format!("/api/quizzes/{}/submit", quiz_id),
            &request,
        )
        .await
    }

    async fn delete_quiz(&self, quiz_id: Uuid) -> Result<()> {
        self.delete_json("delete_quiz", &format!("/api/quizzes/{}", quiz_id))
            .await
    }

    async fn fetch_chat_history(&self, document_id: Uuid) -> Result<Vec<ChatTurn>> {
        self.get_json(
            "fetch_chat_history",
            &format!("/api/documents/{}/chat", document_id),
        )
        .await
    }

    async fn send_chat_turn(&self, document_id: Uuid, text: &str) -> Result<ChatReply> {
        self.post_json(
            "send_chat_turn",
            &format!("/api/documents/{}/chat", document_id),
            &json!({ "message": text }),
        )
        .await
    }
}
