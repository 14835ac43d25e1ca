#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

use study_sessions::models::{
    Card, ChatReply, ChatTurn, FlashcardSet, Question, Quiz, QuizSubmissionAck,
};
use study_sessions::RemoteGateway;

/// In-memory gateway for integration tests: serves canned data, records
/// every call, and can be switched into a failing state to simulate an
/// unreachable backend.
#[derive(Default)]
pub struct MockGateway {
    pub flashcard_set: Mutex<Option<FlashcardSet>>,
    pub quiz: Mutex<Option<Quiz>>,
    pub chat_history: Mutex<Vec<ChatTurn>>,
    pub reviews: Mutex<Vec<(Uuid, usize)>>,
    pub star_toggles: Mutex<Vec<Uuid>>,
    pub submissions: Mutex<Vec<(Uuid, HashMap<usize, usize>)>>,
    pub server_score: Mutex<Option<i32>>,
    pub offline: AtomicBool,
}

impl MockGateway {
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_reachable(&self, operation: &str) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("{}: failed to connect to backend", operation));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteGateway for MockGateway {
    async fn fetch_flashcard_set(&self, _document_id: Uuid) -> Result<Option<FlashcardSet>> {
        self.check_reachable("fetch_flashcard_set")?;
        Ok(self.flashcard_set.lock().unwrap().clone())
    }

    async fn record_review(&self, card_id: Uuid, position_index: usize) -> Result<()> {
        self.check_reachable("record_review")?;
        self.reviews.lock().unwrap().push((card_id, position_index));
        Ok(())
    }

    async fn toggle_star(&self, card_id: Uuid) -> Result<()> {
        self.check_reachable("toggle_star")?;
        self.star_toggles.lock().unwrap().push(card_id);
        Ok(())
    }

    async fn delete_flashcard_set(&self, _set_id: Uuid) -> Result<()> {
        self.check_reachable("delete_flashcard_set")?;
        *self.flashcard_set.lock().unwrap() = None;
        Ok(())
    }

    async fn fetch_quiz(&self, _document_id: Uuid) -> Result<Option<Quiz>> {
        self.check_reachable("fetch_quiz")?;
        Ok(self.quiz.lock().unwrap().clone())
    }

    async fn submit_quiz(
        &self,
        quiz_id: Uuid,
        answers: &HashMap<usize, usize>,
    ) -> Result<QuizSubmissionAck> {
        self.check_reachable("submit_quiz")?;
        self.submissions
            .lock()
            .unwrap()
            .push((quiz_id, answers.clone()));
        Ok(QuizSubmissionAck {
            score: self.server_score.lock().unwrap().unwrap_or(0),
            per_question: Vec::new(),
        })
    }

    async fn delete_quiz(&self, _quiz_id: Uuid) -> Result<()> {
        self.check_reachable("delete_quiz")?;
        *self.quiz.lock().unwrap() = None;
        Ok(())
    }

    async fn fetch_chat_history(&self, _document_id: Uuid) -> Result<Vec<ChatTurn>> {
        self.check_reachable("fetch_chat_history")?;
        Ok(self.chat_history.lock().unwrap().clone())
    }

    async fn send_chat_turn(&self, _document_id: Uuid, text: &str) -> Result<ChatReply> {
        self.check_reachable("send_chat_turn")?;
        Ok(ChatReply {
            answer: format!("The document says: {text}"),
            supporting_references: Some(vec!["page 3".to_string()]),
        })
    }
}

pub fn sample_card(front: &str, back: &str) -> Card {
    Card {
        id: Uuid::new_v4(),
        front: front.to_string(),
        back: back.to_string(),
        starred: false,
        last_reviewed_at: None,
    }
}

pub fn sample_set(document_id: Uuid, card_count: usize) -> FlashcardSet {
    FlashcardSet {
        id: Uuid::new_v4(),
        document_id,
        cards: (0..card_count)
            .map(|i| sample_card(&format!("term {i}"), &format!("definition {i}")))
            .collect(),
        created_at: Utc::now(),
    }
}

pub fn sample_question(options: &[&str], correct_answer: &str) -> Question {
    Question {
        id: Uuid::new_v4(),
        prompt: "Pick the right option".to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answer: correct_answer.to_string(),
        explanation: None,
    }
}

pub fn sample_quiz(document_id: Uuid, questions: Vec<Question>) -> Quiz {
    Quiz {
        id: Uuid::new_v4(),
        document_id,
        title: Some("Chapter quiz".to_string()),
        questions,
        score: None,
        created_at: Utc::now(),
    }
}
