use std::collections::HashMap;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{ErrorContext, SessionError, SessionResult, classify_remote_error};
use crate::gateway::SharedGateway;
use crate::grading;
use crate::models::{GradedQuiz, Quiz, QuizStatus};

/// Owns the quiz submission lifecycle: `NotStarted -> InProgress ->
/// Submitted`, with answers freely changeable until the one-shot `submit`.
pub struct QuizSessionController {
    gateway: SharedGateway,
    quiz: Option<Quiz>,
    status: QuizStatus,
    answers: HashMap<usize, usize>,
    graded: Option<GradedQuiz>,
}

impl QuizSessionController {
    pub fn new(gateway: SharedGateway) -> Self {
        Self {
            gateway,
            quiz: None,
            status: QuizStatus::NotStarted,
            answers: HashMap::new(),
            graded: None,
        }
    }

    /// Re-fetch the quiz for a document and reset the lifecycle.
    pub async fn load(&mut self, document_id: Uuid) -> SessionResult<bool> {
        crate::log_session_start!("quiz_session", "load", document_id = document_id);
        let quiz = self
            .gateway
            .fetch_quiz(document_id)
            .await
            .map_err(SessionError::Remote)?;

        let found = quiz.is_some();
        self.quiz = quiz;
        self.status = QuizStatus::NotStarted;
        self.answers.clear();
        self.graded = None;
        Ok(found)
    }

    pub fn set_quiz(&mut self, quiz: Quiz) {
        self.quiz = Some(quiz);
        self.status = QuizStatus::NotStarted;
        self.answers.clear();
        self.graded = None;
    }

    pub fn status(&self) -> QuizStatus {
        self.status
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        self.quiz.as_ref()
    }

    /// Graded result view, available once submitted.
    pub fn result(&self) -> Option<&GradedQuiz> {
        self.graded.as_ref()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn start(&mut self) -> SessionResult<()> {
        let quiz = self
            .quiz
            .as_ref()
            .ok_or_else(|| SessionError::EmptySession("no quiz loaded".to_string()))?;

        if quiz.questions.is_empty() {
            return Err(SessionError::EmptySession(
                "quiz has no questions".to_string(),
            ));
        }

        if self.status != QuizStatus::NotStarted {
            return Err(SessionError::validation(format!(
                "quiz cannot be started from {:?} state",
                self.status
            )));
        }

        self.status = QuizStatus::InProgress;
        info!(quiz_id = %quiz.id, question_count = quiz.questions.len(), "Quiz started");
        Ok(())
    }

    /// Select (or change) the answer for one question. Valid only while the
    /// quiz is in progress; answers may be revised any number of times
    /// before submission.
    pub fn select_answer(&mut self, question_index: usize, option_index: usize) -> SessionResult<()> {
        if self.status != QuizStatus::InProgress {
            return Err(SessionError::validation(format!(
                "answers can only be selected while in progress, quiz is {:?}",
                self.status
            )));
        }

        let quiz = self.quiz.as_ref().expect("in-progress quiz is loaded");
        let question = quiz.questions.get(question_index).ok_or_else(|| {
            SessionError::validation(format!(
                "question index {} out of range for {} questions",
                question_index,
                quiz.questions.len()
            ))
        })?;

        if option_index >= question.options.len() {
            return Err(SessionError::validation(format!(
                "option index {} out of range for {} options",
                option_index,
                question.options.len()
            )));
        }

        self.answers.insert(question_index, option_index);
        Ok(())
    }

    /// Grade locally and persist best-effort. One-shot: a repeat call while
    /// already submitted returns the cached grade without re-grading or
    /// calling the backend. On remote failure the local grade stays
    /// authoritative for display; local and server scores are allowed to
    /// diverge there, and the divergence is logged rather than masked.
    pub async fn submit(&mut self) -> SessionResult<GradedQuiz> {
        if self.status == QuizStatus::Submitted {
            return Ok(self
                .graded
                .clone()
                .expect("submitted quiz has a cached grade"));
        }

        if self.status == QuizStatus::NotStarted {
            return Err(SessionError::validation(
                "quiz must be started before it can be submitted",
            ));
        }

        let quiz = self.quiz.as_ref().expect("in-progress quiz is loaded");
        let graded = grading::grade(quiz, &self.answers)?;
        let quiz_id = quiz.id;

        match self.gateway.submit_quiz(quiz_id, &self.answers).await {
            Ok(ack) => {
                if ack.score != graded.score {
                    warn!(
                        quiz_id = %quiz_id,
                        local_score = graded.score,
                        server_score = ack.score,
                        "Server-computed score diverges from local grade"
                    );
                }
            }
            Err(error) => {
                let err = SessionError::Remote(error);
                err.log_with_context(
                    &ErrorContext::new("submit_quiz", "quiz_session")
                        .with_id(&quiz_id.to_string()),
                );
            }
        }

        if let Some(quiz) = self.quiz.as_mut() {
            quiz.score = Some(graded.score);
        }
        self.status = QuizStatus::Submitted;
        self.graded = Some(graded.clone());

        info!(
            quiz_id = %quiz_id,
            score = graded.score,
            correct = graded.correct_count(),
            "Quiz submitted"
        );
        Ok(graded)
    }

    /// Delete the quiz on the backend and drop local session state.
    pub async fn delete(&mut self) -> SessionResult<()> {
        let quiz_id = match &self.quiz {
            Some(quiz) => quiz.id,
            None => {
                return Err(SessionError::EmptySession("no quiz loaded".to_string()));
            }
        };

        self.gateway
            .delete_quiz(quiz_id)
            .await
            .map_err(|error| {
                warn!(
                    quiz_id = %quiz_id,
                    error_class = classify_remote_error(&error),
                    "Quiz deletion failed"
                );
                SessionError::Remote(error)
            })?;

        self.quiz = None;
        self.status = QuizStatus::NotStarted;
        self.answers.clear();
        self.graded = None;
        Ok(())
    }
}
