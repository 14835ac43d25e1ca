use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: Uuid,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub starred: bool,
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashcardSet {
    pub id: Uuid,
    pub document_id: Uuid,
    pub cards: Vec<Card>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub prompt: String,
    pub options: Vec<String>, // insertion order defines the index space
    // Stored representation of the right answer. Usually carries a one-based
    // ordinal prefix ("2) ...") and is not guaranteed to equal any option
    // text byte-for-byte.
    pub correct_answer: String,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizStatus {
    NotStarted,
    InProgress,
    Submitted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub id: Uuid,
    pub document_id: Uuid,
    pub title: Option<String>,
    pub questions: Vec<Question>,
    // Cached 0-100 score from a previous submission, if any.
    pub score: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Per-question grading outcome. Only the grading engine constructs these;
/// `-1` in either index field is the "undetermined" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: Uuid,
    pub selected_option_index: i32,
    pub correct_option_index: i32,
    pub is_correct: bool,
}

impl AnswerRecord {
    /// The answer key could not be mapped to an option index, so this
    /// record means "cannot determine correctness", not "wrong".
    pub fn is_unresolved(&self) -> bool {
        self.correct_option_index == -1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradedQuiz {
    pub per_question: Vec<AnswerRecord>,
    pub score: i32,
}

impl GradedQuiz {
    pub fn correct_count(&self) -> usize {
        self.per_question.iter().filter(|r| r.is_correct).count()
    }

    pub fn incorrect_count(&self) -> usize {
        self.per_question.len() - self.correct_count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supporting_references: Option<Vec<String>>,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            timestamp: Utc::now(),
            supporting_references: None,
        }
    }

    pub fn assistant(content: impl Into<String>, supporting_references: Option<Vec<String>>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            supporting_references,
        }
    }
}

/// Assistant payload returned by the backend for a chat turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub answer: String,
    #[serde(default)]
    pub supporting_references: Option<Vec<String>>,
}

/// Server acknowledgement for a quiz submission. The locally computed grade
/// stays authoritative for display; this is only reconciled in logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSubmissionAck {
    pub score: i32,
    #[serde(default)]
    pub per_question: Vec<AnswerRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_record_unresolved_flag() {
        let record = AnswerRecord {
            question_id: Uuid::new_v4(),
            selected_option_index: 2,
            correct_option_index: -1,
            is_correct: false,
        };
        assert!(record.is_unresolved());

        let wrong = AnswerRecord {
            question_id: Uuid::new_v4(),
            selected_option_index: 2,
            correct_option_index: 0,
            is_correct: false,
        };
        assert!(!wrong.is_unresolved());
    }

    #[test]
    fn test_graded_quiz_counts() {
        let graded = GradedQuiz {
            per_question: vec![
                AnswerRecord {
                    question_id: Uuid::new_v4(),
                    selected_option_index: 0,
                    correct_option_index: 0,
                    is_correct: true,
                },
                AnswerRecord {
                    question_id: Uuid::new_v4(),
                    selected_option_index: 1,
                    correct_option_index: 0,
                    is_correct: false,
                },
            ],
            score: 50,
        };

        assert_eq!(graded.correct_count(), 1);
        assert_eq!(graded.incorrect_count(), 1);
    }

    #[test]
    fn test_chat_turn_constructors() {
        let user_turn = ChatTurn::user("What is spaced repetition?");
        assert_eq!(user_turn.role, ChatRole::User);
        assert!(user_turn.supporting_references.is_none());

        let assistant_turn =
            ChatTurn::assistant("A review technique.", Some(vec!["chunk-1".to_string()]));
        assert_eq!(assistant_turn.role, ChatRole::Assistant);
        assert_eq!(
            assistant_turn.supporting_references.as_deref(),
            Some(&["chunk-1".to_string()][..])
        );
    }

    #[test]
    fn test_chat_role_serialization() {
        assert_eq!(serde_json::to_string(&ChatRole::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&ChatRole::Assistant).unwrap(),
            "\"assistant\""
        );
    }
}
