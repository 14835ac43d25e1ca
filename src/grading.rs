use std::collections::HashMap;
use tracing::{debug, info};

use crate::answer_key::{NO_MATCH, resolve_correct_index};
use crate::errors::{SessionError, SessionResult};
use crate::models::{AnswerRecord, GradedQuiz, Quiz};

/// Grade a quiz against the submitted answers.
///
/// Pure and idempotent: the same inputs always produce the same grade, so
/// the result can double as the local score preview and be re-run later for
/// reconciliation against a server-computed score.
///
/// Every question yields exactly one record, in question order. Unanswered
/// questions are recorded with `selected_option_index = -1` rather than
/// skipped, keeping the records 1:1 with the question sequence.
pub fn grade(quiz: &Quiz, answers: &HashMap<usize, usize>) -> SessionResult<GradedQuiz> {
    if quiz.questions.is_empty() {
        return Err(SessionError::validation(
            "quiz must have at least one question to be graded",
        ));
    }

    let mut per_question = Vec::with_capacity(quiz.questions.len());

    for (index, question) in quiz.questions.iter().enumerate() {
        let correct_option_index =
            resolve_correct_index(&question.options, &question.correct_answer);
        let selected_option_index = answers
            .get(&index)
            .map(|selected| *selected as i32)
            .unwrap_or(NO_MATCH);

        // An unresolved answer key can never grade as correct; the record's
        // correct_option_index keeps the ambiguity visible to the caller.
        let is_correct =
            correct_option_index != NO_MATCH && selected_option_index == correct_option_index;

        if correct_option_index == NO_MATCH {
            debug!(
                question_id = %question.id,
                descriptor = %question.correct_answer,
                "Answer key did not resolve to an option index"
            );
        }

        per_question.push(AnswerRecord {
            question_id: question.id,
            selected_option_index,
            correct_option_index,
            is_correct,
        });
    }

    let correct = per_question.iter().filter(|r| r.is_correct).count();
    let total = per_question.len();
    let score = ((correct as f64 / total as f64) * 100.0).round() as i32;

    info!(
        quiz_id = %quiz.id,
        total_questions = total,
        correct_answers = correct,
        score,
        "Quiz graded"
    );

    Ok(GradedQuiz {
        per_question,
        score,
    })
}
