//! Quiz engine error types.
//!
//! Every variant is recoverable: the controller is left in a consistent
//! state and the caller may retry with different criteria or reset.

use thiserror::Error;

/// Errors surfaced by the quiz engine and the bank mutation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// The bank holds no questions at all.
    #[error("no questions available yet, add questions to the bank to begin")]
    EmptyBank,

    /// The filters left no candidate questions.
    #[error("no questions match the selected modules/types")]
    NoMatchingQuestions,

    /// A transition that needs an open session was requested without one.
    #[error("no quiz session is in progress")]
    NoActiveSession,

    /// A new session was requested before the previous one was reset.
    #[error("a quiz session is already active, reset it before starting another")]
    SessionActive,

    /// A candidate question failed validation.
    #[error("invalid question payload: {}", details.join("; "))]
    InvalidQuestionPayload { details: Vec<String> },
}

impl QuizError {
    /// Returns the field-level validation messages, if any.
    pub fn details(&self) -> &[String] {
        match self {
            QuizError::InvalidQuestionPayload { details } => details,
            _ => &[],
        }
    }
}
