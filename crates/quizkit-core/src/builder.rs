//! Quiz builder: filters the bank and picks the questions for a session.

use std::collections::HashSet;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::model::{Question, QuestionType};

/// What the user asked for when starting a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizCriteria {
    /// Number of questions requested. Zero is treated as one.
    pub requested_count: usize,
    /// Allowed modules. Empty means no restriction.
    #[serde(default)]
    pub modules: HashSet<String>,
    /// Allowed question types. Empty means no restriction.
    #[serde(default)]
    pub types: HashSet<QuestionType>,
    /// Include machine-generated questions.
    #[serde(default)]
    pub include_generated: bool,
    /// Draw a random permutation instead of bank order.
    #[serde(default)]
    pub shuffle: bool,
    /// Hide module names while questions are displayed.
    #[serde(default)]
    pub hide_module_info: bool,
}

impl Default for QuizCriteria {
    fn default() -> Self {
        Self {
            requested_count: 10,
            modules: HashSet::new(),
            types: HashSet::new(),
            include_generated: false,
            shuffle: false,
            hide_module_info: false,
        }
    }
}

impl QuizCriteria {
    /// Whether `question` passes the module, type, and provenance filters.
    pub fn matches(&self, question: &Question) -> bool {
        let module_match = self.modules.is_empty() || self.modules.contains(&question.module);
        let type_match = self.types.is_empty() || self.types.contains(&question.question_type());
        let generated_match = self.include_generated || !question.generated;
        module_match && type_match && generated_match
    }
}

/// Select the questions for a session.
///
/// Returns `QuizError::NoMatchingQuestions` when the filters leave nothing.
/// With `shuffle` set the whole filtered set is permuted (Fisher–Yates)
/// before truncating to the requested count; otherwise bank order is kept.
pub fn select_questions<R: Rng + ?Sized>(
    bank: &[Arc<Question>],
    criteria: &QuizCriteria,
    rng: &mut R,
) -> Result<Vec<Arc<Question>>, QuizError> {
    let mut filtered: Vec<Arc<Question>> = bank
        .iter()
        .filter(|q| criteria.matches(q))
        .cloned()
        .collect();

    if filtered.is_empty() {
        return Err(QuizError::NoMatchingQuestions);
    }

    if criteria.shuffle {
        filtered.shuffle(rng);
    }

    let count = criteria.requested_count.max(1).min(filtered.len());
    filtered.truncate(count);
    tracing::debug!(
        selected = count,
        shuffle = criteria.shuffle,
        "built quiz selection"
    );
    Ok(filtered)
}
