//! Summary aggregation for finished sessions.
//!
//! Entries are built once at finish and never mutated. Totals are projections
//! computed on demand from the entries.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::evaluate::is_correct;
use crate::model::{Answer, Question};
use crate::session::Session;

/// The final record for one session question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    ordinal: usize,
    question: Arc<Question>,
    user_answer: Option<Answer>,
    time_spent_ms: u64,
    correct: bool,
}

impl SummaryEntry {
    /// Build an entry, scoring `user_answer` against the question key.
    pub fn new(
        ordinal: usize,
        question: Arc<Question>,
        user_answer: Option<Answer>,
        time_spent_ms: u64,
    ) -> Self {
        let correct = is_correct(&question, user_answer.as_ref());
        Self {
            ordinal,
            question,
            user_answer,
            time_spent_ms,
            correct,
        }
    }

    /// 1-based position in the session.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn user_answer(&self) -> Option<&Answer> {
        self.user_answer.as_ref()
    }

    pub fn time_spent_ms(&self) -> u64 {
        self.time_spent_ms
    }

    pub fn correct(&self) -> bool {
        self.correct
    }

    pub fn result_label(&self) -> &'static str {
        if self.correct {
            "Correct"
        } else {
            "Incorrect"
        }
    }

    /// The user's answer as plain text.
    pub fn user_answer_text(&self) -> String {
        format_user_answer(&self.question, self.user_answer.as_ref())
    }

    /// The answer key as plain text.
    pub fn correct_answer_text(&self) -> String {
        format_correct_answer(&self.question)
    }
}

/// Per-module tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleTally {
    pub module: String,
    pub total: usize,
    pub correct: usize,
    pub time_ms: u64,
}

/// The finished report model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    entries: Vec<SummaryEntry>,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
}

impl QuizSummary {
    pub fn new(
        entries: Vec<SummaryEntry>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            entries,
            started_at,
            finished_at,
        }
    }

    /// Pair every question of a closed session with its final response.
    pub fn from_session(session: &Session, finished_at: DateTime<Utc>) -> Self {
        let entries = session
            .questions()
            .iter()
            .zip(session.responses())
            .enumerate()
            .map(|(idx, (question, response))| {
                SummaryEntry::new(
                    idx + 1,
                    Arc::clone(question),
                    response.answer().cloned(),
                    response.active_time_ms(),
                )
            })
            .collect();
        Self {
            entries,
            started_at: session.started_at(),
            finished_at,
        }
    }

    pub fn entries(&self) -> &[SummaryEntry] {
        &self.entries
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn correct_count(&self) -> usize {
        self.entries.iter().filter(|e| e.correct).count()
    }

    pub fn total_time_ms(&self) -> u64 {
        self.entries.iter().map(|e| e.time_spent_ms).sum()
    }

    /// Fraction correct in `[0, 1]`; zero for an empty summary.
    pub fn score_ratio(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        self.correct_count() as f64 / self.total() as f64
    }

    /// Tallies grouped by module, sorted by module name.
    pub fn module_breakdown(&self) -> Vec<ModuleTally> {
        let mut map: BTreeMap<&str, ModuleTally> = BTreeMap::new();
        for entry in &self.entries {
            let module = entry.question.module.as_str();
            let tally = map.entry(module).or_insert_with(|| ModuleTally {
                module: module.to_string(),
                total: 0,
                correct: 0,
                time_ms: 0,
            });
            tally.total += 1;
            tally.correct += usize::from(entry.correct);
            tally.time_ms += entry.time_spent_ms;
        }
        map.into_values().collect()
    }

    /// One-line overview such as `3 questions · 2 correct · 1m 5s`.
    pub fn meta_line(&self) -> String {
        let total = self.total();
        format!(
            "{} question{} · {} correct · {}",
            total,
            if total == 1 { "" } else { "s" },
            self.correct_count(),
            format_duration(self.total_time_ms())
        )
    }
}

/// Render a stored answer as plain text using option labels.
pub fn format_user_answer(question: &Question, answer: Option<&Answer>) -> String {
    match answer {
        None => "Unanswered".to_string(),
        Some(a) if a.is_unanswered() => "Unanswered".to_string(),
        Some(a) => format_answer(question, a),
    }
}

/// Render the question's key as plain text.
pub fn format_correct_answer(question: &Question) -> String {
    format_answer(question, &question.kind.key())
}

fn format_answer(question: &Question, answer: &Answer) -> String {
    match answer {
        Answer::Bool(true) => "True".to_string(),
        Answer::Bool(false) => "False".to_string(),
        Answer::Text(text) => text.clone(),
        Answer::Choice(id) => question.option_label(id).to_string(),
        Answer::Set(ids) => ids
            .iter()
            .map(|id| question.option_label(id))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Seconds to one decimal place, e.g. `12.3`.
pub fn format_seconds(ms: u64) -> String {
    format!("{:.1}", ms as f64 / 1000.0)
}

/// Coarse duration such as `1m 5s` or `42s`.
pub fn format_duration(ms: u64) -> String {
    let seconds = ms / 1000;
    let (mins, secs) = (seconds / 60, seconds % 60);
    if mins > 0 {
        format!("{mins}m {secs}s")
    } else {
        format!("{secs}s")
    }
}
