//! JSON export of a finished quiz.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::model::{Answer, QuestionType};
use crate::summary::{ModuleTally, QuizSummary};

/// A complete quiz report as written to disk.
#[derive(Debug, Clone, Serialize)]
pub struct QuizReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total: usize,
    pub correct: usize,
    pub total_time_ms: u64,
    pub modules: Vec<ModuleTally>,
    pub entries: Vec<ReportEntry>,
}

/// One answered question, flattened for serialization.
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub ordinal: usize,
    pub question_id: String,
    pub module: String,
    pub topic: String,
    pub prompt: String,
    pub question_type: QuestionType,
    pub source: String,
    pub user_answer: Option<Answer>,
    pub user_answer_text: String,
    pub correct_answer_text: String,
    pub correct: bool,
    pub time_spent_ms: u64,
}

impl QuizReport {
    /// Snapshot `summary` into a serializable report.
    pub fn from_summary(summary: &QuizSummary, created_at: DateTime<Utc>) -> Self {
        let entries = summary
            .entries()
            .iter()
            .map(|entry| {
                let question = entry.question();
                ReportEntry {
                    ordinal: entry.ordinal(),
                    question_id: question.id.clone(),
                    module: question.module.clone(),
                    topic: question.topic.clone(),
                    prompt: question.prompt.clone(),
                    question_type: question.question_type(),
                    source: question.source_label().to_string(),
                    user_answer: entry.user_answer().cloned(),
                    user_answer_text: entry.user_answer_text(),
                    correct_answer_text: entry.correct_answer_text(),
                    correct: entry.correct(),
                    time_spent_ms: entry.time_spent_ms(),
                }
            })
            .collect();

        Self {
            id: Uuid::new_v4(),
            created_at,
            started_at: summary.started_at(),
            finished_at: summary.finished_at(),
            total: summary.total(),
            correct: summary.correct_count(),
            total_time_ms: summary.total_time_ms(),
            modules: summary.module_breakdown(),
            entries,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }
}
