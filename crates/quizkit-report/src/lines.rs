//! Plain-text rendering of a quiz summary, one string per report line.

use chrono::{DateTime, Utc};

use quizkit_core::summary::{format_seconds, QuizSummary, SummaryEntry};

/// Lines for the header and every entry of `summary`, in order.
pub fn summary_lines(
    summary: &QuizSummary,
    title: &str,
    generated_at: DateTime<Utc>,
) -> Vec<String> {
    let mut lines = vec![
        title.to_string(),
        format!(
            "Generated: {}",
            generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        String::new(),
    ];
    for entry in summary.entries() {
        lines.extend(entry_lines(entry));
    }
    lines
}

/// The five lines describing one entry, ending with a blank separator.
pub fn entry_lines(entry: &SummaryEntry) -> [String; 5] {
    let question = entry.question();
    [
        format!("Q{}: {}", entry.ordinal(), question.prompt),
        format!(
            "Module: {} | Topic: {} | Source: {}",
            question.module,
            question.topic,
            question.source_label()
        ),
        format!(
            "Answer: {} | Correct: {} | Time: {}s",
            entry.user_answer_text(),
            entry.correct_answer_text(),
            format_seconds(entry.time_spent_ms())
        ),
        format!("Result: {}", entry.result_label()),
        String::new(),
    ]
}
