//! Report synthesis for finished quizzes.
//!
//! [`build_report`] renders a [`QuizSummary`] into a self-contained PDF held
//! in memory; [`write_pdf_report`] saves it under a directory.

pub mod lines;
pub mod pdf;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use quizkit_core::summary::QuizSummary;

/// Media type of every synthesized report.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// A rendered report ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub bytes: Vec<u8>,
    pub media_type: &'static str,
    /// Suggested name, `quiz-summary-<unix millis>.pdf`.
    pub file_name: String,
}

/// Render `summary` as a PDF document generated at `generated_at`.
pub fn build_report(
    summary: &QuizSummary,
    title: &str,
    generated_at: DateTime<Utc>,
) -> ReportDocument {
    let lines = lines::summary_lines(summary, title, generated_at);
    ReportDocument {
        bytes: pdf::synthesize(&lines),
        media_type: PDF_MEDIA_TYPE,
        file_name: format!("quiz-summary-{}.pdf", generated_at.timestamp_millis()),
    }
}

/// Write `document` into `dir` under its suggested file name.
pub fn write_pdf_report(document: &ReportDocument, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    let path = dir.join(&document.file_name);
    std::fs::write(&path, &document.bytes)
        .with_context(|| format!("failed to write PDF report to {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = document.bytes.len(), "wrote pdf report");
    Ok(path)
}
