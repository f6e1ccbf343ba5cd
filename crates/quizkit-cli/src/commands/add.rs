//! The `quizkit add` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::Value;

use quizkit_core::bank::QuestionBank;
use quizkit_core::QuizError;

pub fn execute(
    bank: Option<PathBuf>,
    question_path: PathBuf,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (bank_path, _) = super::resolve_bank(bank, config_path)?;
    let content = std::fs::read_to_string(&question_path)
        .with_context(|| format!("failed to read question: {}", question_path.display()))?;
    let candidate: Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse question: {}", question_path.display()))?;

    let mut bank = QuestionBank::open(&bank_path)?;
    let now_ms = chrono::Utc::now().timestamp_millis();
    match bank.append(candidate, now_ms) {
        Ok(stored) => {
            let id = stored.get("id").and_then(Value::as_str).unwrap_or_default();
            println!(
                "Added question {id} to {} ({} total)",
                bank_path.display(),
                bank.len()
            );
            Ok(())
        }
        Err(e) => {
            if let Some(err) = e.downcast_ref::<QuizError>() {
                for detail in err.details() {
                    println!("  ERROR: {detail}");
                }
            }
            Err(e)
        }
    }
}
