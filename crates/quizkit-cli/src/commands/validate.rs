//! The `quizkit validate` command.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::Value;

use quizkit_core::bank::{parse_bank_str, validate_question_payload};

pub fn execute(bank: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let (bank_path, _) = super::resolve_bank(bank, config_path)?;
    let content = std::fs::read_to_string(&bank_path)
        .with_context(|| format!("failed to read question bank: {}", bank_path.display()))?;
    let document: Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse question bank: {}", bank_path.display()))?;
    let records = document
        .get("questions")
        .and_then(Value::as_array)
        .context("question bank must contain a `questions` array")?;

    println!("Bank: {} ({} records)", bank_path.display(), records.len());

    let mut invalid = 0;
    let mut seen_ids = HashSet::new();
    for (idx, record) in records.iter().enumerate() {
        let id = record.get("id").and_then(Value::as_str).filter(|id| !id.is_empty());
        let label = id
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| format!("  [#{}]", idx + 1));

        let mut problems = if record.is_object() {
            validate_question_payload(record)
        } else {
            vec!["Record is not a JSON object".to_string()]
        };
        if let Some(id) = id {
            if !seen_ids.insert(id) {
                problems.push(format!("Duplicate question id: {id}"));
            }
        }

        for problem in &problems {
            println!("{label} ERROR: {problem}");
        }
        if !problems.is_empty() {
            invalid += 1;
        }
    }

    let loadable = parse_bank_str(&content).len();
    println!("{loadable} question(s) loadable.");

    if invalid > 0 {
        anyhow::bail!("{invalid} invalid question(s) in {}", bank_path.display());
    }
    println!("All questions valid.");
    Ok(())
}
