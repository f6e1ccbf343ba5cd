//! The `quizkit modules` command.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizkit_core::bank::load_bank;
use quizkit_core::model::QuestionType;

pub fn execute(bank: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let (bank_path, _) = super::resolve_bank(bank, config_path)?;
    let questions = load_bank(&bank_path);
    if questions.is_empty() {
        println!("No questions yet in {}.", bank_path.display());
        return Ok(());
    }

    // module -> (uploaded, generated)
    let mut counts: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    let mut types = BTreeSet::new();
    for question in &questions {
        let entry = counts.entry(question.module.as_str()).or_default();
        if question.generated {
            entry.1 += 1;
        } else {
            entry.0 += 1;
        }
        types.insert(question.question_type());
    }

    let mut table = Table::new();
    table.set_header(vec!["Module", "Uploaded", "Generated"]);
    for (module, (uploaded, generated)) in &counts {
        table.add_row(vec![Cell::new(module), Cell::new(uploaded), Cell::new(generated)]);
    }
    println!("{table}");

    let labels: Vec<&str> = QuestionType::ALL
        .iter()
        .filter(|t| types.contains(*t))
        .map(|t| t.label())
        .collect();
    println!("Types: {}", labels.join(", "));
    println!(
        "{} question{} ready",
        questions.len(),
        if questions.len() == 1 { "" } else { "s" }
    );
    Ok(())
}
