//! The `quizkit init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("quizkit.toml").exists() {
        println!("quizkit.toml already exists, skipping.");
    } else {
        std::fs::write("quizkit.toml", SAMPLE_CONFIG)?;
        println!("Created quizkit.toml");
    }

    std::fs::create_dir_all("data")?;
    let bank_path = Path::new("data/questions.json");
    if bank_path.exists() {
        println!("data/questions.json already exists, skipping.");
    } else {
        std::fs::write(bank_path, SAMPLE_BANK)?;
        println!("Created data/questions.json");
    }

    println!("\nNext steps:");
    println!("  1. Run: quizkit validate --bank data/questions.json");
    println!("  2. Run: quizkit modules");
    println!("  3. Run: quizkit take --count 5");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizkit configuration

bank_path = "data/questions.json"
output_dir = "./quizkit-results"
default_count = 10
shuffle = true
include_generated = false
hide_module_info = false
report_title = "Quiz Summary"
tick_interval_ms = 250
"#;

const SAMPLE_BANK: &str = include_str!("../../assets/questions.json");

#[cfg(test)]
mod tests {
    use super::*;
    use quizkit_core::bank::{parse_bank_str, validate_question_payload};
    use quizkit_core::config::QuizkitConfig;
    use quizkit_core::model::QuestionType;

    #[test]
    fn sample_config_matches_defaults() {
        let config: QuizkitConfig = toml::from_str(SAMPLE_CONFIG).unwrap();
        assert_eq!(config, QuizkitConfig::default());
    }

    #[test]
    fn sample_bank_is_valid_and_covers_every_type() {
        let document: serde_json::Value = serde_json::from_str(SAMPLE_BANK).unwrap();
        for record in document["questions"].as_array().unwrap() {
            assert!(validate_question_payload(record).is_empty(), "{record}");
        }
        let questions = parse_bank_str(SAMPLE_BANK);
        assert_eq!(questions.len(), 7);
        for t in QuestionType::ALL {
            assert!(questions.iter().any(|q| q.question_type() == t));
        }
    }
}
