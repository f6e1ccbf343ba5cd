//! JSON question bank store.
//!
//! Loads `{ "questions": [...] }` documents into typed questions, validates
//! candidate questions, and appends them to the file on disk. A missing or
//! malformed bank is treated as empty rather than as a fatal error.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::QuizError;
use crate::model::{Question, QuestionKind, QuestionOption, QuestionType};

/// Intermediate JSON structure of a single bank record.
#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(default)]
    id: Option<String>,
    module: String,
    topic: String,
    prompt: String,
    #[serde(rename = "type")]
    question_type: QuestionType,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    options: Vec<QuestionOption>,
    answer: Value,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    generated: bool,
}

/// On-disk document shape.
#[derive(Debug, Default, Serialize, Deserialize)]
struct BankDocument {
    #[serde(default)]
    questions: Vec<Value>,
}

impl RawQuestion {
    fn into_question(self, index: usize) -> Result<Question> {
        let kind = match self.question_type {
            QuestionType::SingleChoice => QuestionKind::SingleChoice {
                answer: string_answer(&self.answer)?,
                options: self.options,
            },
            QuestionType::CodeChoice => QuestionKind::CodeChoice {
                answer: string_answer(&self.answer)?,
                options: self.options,
            },
            QuestionType::FreeText => QuestionKind::FreeText {
                answer: string_answer(&self.answer)?,
            },
            QuestionType::TrueFalse => QuestionKind::TrueFalse {
                answer: self
                    .answer
                    .as_bool()
                    .context("true/false answer must be a boolean")?,
                options: self.options,
            },
            QuestionType::MultiSelect => QuestionKind::MultiSelect {
                answer: self
                    .answer
                    .as_array()
                    .context("multi-select answer must be an array")?
                    .iter()
                    .map(|v| {
                        v.as_str()
                            .map(str::to_string)
                            .context("multi-select answer ids must be strings")
                    })
                    .collect::<Result<Vec<_>>>()?,
                options: self.options,
            },
        };

        let id = self
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("question-{}", index + 1));

        Ok(Question {
            id,
            module: self.module,
            topic: self.topic,
            prompt: self.prompt,
            code: self.code,
            kind,
            difficulty: self.difficulty,
            generated: self.generated,
        })
    }
}

fn string_answer(value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .context("answer must be a string")
}

/// Parse a bank JSON string into questions.
///
/// A document that does not parse, or whose `questions` field is not an
/// array, yields an empty bank. Records that cannot be converted are skipped.
pub fn parse_bank_str(content: &str) -> Vec<Arc<Question>> {
    let document: Value = match serde_json::from_str(content) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!("question bank is not valid JSON, treating as empty: {e}");
            return Vec::new();
        }
    };

    let Some(records) = document.get("questions").and_then(Value::as_array) else {
        tracing::warn!("question bank has no `questions` array, treating as empty");
        return Vec::new();
    };

    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let parsed = serde_json::from_value::<RawQuestion>(record.clone())
                .map_err(anyhow::Error::from)
                .and_then(|raw| raw.into_question(index));
            match parsed {
                Ok(question) => Some(Arc::new(question)),
                Err(e) => {
                    tracing::warn!("skipping bank record {}: {e:#}", index + 1);
                    None
                }
            }
        })
        .collect()
}

/// Load questions from a bank file. A missing or unreadable file is an empty bank.
pub fn load_bank(path: &Path) -> Vec<Arc<Question>> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_bank_str(&content),
        Err(e) => {
            tracing::warn!("could not read question bank {}: {e}", path.display());
            Vec::new()
        }
    }
}

/// Validate a candidate question payload, returning every problem found.
pub fn validate_question_payload(candidate: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    for field in ["module", "topic", "prompt", "type", "answer"] {
        let missing = match candidate.get(field) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        };
        if missing {
            errors.push(format!("Missing field: {field}"));
        }
    }

    let type_name = candidate.get("type").and_then(Value::as_str).unwrap_or("");
    let question_type = match type_name.parse::<QuestionType>() {
        Ok(t) => Some(t),
        Err(_) => {
            errors.push(format!("Unsupported type: {type_name}"));
            None
        }
    };

    let options = candidate.get("options").and_then(Value::as_array);
    let answer = candidate.get("answer").unwrap_or(&Value::Null);

    match question_type {
        Some(t) if t.is_choice_based() => {
            if options.is_none_or(|o| o.len() < 2) {
                errors.push("Options array with at least two entries is required".into());
            }
            match t {
                QuestionType::MultiSelect => {
                    if answer.as_array().is_none_or(|a| a.is_empty()) {
                        errors.push(
                            "Multi-select questions require an array of correct option ids".into(),
                        );
                    }
                }
                _ => {
                    if !answer.is_string() {
                        errors.push(
                            "Choice questions expect a string answer matching an option id".into(),
                        );
                    }
                }
            }
        }
        Some(QuestionType::TrueFalse) => {
            if !answer.is_boolean() {
                errors.push("True/false questions must store a boolean answer".into());
            }
        }
        Some(QuestionType::FreeText) => {
            if answer.as_str().is_none_or(|s| s.trim().is_empty()) {
                errors.push("Short answer questions store the reference answer as text".into());
            }
        }
        _ => {}
    }

    if let Some(options) = options {
        let mut ids = HashSet::new();
        for (idx, option) in options.iter().enumerate() {
            match option.get("id").and_then(Value::as_str) {
                Some(id) if !id.trim().is_empty() => {
                    if !ids.insert(id) {
                        errors.push(format!("Duplicate option id detected: {id}"));
                    }
                }
                _ => errors.push(format!("Option {} is missing an id", idx + 1)),
            }
            if option
                .get("label")
                .and_then(Value::as_str)
                .is_none_or(str::is_empty)
            {
                errors.push(format!("Option {} needs a label", idx + 1));
            }
        }
    }

    errors
}

/// Return the candidate's id, or derive one from module, topic, and `now_ms`.
pub fn derive_question_id(candidate: &Value, now_ms: i64) -> String {
    if let Some(id) = candidate.get("id").and_then(Value::as_str) {
        if !id.is_empty() {
            return id.to_string();
        }
    }
    let module = candidate.get("module").and_then(Value::as_str).unwrap_or("module");
    let topic = candidate.get("topic").and_then(Value::as_str).unwrap_or("topic");
    format!("{}-{}", slugify(&format!("{module}-{topic}")), to_base36(now_ms.max(0) as u64))
}

fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut last_dash = false;
    for c in value.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".into();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// File-backed bank used for ingestion. Records are kept as raw JSON so
/// fields this crate does not model survive a rewrite.
#[derive(Debug)]
pub struct QuestionBank {
    path: PathBuf,
    records: Vec<Value>,
}

impl QuestionBank {
    /// Open the bank at `path`, creating an empty document if it does not exist.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            let bank = Self {
                path: path.to_path_buf(),
                records: Vec::new(),
            };
            bank.save()?;
            return Ok(bank);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read question bank: {}", path.display()))?;
        let document: BankDocument = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse question bank: {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            records: document.questions,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Typed view of the stored records.
    pub fn questions(&self) -> Vec<Arc<Question>> {
        let document = serde_json::json!({ "questions": self.records });
        parse_bank_str(&document.to_string())
    }

    /// Validate `candidate`, assign an id, and persist it.
    ///
    /// Returns the stored record, or `QuizError::InvalidQuestionPayload`
    /// wrapped in `anyhow` when validation fails.
    pub fn append(&mut self, candidate: Value, now_ms: i64) -> Result<Value> {
        if !candidate.is_object() {
            anyhow::bail!("question payload must be a JSON object");
        }
        let details = validate_question_payload(&candidate);
        if !details.is_empty() {
            return Err(QuizError::InvalidQuestionPayload { details }.into());
        }

        let id = derive_question_id(&candidate, now_ms);
        let mut record = candidate;
        if let Some(map) = record.as_object_mut() {
            map.insert("id".into(), Value::String(id.clone()));
        }
        self.records.push(record.clone());
        self.save()?;
        tracing::info!("appended question {id} to {}", self.path.display());
        Ok(record)
    }

    /// Write the bank back to disk.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let document = BankDocument {
            questions: self.records.clone(),
        };
        let json =
            serde_json::to_string_pretty(&document).context("failed to serialize question bank")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write question bank to {}", self.path.display()))?;
        Ok(())
    }
}
