//! Core data model types for quizkit.
//!
//! Questions are immutable once loaded and shared between the bank, the
//! session, and the summary through `Arc<Question>`. The question type is a
//! tagged variant carrying its own answer key, so the codec and the
//! evaluator match on it exhaustively.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The five supported question types, using the bank's wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuestionType {
    #[serde(rename = "multiple_choice", alias = "single_choice")]
    SingleChoice,
    #[serde(rename = "true_false")]
    TrueFalse,
    #[serde(rename = "short_answer", alias = "free_text")]
    FreeText,
    #[serde(rename = "multi_select")]
    MultiSelect,
    #[serde(rename = "code_dropdown", alias = "code_choice")]
    CodeChoice,
}

impl QuestionType {
    /// All types in display order.
    pub const ALL: [QuestionType; 5] = [
        QuestionType::SingleChoice,
        QuestionType::TrueFalse,
        QuestionType::FreeText,
        QuestionType::MultiSelect,
        QuestionType::CodeChoice,
    ];

    /// Wire name used in the bank JSON.
    pub fn wire_name(self) -> &'static str {
        match self {
            QuestionType::SingleChoice => "multiple_choice",
            QuestionType::TrueFalse => "true_false",
            QuestionType::FreeText => "short_answer",
            QuestionType::MultiSelect => "multi_select",
            QuestionType::CodeChoice => "code_dropdown",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            QuestionType::SingleChoice => "Multiple choice",
            QuestionType::TrueFalse => "True / False",
            QuestionType::FreeText => "Short answer",
            QuestionType::MultiSelect => "Select many",
            QuestionType::CodeChoice => "Code practice",
        }
    }

    /// Whether questions of this type pick from an option list.
    pub fn is_choice_based(self) -> bool {
        matches!(
            self,
            QuestionType::SingleChoice | QuestionType::MultiSelect | QuestionType::CodeChoice
        )
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "multiple_choice" | "single_choice" => Ok(QuestionType::SingleChoice),
            "true_false" => Ok(QuestionType::TrueFalse),
            "short_answer" | "free_text" => Ok(QuestionType::FreeText),
            "multi_select" => Ok(QuestionType::MultiSelect),
            "code_dropdown" | "code_choice" => Ok(QuestionType::CodeChoice),
            other => Err(format!("unsupported type: {other}")),
        }
    }
}

/// One selectable option of a choice-based question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: String,
    pub label: String,
    /// Explicit boolean value for true/false options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<bool>,
}

impl QuestionOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: None,
        }
    }

    /// The boolean this option stands for on a true/false question.
    pub fn boolean_value(&self) -> bool {
        self.value.unwrap_or(self.id == "true")
    }
}

/// Type tag plus the type-specific answer key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    SingleChoice {
        options: Vec<QuestionOption>,
        answer: String,
    },
    TrueFalse {
        options: Vec<QuestionOption>,
        answer: bool,
    },
    FreeText {
        answer: String,
    },
    MultiSelect {
        options: Vec<QuestionOption>,
        answer: Vec<String>,
    },
    CodeChoice {
        options: Vec<QuestionOption>,
        answer: String,
    },
}

impl QuestionKind {
    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionKind::SingleChoice { .. } => QuestionType::SingleChoice,
            QuestionKind::TrueFalse { .. } => QuestionType::TrueFalse,
            QuestionKind::FreeText { .. } => QuestionType::FreeText,
            QuestionKind::MultiSelect { .. } => QuestionType::MultiSelect,
            QuestionKind::CodeChoice { .. } => QuestionType::CodeChoice,
        }
    }

    /// Options as authored. Free-text questions have none.
    pub fn options(&self) -> &[QuestionOption] {
        match self {
            QuestionKind::SingleChoice { options, .. }
            | QuestionKind::TrueFalse { options, .. }
            | QuestionKind::MultiSelect { options, .. }
            | QuestionKind::CodeChoice { options, .. } => options,
            QuestionKind::FreeText { .. } => &[],
        }
    }

    /// The answer key in canonical form.
    pub fn key(&self) -> Answer {
        match self {
            QuestionKind::SingleChoice { answer, .. } | QuestionKind::CodeChoice { answer, .. } => {
                Answer::Choice(answer.clone())
            }
            QuestionKind::TrueFalse { answer, .. } => Answer::Bool(*answer),
            QuestionKind::FreeText { answer } => Answer::Text(answer.clone()),
            QuestionKind::MultiSelect { answer, .. } => Answer::Set(answer.clone()),
        }
    }
}

/// A single bank question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: String,
    pub module: String,
    pub topic: String,
    pub prompt: String,
    /// Code snippet shown with the prompt.
    pub code: Option<String>,
    pub kind: QuestionKind,
    pub difficulty: Option<String>,
    /// Machine-generated rather than course material.
    pub generated: bool,
}

impl Question {
    pub fn question_type(&self) -> QuestionType {
        self.kind.question_type()
    }

    /// Options used for display. True/false questions without authored
    /// options get the default `True`/`False` pair.
    pub fn display_options(&self) -> Vec<QuestionOption> {
        match &self.kind {
            QuestionKind::TrueFalse { options, .. } if options.is_empty() => vec![
                QuestionOption {
                    id: "true".into(),
                    label: "True".into(),
                    value: Some(true),
                },
                QuestionOption {
                    id: "false".into(),
                    label: "False".into(),
                    value: Some(false),
                },
            ],
            kind => kind.options().to_vec(),
        }
    }

    /// Label of the option with `id`, or the id itself when unknown.
    pub fn option_label<'a>(&'a self, id: &'a str) -> &'a str {
        self.kind
            .options()
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.label.as_str())
            .unwrap_or(id)
    }

    /// Meta line shown above the prompt: module, topic, type, difficulty.
    pub fn meta_line(&self, hide_module: bool) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if !hide_module {
            parts.push(&self.module);
        }
        parts.push(&self.topic);
        parts.push(self.question_type().label());
        let mut line = parts.join(" • ");
        if let Some(difficulty) = self.difficulty.as_deref().filter(|d| !d.is_empty()) {
            line.push_str(&format!(" • Difficulty: {}", capitalize(difficulty)));
        }
        line
    }

    /// Human-readable provenance.
    pub fn source_label(&self) -> &'static str {
        if self.generated {
            "Generated"
        } else {
            "Official"
        }
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A canonical answer value stored in a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Answer {
    /// Selected option id (single-choice and code-choice).
    Choice(String),
    Bool(bool),
    /// Trimmed free text. Empty means unanswered.
    Text(String),
    /// Selected option ids. Never empty once decoded.
    Set(Vec<String>),
}

impl Answer {
    /// True for the empty-equivalent sentinels.
    pub fn is_unanswered(&self) -> bool {
        match self {
            Answer::Choice(id) => id.is_empty(),
            Answer::Text(text) => text.is_empty(),
            Answer::Set(ids) => ids.is_empty(),
            Answer::Bool(_) => false,
        }
    }
}

/// Whether an optional stored answer counts as answered.
pub fn is_answered(answer: Option<&Answer>) -> bool {
    answer.is_some_and(|a| !a.is_unanswered())
}
