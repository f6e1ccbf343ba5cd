//! Answer codec: raw widget input ⇄ canonical answers.
//!
//! The engine never inspects a UI directly. Whatever front-end drives the
//! session hands over a [`RawInput`] describing what is currently selected
//! or typed, and [`decode`] turns it into the canonical [`Answer`] stored in
//! the response. [`encode`] goes the other way for re-display.

use serde::{Deserialize, Serialize};

use crate::model::{Answer, Question, QuestionKind};

/// Snapshot of an answer widget at persist time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "widget", content = "value", rename_all = "snake_case")]
pub enum RawInput {
    /// Radio group: the value of the checked radio, if any.
    Radio(Option<String>),
    /// Text area contents, untrimmed.
    Text(String),
    /// Checkbox group: values of all checked boxes, in order.
    Checkboxes(Vec<String>),
    /// Dropdown: the selected value, `""` for the placeholder.
    Dropdown(String),
}

/// Decode the widget state for `question` into its canonical answer.
///
/// Free-text questions always yield `Some(Answer::Text(..))`, with the empty
/// string as the unanswered sentinel; every other type uses `None`. Input of
/// the wrong widget shape decodes to the sentinel.
pub fn decode(question: &Question, input: &RawInput) -> Option<Answer> {
    match (&question.kind, input) {
        (QuestionKind::FreeText { .. }, RawInput::Text(text)) => {
            Some(Answer::Text(text.trim().to_string()))
        }
        (QuestionKind::FreeText { .. }, _) => Some(Answer::Text(String::new())),

        (QuestionKind::SingleChoice { .. }, RawInput::Radio(Some(id))) if !id.is_empty() => {
            Some(Answer::Choice(id.clone()))
        }
        (QuestionKind::SingleChoice { .. }, _) => None,

        (QuestionKind::TrueFalse { .. }, RawInput::Radio(Some(value))) => match value.as_str() {
            "true" => Some(Answer::Bool(true)),
            "false" => Some(Answer::Bool(false)),
            _ => None,
        },
        (QuestionKind::TrueFalse { .. }, _) => None,

        (QuestionKind::MultiSelect { .. }, RawInput::Checkboxes(checked)) => {
            let mut ids: Vec<String> = Vec::with_capacity(checked.len());
            for id in checked {
                if !id.is_empty() && !ids.contains(id) {
                    ids.push(id.clone());
                }
            }
            (!ids.is_empty()).then_some(Answer::Set(ids))
        }
        (QuestionKind::MultiSelect { .. }, _) => None,

        (QuestionKind::CodeChoice { .. }, RawInput::Dropdown(value)) if !value.is_empty() => {
            Some(Answer::Choice(value.clone()))
        }
        (QuestionKind::CodeChoice { .. }, _) => None,
    }
}

/// Encode a stored answer back into widget state for `question`.
pub fn encode(question: &Question, answer: Option<&Answer>) -> RawInput {
    match &question.kind {
        QuestionKind::FreeText { .. } => RawInput::Text(match answer {
            Some(Answer::Text(text)) => text.clone(),
            _ => String::new(),
        }),
        QuestionKind::SingleChoice { .. } => RawInput::Radio(match answer {
            Some(Answer::Choice(id)) => Some(id.clone()),
            _ => None,
        }),
        QuestionKind::TrueFalse { .. } => RawInput::Radio(match answer {
            Some(Answer::Bool(value)) => Some(value.to_string()),
            _ => None,
        }),
        QuestionKind::MultiSelect { .. } => RawInput::Checkboxes(match answer {
            Some(Answer::Set(ids)) => ids.clone(),
            _ => Vec::new(),
        }),
        QuestionKind::CodeChoice { .. } => RawInput::Dropdown(match answer {
            Some(Answer::Choice(id)) => id.clone(),
            _ => String::new(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionOption;

    fn question(kind: QuestionKind) -> Question {
        Question {
            id: "q".into(),
            module: "M".into(),
            topic: "T".into(),
            prompt: "p".into(),
            code: None,
            kind,
            difficulty: None,
            generated: false,
        }
    }

    fn options() -> Vec<QuestionOption> {
        vec![
            QuestionOption::new("a", "Alpha"),
            QuestionOption::new("b", "Beta"),
            QuestionOption::new("c", "Gamma"),
        ]
    }

    fn all_kinds() -> Vec<Question> {
        vec![
            question(QuestionKind::SingleChoice {
                options: options(),
                answer: "a".into(),
            }),
            question(QuestionKind::TrueFalse {
                options: vec![],
                answer: false,
            }),
            question(QuestionKind::FreeText {
                answer: "Paris".into(),
            }),
            question(QuestionKind::MultiSelect {
                options: options(),
                answer: vec!["a".into(), "b".into()],
            }),
            question(QuestionKind::CodeChoice {
                options: options(),
                answer: "c".into(),
            }),
        ]
    }

    #[test]
    fn free_text_is_trimmed() {
        let q = &all_kinds()[2];
        assert_eq!(
            decode(q, &RawInput::Text("  Paris \n".into())),
            Some(Answer::Text("Paris".into()))
        );
        assert_eq!(
            decode(q, &RawInput::Text("   ".into())),
            Some(Answer::Text(String::new()))
        );
    }

    #[test]
    fn true_false_reads_radio_value() {
        let q = &all_kinds()[1];
        assert_eq!(
            decode(q, &RawInput::Radio(Some("false".into()))),
            Some(Answer::Bool(false))
        );
        assert_eq!(decode(q, &RawInput::Radio(None)), None);
    }

    #[test]
    fn multi_select_empty_collapses_to_none() {
        let q = &all_kinds()[3];
        assert_eq!(decode(q, &RawInput::Checkboxes(vec![])), None);
        assert_eq!(
            decode(q, &RawInput::Checkboxes(vec!["b".into(), "a".into(), "b".into()])),
            Some(Answer::Set(vec!["b".into(), "a".into()]))
        );
    }

    #[test]
    fn code_choice_placeholder_is_unanswered() {
        let q = &all_kinds()[4];
        assert_eq!(decode(q, &RawInput::Dropdown(String::new())), None);
        assert_eq!(
            decode(q, &RawInput::Dropdown("b".into())),
            Some(Answer::Choice("b".into()))
        );
    }

    #[test]
    fn mismatched_widget_decodes_to_sentinel() {
        let kinds = all_kinds();
        assert_eq!(decode(&kinds[0], &RawInput::Text("a".into())), None);
        assert_eq!(
            decode(&kinds[2], &RawInput::Radio(Some("a".into()))),
            Some(Answer::Text(String::new()))
        );
    }

    #[test]
    fn decode_of_encode_is_identity() {
        let kinds = all_kinds();
        let answers = [
            Some(Answer::Choice("b".into())),
            Some(Answer::Bool(true)),
            Some(Answer::Text("Lyon".into())),
            Some(Answer::Set(vec!["c".into(), "a".into()])),
            Some(Answer::Choice("a".into())),
        ];
        for (q, answer) in kinds.iter().zip(answers) {
            let redisplayed = encode(q, answer.as_ref());
            assert_eq!(decode(q, &redisplayed), answer, "type {}", q.question_type());
            let twice = encode(q, decode(q, &redisplayed).as_ref());
            assert_eq!(twice, redisplayed);
        }
    }

    #[test]
    fn unanswered_encodes_to_blank_widgets() {
        let kinds = all_kinds();
        assert_eq!(encode(&kinds[0], None), RawInput::Radio(None));
        assert_eq!(encode(&kinds[2], None), RawInput::Text(String::new()));
        assert_eq!(encode(&kinds[3], None), RawInput::Checkboxes(vec![]));
        assert_eq!(encode(&kinds[4], None), RawInput::Dropdown(String::new()));
    }
}
