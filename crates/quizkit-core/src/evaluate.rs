//! Correctness evaluation. No partial credit, no coercion across types.

use crate::model::{Answer, Question, QuestionKind};

/// Whether `answer` matches the key of `question`.
///
/// Unanswered sentinels are never correct. Free text compares trimmed and
/// case-insensitively; multi-select requires equal cardinality with every
/// chosen id in the key; choice types compare ids exactly.
pub fn is_correct(question: &Question, answer: Option<&Answer>) -> bool {
    let Some(answer) = answer.filter(|a| !a.is_unanswered()) else {
        return false;
    };

    match (&question.kind, answer) {
        (QuestionKind::FreeText { answer: key }, Answer::Text(text)) => {
            text.trim().to_lowercase() == key.trim().to_lowercase()
        }
        (QuestionKind::TrueFalse { answer: key, .. }, Answer::Bool(value)) => value == key,
        (QuestionKind::MultiSelect { answer: key, .. }, Answer::Set(chosen)) => {
            chosen.len() == key.len() && chosen.iter().all(|id| key.contains(id))
        }
        (QuestionKind::SingleChoice { answer: key, .. }, Answer::Choice(id))
        | (QuestionKind::CodeChoice { answer: key, .. }, Answer::Choice(id)) => id == key,
        _ => false,
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

    fn multi() -> Question {
        question(QuestionKind::MultiSelect {
            options: vec![QuestionOption::new("a", "A"), QuestionOption::new("b", "B")],
            answer: vec!["b".into(), "a".into()],
        })
    }

    #[test]
    fn unanswered_is_never_correct() {
        let free = question(QuestionKind::FreeText { answer: String::new() });
        assert!(!is_correct(&free, None));
        assert!(!is_correct(&free, Some(&Answer::Text(String::new()))));
        assert!(!is_correct(&multi(), Some(&Answer::Set(vec![]))));
        let choice = question(QuestionKind::SingleChoice {
            options: vec![],
            answer: String::new(),
        });
        assert!(!is_correct(&choice, Some(&Answer::Choice(String::new()))));
    }

    #[test]
    fn free_text_ignores_case_and_whitespace() {
        let q = question(QuestionKind::FreeText {
            answer: "paris".into(),
        });
        assert!(is_correct(&q, Some(&Answer::Text(" Paris ".into()))));
        assert!(!is_correct(&q, Some(&Answer::Text("Lyon".into()))));
    }

    #[test]
    fn multi_select_is_set_equality() {
        let q = multi();
        assert!(is_correct(&q, Some(&Answer::Set(vec!["a".into(), "b".into()]))));
        assert!(!is_correct(&q, Some(&Answer::Set(vec!["a".into()]))));
        assert!(!is_correct(
            &q,
            Some(&Answer::Set(vec!["a".into(), "b".into(), "c".into()]))
        ));
        assert!(!is_correct(&q, Some(&Answer::Set(vec!["a".into(), "c".into()]))));
    }

    #[test]
    fn true_false_compares_booleans() {
        let q = question(QuestionKind::TrueFalse {
            options: vec![],
            answer: false,
        });
        assert!(is_correct(&q, Some(&Answer::Bool(false))));
        assert!(!is_correct(&q, Some(&Answer::Bool(true))));
    }

    #[test]
    fn choice_ids_compare_exactly() {
        let q = question(QuestionKind::CodeChoice {
            options: vec![],
            answer: "b".into(),
        });
        assert!(is_correct(&q, Some(&Answer::Choice("b".into()))));
        assert!(!is_correct(&q, Some(&Answer::Choice("B".into()))));
    }

    #[test]
    fn mismatched_answer_shape_is_incorrect() {
        let q = question(QuestionKind::TrueFalse {
            options: vec![],
            answer: true,
        });
        assert!(!is_correct(&q, Some(&Answer::Text("true".into()))));
    }
}
