//! Turns a typed answer line into widget input for the current question.

use quizkit_core::codec::RawInput;
use quizkit_core::model::{Question, QuestionKind, QuestionOption};

/// Interpret `line` as an answer to `question`.
///
/// Choice questions accept an option number (as listed) or an option id;
/// multi-select takes several separated by commas or spaces. True/false also
/// accepts `t`, `f`, `yes`, `no`. Free text is taken verbatim.
pub fn parse_answer(question: &Question, line: &str) -> Result<RawInput, String> {
    let token = line.trim();
    match &question.kind {
        QuestionKind::FreeText { .. } => Ok(RawInput::Text(line.to_string())),
        QuestionKind::SingleChoice { .. } => {
            pick_option(question, token).map(|option| RawInput::Radio(Some(option.id)))
        }
        QuestionKind::CodeChoice { .. } => {
            pick_option(question, token).map(|option| RawInput::Dropdown(option.id))
        }
        QuestionKind::TrueFalse { .. } => {
            parse_bool(question, token).map(|value| RawInput::Radio(Some(value.to_string())))
        }
        QuestionKind::MultiSelect { .. } => {
            let ids = token
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|part| !part.is_empty())
                .map(|part| pick_option(question, part).map(|option| option.id))
                .collect::<Result<Vec<_>, _>>()?;
            if ids.is_empty() {
                return Err("select at least one option".to_string());
            }
            Ok(RawInput::Checkboxes(ids))
        }
    }
}

fn pick_option(question: &Question, token: &str) -> Result<QuestionOption, String> {
    if token.is_empty() {
        return Err("type an option number".to_string());
    }
    let options = question.display_options();
    if let Some(option) = options.iter().find(|o| o.id.eq_ignore_ascii_case(token)) {
        return Ok(option.clone());
    }
    token
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|idx| options.get(idx).cloned())
        .ok_or_else(|| format!("no option '{token}'"))
}

fn parse_bool(question: &Question, token: &str) -> Result<bool, String> {
    match token.to_ascii_lowercase().as_str() {
        "t" | "true" | "y" | "yes" => Ok(true),
        "f" | "false" | "n" | "no" => Ok(false),
        _ => pick_option(question, token).map(|option| option.boolean_value()),
    }
}
