//! End-to-end quiz flow through the public API: bank JSON in, summary and
//! JSON report out.

use quizkit_core::bank::parse_bank_str;
use quizkit_core::builder::QuizCriteria;
use quizkit_core::codec::RawInput;
use quizkit_core::export::QuizReport;
use quizkit_core::time::fixed_clock;
use quizkit_core::{QuizController, QuizError, QuizState};

const BANK: &str = r#"{
  "questions": [
    {
      "id": "own-1",
      "module": "Module 1",
      "topic": "Ownership",
      "prompt": "Which keyword transfers ownership into a closure?",
      "type": "multiple_choice",
      "options": [
        { "id": "a", "label": "ref" },
        { "id": "b", "label": "move" }
      ],
      "answer": "b"
    },
    {
      "id": "own-2",
      "module": "Module 1",
      "topic": "Borrowing",
      "prompt": "A value may have many shared borrows at once.",
      "type": "true_false",
      "answer": true
    },
    {
      "id": "traits-1",
      "module": "Module 2",
      "topic": "Traits",
      "prompt": "Name the trait behind the ? operator's conversion.",
      "type": "short_answer",
      "answer": "From",
      "difficulty": "medium"
    }
  ]
}"#;

fn controller() -> QuizController {
    QuizController::new(parse_bank_str(BANK)).with_clock(fixed_clock())
}

fn criteria(count: usize) -> QuizCriteria {
    QuizCriteria {
        requested_count: count,
        shuffle: false,
        ..QuizCriteria::default()
    }
}

#[test]
fn answering_everything_correctly() {
    let mut quiz = controller();
    let session = quiz.start(&criteria(5)).unwrap();
    assert_eq!(session.len(), 3);
    assert_eq!(session.title(), "Question 1 of 3");

    quiz.clock_mut().advance_ms(3_000);
    assert!(quiz.advance(&RawInput::Radio(Some("b".into()))));
    quiz.clock_mut().advance_ms(2_000);
    assert!(quiz.advance(&RawInput::Radio(Some("true".into()))));
    quiz.clock_mut().advance_ms(4_000);
    assert!(!quiz.advance(&RawInput::Text("  From ".into())));

    let summary = quiz.finish(&RawInput::Text("from".into())).unwrap();
    assert_eq!(summary.total(), 3);
    assert_eq!(summary.correct_count(), 3);
    assert_eq!(summary.total_time_ms(), 9_000);
    assert_eq!(summary.entries()[2].user_answer_text(), "from");
    assert!(matches!(quiz.state(), QuizState::Finished(_)));
}

#[test]
fn going_back_preserves_answers_and_time() {
    let mut quiz = controller();
    quiz.start(&criteria(3)).unwrap();

    quiz.clock_mut().advance_ms(1_000);
    quiz.advance(&RawInput::Radio(Some("a".into())));
    quiz.clock_mut().advance_ms(500);
    quiz.retreat(&RawInput::Radio(None));

    assert_eq!(
        quiz.display_input(),
        Some(RawInput::Radio(Some("a".into())))
    );
    let session = quiz.session().unwrap();
    assert_eq!(session.current_index(), 0);
    assert_eq!(session.responses()[0].active_time_ms(), 1_000);
    assert_eq!(session.responses()[1].active_time_ms(), 500);
    assert_eq!(session.progress_text(), "1/3 questions answered");

    quiz.clock_mut().advance_ms(250);
    quiz.advance(&RawInput::Radio(Some("b".into())));
    assert_eq!(quiz.session().unwrap().responses()[0].active_time_ms(), 1_250);
}

#[test]
fn display_timer_never_runs_backwards() {
    let mut quiz = controller();
    quiz.start(&criteria(3)).unwrap();

    let mut last = 0;
    for _ in 0..10 {
        quiz.clock_mut().advance_ms(137);
        let shown = quiz.display_elapsed_ms().unwrap();
        assert!(shown >= last);
        assert_eq!(quiz.display_elapsed_ms(), Some(shown));
        last = shown;
    }
    assert_eq!(quiz.session().unwrap().responses()[0].active_time_ms(), 0);
}

#[test]
fn empty_bank_cannot_start() {
    let mut quiz = QuizController::new(parse_bank_str("not json"));
    assert_eq!(quiz.start(&criteria(3)).unwrap_err(), QuizError::EmptyBank);
    assert!(matches!(quiz.state(), QuizState::Building));
}

#[test]
fn report_serializes_finished_quiz() {
    let mut quiz = controller();
    quiz.start(&criteria(1)).unwrap();
    let summary = quiz.finish(&RawInput::Radio(None)).unwrap();

    let report = QuizReport::from_summary(summary, summary.finished_at());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    report.save_json(&path).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["total"], 1);
    assert_eq!(value["correct"], 0);
    assert_eq!(value["entries"][0]["user_answer"], serde_json::Value::Null);
    assert_eq!(value["entries"][0]["user_answer_text"], "Unanswered");
}
