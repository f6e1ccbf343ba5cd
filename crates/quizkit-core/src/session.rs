//! Session state machine.
//!
//! A [`QuizController`] owns the question bank, an injectable [`Clock`], and
//! the current [`QuizState`]. All navigation goes through its methods: every
//! transition that leaves a question first persists that question's response
//! (decoding the widget input and closing the timer interval) and then starts
//! the timer on the question being entered.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::builder::{select_questions, QuizCriteria};
use crate::codec::{self, RawInput};
use crate::error::QuizError;
use crate::model::{is_answered, Answer, Question};
use crate::summary::QuizSummary;
use crate::time::Clock;
use crate::timer::TimerAccumulator;

/// The user's answer and active time for one session question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    answer: Option<Answer>,
    active_time_ms: u64,
}

impl Response {
    pub fn answer(&self) -> Option<&Answer> {
        self.answer.as_ref()
    }

    pub fn active_time_ms(&self) -> u64 {
        self.active_time_ms
    }
}

/// An open quiz attempt.
#[derive(Debug, Clone)]
pub struct Session {
    questions: Vec<Arc<Question>>,
    responses: Vec<Response>,
    current_index: usize,
    started_at: DateTime<Utc>,
    hide_module_info: bool,
    timer: TimerAccumulator,
}

impl Session {
    fn new(questions: Vec<Arc<Question>>, hide_module_info: bool, now: DateTime<Utc>) -> Self {
        let responses = vec![Response::default(); questions.len()];
        let mut timer = TimerAccumulator::default();
        timer.start(now);
        Self {
            questions,
            responses,
            current_index: 0,
            started_at: now,
            hide_module_info,
            timer,
        }
    }

    pub fn questions(&self) -> &[Arc<Question>] {
        &self.questions
    }

    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Arc<Question> {
        &self.questions[self.current_index]
    }

    pub fn current_response(&self) -> &Response {
        &self.responses[self.current_index]
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn hide_module_info(&self) -> bool {
        self.hide_module_info
    }

    pub fn is_first(&self) -> bool {
        self.current_index == 0
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 == self.questions.len()
    }

    /// Number of responses holding a non-sentinel answer.
    pub fn answered_count(&self) -> usize {
        self.responses
            .iter()
            .filter(|r| is_answered(r.answer()))
            .count()
    }

    /// Progress line such as `2/5 questions answered`.
    pub fn progress_text(&self) -> String {
        let total = self.len();
        format!(
            "{}/{} question{} answered",
            self.answered_count(),
            total,
            if total == 1 { "" } else { "s" }
        )
    }

    /// Heading such as `Question 2 of 5`.
    pub fn title(&self) -> String {
        format!("Question {} of {}", self.current_index + 1, self.len())
    }

    fn persist_current(&mut self, input: &RawInput, now: DateTime<Utc>) {
        let index = self.current_index;
        let delta = self.timer.stop(now);
        let answer = codec::decode(&self.questions[index], input);
        let response = &mut self.responses[index];
        response.active_time_ms = response.active_time_ms.saturating_add(delta);
        response.answer = answer;
        tracing::debug!(index, delta_ms = delta, "persisted response");
    }

    fn enter(&mut self, index: usize, now: DateTime<Utc>) {
        self.current_index = index;
        self.timer.start(now);
    }

    fn display_elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        self.timer
            .display_estimate(self.current_response().active_time_ms, now)
    }
}

/// Where the controller is in the quiz lifecycle.
#[derive(Debug, Clone, Default)]
pub enum QuizState {
    /// No session; criteria are being chosen.
    #[default]
    Building,
    InProgress(Session),
    /// Terminal until [`QuizController::reset`].
    Finished(QuizSummary),
}

impl QuizState {
    pub fn name(&self) -> &'static str {
        match self {
            QuizState::Building => "building",
            QuizState::InProgress(_) => "in_progress",
            QuizState::Finished(_) => "finished",
        }
    }
}

/// Owns the bank, the clock, and the single active session.
#[derive(Debug)]
pub struct QuizController {
    bank: Vec<Arc<Question>>,
    clock: Clock,
    state: QuizState,
}

impl QuizController {
    pub fn new(bank: Vec<Arc<Question>>) -> Self {
        Self {
            bank,
            clock: Clock::default(),
            state: QuizState::Building,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn bank(&self) -> &[Arc<Question>] {
        &self.bank
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Mutable access for advancing a fixed clock in tests and simulations.
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            QuizState::InProgress(session) => Some(session),
            _ => None,
        }
    }

    pub fn summary(&self) -> Option<&QuizSummary> {
        match &self.state {
            QuizState::Finished(summary) => Some(summary),
            _ => None,
        }
    }

    /// Start a session using the thread-local RNG for shuffling.
    pub fn start(&mut self, criteria: &QuizCriteria) -> Result<&Session, QuizError> {
        self.start_with_rng(criteria, &mut rand::rng())
    }

    /// Start a session with an explicit RNG.
    ///
    /// Fails with `EmptyBank` or `NoMatchingQuestions` without touching the
    /// current state, and with `SessionActive` unless the controller is in
    /// `Building`.
    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        criteria: &QuizCriteria,
        rng: &mut R,
    ) -> Result<&Session, QuizError> {
        if !matches!(self.state, QuizState::Building) {
            return Err(QuizError::SessionActive);
        }
        if self.bank.is_empty() {
            return Err(QuizError::EmptyBank);
        }
        let questions = select_questions(&self.bank, criteria, rng)?;
        let session = Session::new(questions, criteria.hide_module_info, self.clock.now());
        tracing::info!(questions = session.len(), "quiz started");
        self.state = QuizState::InProgress(session);
        self.session().ok_or(QuizError::NoActiveSession)
    }

    /// Persist `input` for the current question and move to the next one.
    ///
    /// Returns `false` (and changes nothing) on the last question or when no
    /// session is open.
    pub fn advance(&mut self, input: &RawInput) -> bool {
        self.move_by(1, input)
    }

    /// Persist `input` for the current question and move to the previous one.
    pub fn retreat(&mut self, input: &RawInput) -> bool {
        self.move_by(-1, input)
    }

    fn move_by(&mut self, step: isize, input: &RawInput) -> bool {
        let now = self.clock.now();
        let QuizState::InProgress(session) = &mut self.state else {
            return false;
        };
        let Some(target) = session
            .current_index
            .checked_add_signed(step)
            .filter(|&t| t < session.len())
        else {
            return false;
        };
        session.persist_current(input, now);
        session.enter(target, now);
        tracing::debug!(index = target, "moved to question");
        true
    }

    /// Persist `input`, close the session, and build its summary.
    pub fn finish(&mut self, input: &RawInput) -> Result<&QuizSummary, QuizError> {
        let now = self.clock.now();
        let mut session = match std::mem::take(&mut self.state) {
            QuizState::InProgress(session) => session,
            other => {
                self.state = other;
                return Err(QuizError::NoActiveSession);
            }
        };
        session.persist_current(input, now);
        let summary = QuizSummary::from_session(&session, now);
        tracing::info!(
            correct = summary.correct_count(),
            total = summary.total(),
            "quiz finished"
        );
        self.state = QuizState::Finished(summary);
        self.summary().ok_or(QuizError::NoActiveSession)
    }

    /// Discard any session or summary and return to `Building`.
    pub fn reset(&mut self) {
        if !matches!(self.state, QuizState::Building) {
            tracing::debug!(from = self.state.name(), "quiz reset");
        }
        self.state = QuizState::Building;
    }

    /// Live elapsed estimate for the current question. Never mutates state.
    pub fn display_elapsed_ms(&self) -> Option<u64> {
        self.session()
            .map(|session| session.display_elapsed_ms(self.clock.now()))
    }

    /// Widget state to show for the current question, from its stored answer.
    pub fn display_input(&self) -> Option<RawInput> {
        self.session().map(|session| {
            codec::encode(
                session.current_question(),
                session.current_response().answer(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionKind, QuestionOption};
    use crate::time::fixed_clock;

    fn bank() -> Vec<Arc<Question>> {
        let make = |id: &str, kind: QuestionKind| {
            Arc::new(Question {
                id: id.into(),
                module: "M1".into(),
                topic: "T".into(),
                prompt: format!("prompt {id}"),
                code: None,
                kind,
                difficulty: None,
                generated: false,
            })
        };
        vec![
            make(
                "one",
                QuestionKind::SingleChoice {
                    options: vec![QuestionOption::new("a", "A"), QuestionOption::new("b", "B")],
                    answer: "b".into(),
                },
            ),
            make(
                "two",
                QuestionKind::FreeText {
                    answer: "paris".into(),
                },
            ),
            make(
                "three",
                QuestionKind::TrueFalse {
                    options: vec![],
                    answer: true,
                },
            ),
        ]
    }

    fn controller() -> QuizController {
        QuizController::new(bank()).with_clock(fixed_clock())
    }

    fn criteria() -> QuizCriteria {
        QuizCriteria {
            requested_count: 3,
            ..Default::default()
        }
    }

    #[test]
    fn start_enters_first_question() {
        let mut c = controller();
        let session = c.start(&criteria()).unwrap();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.len(), 3);
        assert!(session.responses().iter().all(|r| r.answer().is_none()));
        assert_eq!(session.title(), "Question 1 of 3");
    }

    #[test]
    fn empty_bank_fails_and_stays_building() {
        let mut c = QuizController::new(vec![]);
        assert_eq!(c.start(&criteria()).unwrap_err(), QuizError::EmptyBank);
        assert!(matches!(c.state(), QuizState::Building));
    }

    #[test]
    fn no_match_fails_and_stays_building() {
        let mut c = controller();
        let criteria = QuizCriteria {
            modules: ["nope".to_string()].into_iter().collect(),
            ..criteria()
        };
        assert_eq!(c.start(&criteria).unwrap_err(), QuizError::NoMatchingQuestions);
        assert!(matches!(c.state(), QuizState::Building));
    }

    #[test]
    fn start_while_open_is_rejected() {
        let mut c = controller();
        c.start(&criteria()).unwrap();
        assert_eq!(c.start(&criteria()).unwrap_err(), QuizError::SessionActive);
        assert!(c.session().is_some());
    }

    #[test]
    fn navigation_persists_answers() {
        let mut c = controller();
        c.start(&criteria()).unwrap();
        assert!(c.advance(&RawInput::Radio(Some("b".into()))));
        assert!(c.retreat(&RawInput::Text(" Paris ".into())));

        let session = c.session().unwrap();
        assert_eq!(session.responses()[0].answer(), Some(&Answer::Choice("b".into())));
        assert_eq!(session.responses()[1].answer(), Some(&Answer::Text("Paris".into())));
        assert_eq!(c.display_input(), Some(RawInput::Radio(Some("b".into()))));
        assert_eq!(session.progress_text(), "2/3 questions answered");
    }

    #[test]
    fn boundaries_follow_the_cursor() {
        let mut c = controller();
        c.start(&criteria()).unwrap();
        let session = c.session().unwrap();
        assert!(session.is_first() && !session.is_last());

        c.advance(&RawInput::Radio(None));
        let session = c.session().unwrap();
        assert!(!session.is_first() && !session.is_last());

        c.advance(&RawInput::Text(String::new()));
        let session = c.session().unwrap();
        assert!(!session.is_first() && session.is_last());
    }

    #[test]
    fn out_of_range_is_noop() {
        let mut c = controller();
        c.start(&criteria()).unwrap();
        c.clock_mut().advance_ms(500);
        assert!(!c.retreat(&RawInput::Radio(Some("a".into()))));
        let session = c.session().unwrap();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.responses()[0].answer(), None);
        assert_eq!(session.responses()[0].active_time_ms(), 0);
        assert_eq!(c.display_elapsed_ms(), Some(500));
    }

    #[test]
    fn time_accumulates_across_visits() {
        let mut c = controller();
        c.start(&criteria()).unwrap();
        c.clock_mut().advance_ms(1_000);
        c.advance(&RawInput::Radio(None));
        c.clock_mut().advance_ms(300);
        c.retreat(&RawInput::Text(String::new()));
        c.clock_mut().advance_ms(2_000);
        c.advance(&RawInput::Radio(None));

        let session = c.session().unwrap();
        assert_eq!(session.responses()[0].active_time_ms(), 3_000);
        assert_eq!(session.responses()[1].active_time_ms(), 300);
    }

    #[test]
    fn display_ticks_do_not_change_authoritative_time() {
        let mut c = controller();
        c.start(&criteria()).unwrap();
        for _ in 0..10 {
            c.clock_mut().advance_ms(250);
            let _ = c.display_elapsed_ms();
        }
        assert_eq!(c.session().unwrap().responses()[0].active_time_ms(), 0);
        c.advance(&RawInput::Radio(None));
        assert_eq!(c.session().unwrap().responses()[0].active_time_ms(), 2_500);
    }

    #[test]
    fn finish_from_middle_summarizes_everything() {
        let mut c = controller();
        c.start(&criteria()).unwrap();
        c.advance(&RawInput::Radio(Some("b".into())));
        c.clock_mut().advance_ms(1_200);
        let summary = c.finish(&RawInput::Text("PARIS".into())).unwrap();
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.correct_count(), 2);
        assert_eq!(summary.entries()[1].time_spent_ms(), 1_200);
        assert!(c.session().is_none());
        assert!(matches!(c.state(), QuizState::Finished(_)));
    }

    #[test]
    fn finished_is_terminal_until_reset() {
        let mut c = controller();
        c.start(&criteria()).unwrap();
        c.finish(&RawInput::Radio(None)).unwrap();
        assert!(!c.advance(&RawInput::Radio(None)));
        assert_eq!(c.start(&criteria()).unwrap_err(), QuizError::SessionActive);
        assert_eq!(
            c.finish(&RawInput::Radio(None)).unwrap_err(),
            QuizError::NoActiveSession
        );
        assert!(c.summary().is_some());

        c.reset();
        assert!(matches!(c.state(), QuizState::Building));
        assert!(c.start(&criteria()).is_ok());
    }
}
