//! quizkit-core: quiz session engine, answer codec, and scoring.
//!
//! This crate defines the question model, the quiz builder, the session
//! state machine with its timer, and the summary that report generators
//! build on.

pub mod bank;
pub mod builder;
pub mod codec;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod export;
pub mod model;
pub mod session;
pub mod summary;
pub mod time;
pub mod timer;

pub use error::QuizError;
pub use session::{QuizController, QuizState};
pub use time::Clock;
