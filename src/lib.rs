//! # math_lock
//!
//! The core of a screen-lock overlay that only lets the user through after
//! answering a short run of arithmetic questions.
//!
//! Drawing the overlay is the host's job. This crate owns the parts that are
//! easy to get subtly wrong:
//!
//! - a **quiz state machine** that generates questions, evaluates answers,
//!   counts strikes and imposes a timed lockout when too many wrong answers
//!   pile up on one question;
//! - **timed feedback**: green/red flashes that revert on their own, and a
//!   failure sequence that cannot be interrupted;
//! - a **focus watchdog** that keeps the answer field holding keyboard focus
//!   even when the window manager or an activation animation takes it away.
//!
//! ## How it works
//!
//! 1. Build a [`LockConfig`] (defaults: 3 questions, lockout after 2
//!    strikes) and a [`LockSession`] around the host's answer field.
//! 2. Implement [`Host`] for your environment: focus primitives, timers,
//!    and a sink for [`DisplayCommand`]s.
//! 3. Forward key events to [`LockSession::on_key`] and fired timers to
//!    [`LockSession::on_timer`]. When `on_key` returns
//!    [`Outcome::SessionComplete`] the overlay can be dismissed.
//!
//! ## Quick start
//!
//! ```rust
//! use math_lock::{FocusTarget, KeyEvent, LockConfig, LockSession, SimHost};
//!
//! let config = LockConfig::default().with_seed(42);
//! let mut host = SimHost::new();
//! let mut session = LockSession::new(config, FocusTarget(1)).unwrap();
//! session.start(&mut host);
//!
//! while !session.is_complete() {
//!     let answer = session.engine().current_question().unwrap().expected_answer;
//!     for c in answer.to_string().chars() {
//!         session.on_key(&mut host, &KeyEvent::Char(c));
//!     }
//!     let outcome = session.on_key(&mut host, &KeyEvent::Enter).unwrap();
//!     assert!(outcome.is_success());
//! }
//! assert!(host.last_question().is_some());
//! ```

pub mod error;
pub mod lock_engine;
pub mod render_adapter;

// Convenience re-exports so callers can use `math_lock::LockSession`
// directly without reaching into `lock_engine::`.
pub use error::{ConfigError, LockError, QuizError};
pub use lock_engine::{
    AnswerBuffer, AnswerSubmissionListener, AssertOutcome, ControlKey, DisplayCommand,
    DisplaySink, FilterAction, FlashColor, FlashState, FocusEnvironment, FocusTarget,
    FocusWatchdog, Host, InputFilter, KeyEvent, LockConfig, LockSession, OperandRange,
    OperandRanges, Operator, Outcome, PresentationController, PresentationEvent, Question,
    QuestionGenerator, QuizEngine, QuizSession, SessionState, SimHost, TimerHandle, TimerKind,
    TimerScheduler, TimingConfig, WatchdogState,
};
pub use render_adapter::{to_render_line, to_render_message};
