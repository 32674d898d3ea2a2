//! Core lock engine: question generation, answer evaluation, feedback timing
//! and focus retention.
//!
//! ## Module overview
//!
//! | Module         | Purpose |
//! |----------------|---------|
//! | `models`       | Shared types: questions, session states, outcomes, display commands, handles |
//! | `config`       | `LockConfig` with serde defaults and validation |
//! | `generator`    | Random arithmetic questions with exact division |
//! | `input`        | Keystroke filter and answer buffer |
//! | `quiz`         | The quiz state machine and strike bookkeeping |
//! | `presenter`    | Display commands, flash and failure-sequence timers |
//! | `watchdog`     | Burst ladder + heartbeat keeping the answer field focused |
//! | `host`         | Traits the host environment implements |
//! | `lock_session` | Wires everything onto one event loop |
//! | `sim`          | Virtual-clock host for tests and demos |

pub mod config;
pub mod generator;
pub mod host;
pub mod input;
pub mod lock_session;
pub mod models;
pub mod presenter;
pub mod quiz;
pub mod sim;
pub mod watchdog;

pub use config::{LockConfig, OperandRange, OperandRanges, TimingConfig};
pub use generator::QuestionGenerator;
pub use host::{DisplaySink, FocusEnvironment, Host, TimerScheduler};
pub use input::{AnswerBuffer, ControlKey, FilterAction, InputFilter, KeyEvent};
pub use lock_session::LockSession;
pub use models::{
    DisplayCommand, FlashColor, FocusTarget, Operator, Outcome, Question, SessionState,
    TimerHandle, TimerKind,
};
pub use presenter::{FlashState, PresentationController, PresentationEvent};
pub use quiz::{AnswerSubmissionListener, QuizEngine, QuizSession};
pub use sim::SimHost;
pub use watchdog::{AssertOutcome, FocusWatchdog, WatchdogState};
