//! Error types for configuration loading and out-of-state engine calls.
//!
//! Quiz anomalies (malformed answers, rejected keystrokes, lost focus) are
//! not errors; they surface as [`Outcome`](crate::Outcome) /
//! [`FilterAction`](crate::FilterAction) values or are retried silently.

use thiserror::Error;

use crate::lock_engine::models::SessionState;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("range `{name}` is inverted: min {min} > max {max}")]
    InvalidRange { name: &'static str, min: i64, max: i64 },

    #[error("range `{name}` must not include zero")]
    ZeroInRange { name: &'static str },

    #[error("range `{name}` holds a single value but distinct operands are required")]
    DegenerateRange { name: &'static str },

    #[error("total_questions must be at least 1")]
    ZeroTotalQuestions,

    #[error("fail_threshold must be at least 1 when set")]
    ZeroFailThreshold,

    #[error("focus burst ladder must contain at least one delay")]
    EmptyBurstLadder,

    #[error("focus burst ladder delays must be strictly increasing")]
    UnorderedBurstLadder,

    #[error("interval `{name}` must be greater than zero")]
    ZeroInterval { name: &'static str },

    #[error("failed to parse lock config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read lock config: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("quiz has not been started")]
    NotStarted,

    #[error("quiz is not accepting answers while {state}")]
    NotAccepting { state: SessionState },

    #[error("quiz is not in a lockout while {state}")]
    NotInLockout { state: SessionState },
}

#[derive(Debug, Error)]
pub enum LockError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}
