use std::fmt;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub const ALL: [Operator; 4] = [Operator::Add, Operator::Sub, Operator::Mul, Operator::Div];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "×",
            Operator::Div => "÷",
        }
    }

    /// Evaluate `a op b`. Division is exact by construction, see
    /// [`QuestionGenerator`](crate::QuestionGenerator).
    pub fn apply(self, a: i64, b: i64) -> i64 {
        match self {
            Operator::Add => a + b,
            Operator::Sub => a - b,
            Operator::Mul => a * b,
            Operator::Div => a / b,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One arithmetic prompt. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub operator: Operator,
    pub operand_a: i64,
    pub operand_b: i64,
    pub expected_answer: i64,
    /// Rendered as `"{a} {symbol} {b} ="`.
    pub display_text: String,
}

impl Question {
    pub fn new(operator: Operator, operand_a: i64, operand_b: i64) -> Self {
        Question {
            operator,
            operand_a,
            operand_b,
            expected_answer: operator.apply(operand_a, operand_b),
            display_text: format!("{} {} {} =", operand_a, operator.symbol(), operand_b),
        }
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_text)
    }
}

// ---------------------------------------------------------------------------
// Quiz state
// ---------------------------------------------------------------------------

/// Lifecycle of a quiz session.
///
/// `Correct` and `Incorrect` are passed through during a submission; the
/// resting states between callbacks are `Asking`, `FailureCooldown` and
/// `Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Asking,
    Correct,
    Incorrect,
    Failed,
    FailureCooldown,
    Complete,
}

impl SessionState {
    pub fn accepts_answers(self) -> bool {
        matches!(self, SessionState::Asking)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Asking          => "asking",
            SessionState::Correct         => "correct",
            SessionState::Incorrect       => "incorrect",
            SessionState::Failed          => "failed",
            SessionState::FailureCooldown => "in failure cooldown",
            SessionState::Complete        => "complete",
        };
        write!(f, "{}", s)
    }
}

/// Result of evaluating one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Right answer; a new question is posed.
    Correct,
    /// Wrong answer below the strike threshold (or no threshold at all).
    Incorrect,
    /// Text did not parse as an integer. Never counts as a strike.
    Malformed,
    /// Wrong answer that reached the strike threshold; a lockout follows.
    StruckOut,
    /// Right answer to the last question.
    SessionComplete,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Correct | Outcome::SessionComplete)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Correct         => "correct",
            Outcome::Incorrect       => "incorrect",
            Outcome::Malformed       => "malformed",
            Outcome::StruckOut       => "struck out",
            Outcome::SessionComplete => "session complete",
        };
        write!(f, "{}", s)
    }
}

// ---------------------------------------------------------------------------
// Display commands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlashColor {
    Success,
    Error,
    Neutral,
}

impl FlashColor {
    /// RGB hex used by the render bridge.
    pub fn hex(self) -> &'static str {
        match self {
            FlashColor::Success => "#00FF00",
            FlashColor::Error   => "#FF0000",
            FlashColor::Neutral => "#000000",
        }
    }
}

/// Everything the core asks the host to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayCommand {
    ShowQuestion(String),
    ShowCounter(String),
    Flash(FlashColor),
    ShowFailureOverlay { visible: bool, text: String },
    ShowAnswerField(bool),
    ClearAnswerField,
}

// ---------------------------------------------------------------------------
// Host handles
// ---------------------------------------------------------------------------

/// Opaque handle to an input surface, assigned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FocusTarget(pub u64);

/// Opaque handle to a scheduled callback, assigned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(pub u64);

/// Which component a scheduled callback belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    FlashRevert,
    FailureTick,
    FocusBurst,
    FocusHeartbeat,
}
