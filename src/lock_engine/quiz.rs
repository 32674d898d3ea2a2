//! The quiz state machine.
//!
//! ```text
//! Asking -> Correct -> Asking (next question) | Complete
//! Asking -> Incorrect -> Asking | Failed
//! Failed -> FailureCooldown -> Asking (same question, one more to answer)
//! ```
//!
//! Without a fail threshold the engine never leaves `Asking` on a wrong
//! answer: the same question is simply posed again.

use std::num::IntErrorKind;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, QuizError};
use crate::lock_engine::{
    config::{LockConfig, OperandRanges},
    generator::QuestionGenerator,
    input::AnswerBuffer,
    models::{Outcome, Question, SessionState},
};

/// Typed replacement for an "enter was pressed" delegate.
pub trait AnswerSubmissionListener {
    fn on_submit(&mut self, text: &str) -> Result<Outcome, QuizError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    pub questions_remaining: u32,
    pub current_question: Question,
    pub wrong_answer_count: u32,
    pub state: SessionState,
}

pub struct QuizEngine<R: Rng = StdRng> {
    generator: QuestionGenerator,
    rng: R,
    fail_threshold: Option<u32>,
    session: Option<QuizSession>,
}

impl QuizEngine<StdRng> {
    /// Engine seeded from `config.rng_seed`, or from entropy when unset.
    /// Fails when `config.ranges` does not validate.
    pub fn new(config: &LockConfig) -> Result<Self, ConfigError> {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        Self::with_rng(&config.ranges, rng)
    }
}

impl<R: Rng> QuizEngine<R> {
    pub fn with_rng(ranges: &OperandRanges, rng: R) -> Result<Self, ConfigError> {
        Ok(QuizEngine {
            generator: QuestionGenerator::new(ranges)?,
            rng,
            fail_threshold: None,
            session: None,
        })
    }

    /// Begin a fresh session and pose its first question.
    pub fn start(&mut self, total_questions: u32, fail_threshold: Option<u32>) -> &Question {
        if total_questions == 0 {
            warn!("total_questions of 0 raised to 1");
        }
        if fail_threshold == Some(0) {
            warn!("fail_threshold of 0 raised to 1");
        }
        self.fail_threshold = fail_threshold.map(|t| t.max(1));
        let question = self.generator.generate(&mut self.rng);
        info!(
            total = total_questions.max(1),
            threshold = ?self.fail_threshold,
            question = %question.display_text,
            "quiz started"
        );
        let session = self.session.insert(QuizSession {
            questions_remaining: total_questions.max(1),
            current_question: question,
            wrong_answer_count: 0,
            state: SessionState::Asking,
        });
        &session.current_question
    }

    /// Evaluate a submitted answer.
    ///
    /// Malformed text (anything that is not a signed integer after
    /// trimming) never counts as a strike. An integer too large for `i64`
    /// is well formed and simply wrong.
    pub fn submit(&mut self, raw_text: &str) -> Result<Outcome, QuizError> {
        let threshold = self.fail_threshold;
        let session = self.session.as_mut().ok_or(QuizError::NotStarted)?;
        if !session.state.accepts_answers() {
            return Err(QuizError::NotAccepting { state: session.state });
        }

        let guess: Option<i64> = match raw_text.trim().parse::<i64>() {
            Ok(v) => Some(v),
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => None,
            Err(_) => {
                debug!(text = raw_text, "malformed answer");
                return Ok(Outcome::Malformed);
            }
        };

        if guess == Some(session.current_question.expected_answer) {
            transition(session, SessionState::Correct);
            session.questions_remaining = session.questions_remaining.saturating_sub(1);
            session.wrong_answer_count = 0;
            if session.questions_remaining == 0 {
                transition(session, SessionState::Complete);
                info!("quiz complete");
                return Ok(Outcome::SessionComplete);
            }
            session.current_question = self.generator.generate(&mut self.rng);
            transition(session, SessionState::Asking);
            debug!(
                remaining = session.questions_remaining,
                question = %session.current_question.display_text,
                "question changed"
            );
            return Ok(Outcome::Correct);
        }

        transition(session, SessionState::Incorrect);
        let Some(threshold) = threshold else {
            transition(session, SessionState::Asking);
            return Ok(Outcome::Incorrect);
        };

        session.wrong_answer_count += 1;
        debug!(?guess, strikes = session.wrong_answer_count, threshold, "wrong answer");
        if session.wrong_answer_count >= threshold {
            transition(session, SessionState::Failed);
            info!(question = %session.current_question.display_text, "strike threshold reached");
            Ok(Outcome::StruckOut)
        } else {
            transition(session, SessionState::Asking);
            Ok(Outcome::Incorrect)
        }
    }

    /// Submit the buffer's contents. The buffer is empty afterwards,
    /// whatever the outcome.
    pub fn submit_buffer(&mut self, buffer: &mut AnswerBuffer) -> Result<Outcome, QuizError> {
        let text = buffer.take();
        self.submit(&text)
    }

    /// Mark the lockout as being presented.
    pub fn begin_cooldown(&mut self) -> Result<(), QuizError> {
        let session = self.session.as_mut().ok_or(QuizError::NotStarted)?;
        match session.state {
            SessionState::Failed => {
                transition(session, SessionState::FailureCooldown);
                Ok(())
            }
            state => Err(QuizError::NotInLockout { state }),
        }
    }

    /// Leave the lockout: strikes reset, one more question to answer, and
    /// the same question is posed again.
    pub fn resume_after_failure(&mut self) -> Result<&Question, QuizError> {
        let session = self.session.as_mut().ok_or(QuizError::NotStarted)?;
        match session.state {
            SessionState::Failed | SessionState::FailureCooldown => {
                session.wrong_answer_count = 0;
                session.questions_remaining += 1;
                transition(session, SessionState::Asking);
                info!(
                    remaining = session.questions_remaining,
                    question = %session.current_question.display_text,
                    "lockout over, question re-posed"
                );
                Ok(&session.current_question)
            }
            state => Err(QuizError::NotInLockout { state }),
        }
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn state(&self) -> Option<SessionState> {
        self.session.as_ref().map(|s| s.state)
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.session.as_ref().map(|s| &s.current_question)
    }

    pub fn fail_threshold(&self) -> Option<u32> {
        self.fail_threshold
    }

    pub fn is_complete(&self) -> bool {
        self.state() == Some(SessionState::Complete)
    }
}

impl<R: Rng> AnswerSubmissionListener for QuizEngine<R> {
    fn on_submit(&mut self, text: &str) -> Result<Outcome, QuizError> {
        self.submit(text)
    }
}

fn transition(session: &mut QuizSession, to: SessionState) {
    debug!(from = %session.state, to = %to, "quiz state");
    session.state = to;
}
