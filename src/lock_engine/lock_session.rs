//! One lock-screen session on a single cooperative event loop.
//!
//! `LockSession` owns every component and is the only thing the host calls:
//! keystrokes go to [`LockSession::on_key`], fired timers to
//! [`LockSession::on_timer`], and environment focus notifications to
//! [`LockSession::on_focus_changed`]. Callbacks run one at a time, so no
//! state here is shared or locked.

use std::path::Path;

use tracing::{debug, info, trace, warn};

use crate::error::LockError;
use crate::lock_engine::{
    config::LockConfig,
    host::Host,
    input::{ControlKey, FilterAction, InputFilter, KeyEvent},
    models::{DisplayCommand, FocusTarget, Outcome, TimerHandle, TimerKind},
    presenter::{PresentationController, PresentationEvent},
    quiz::{AnswerSubmissionListener, QuizEngine},
    watchdog::FocusWatchdog,
};

pub struct LockSession {
    config: LockConfig,
    target: FocusTarget,
    filter: InputFilter,
    engine: QuizEngine,
    presenter: PresentationController,
    watchdog: FocusWatchdog,
}

impl LockSession {
    /// `target` is the host's answer field; it never changes afterwards.
    pub fn new(config: LockConfig, target: FocusTarget) -> Result<Self, LockError> {
        config.validate()?;
        Ok(LockSession {
            engine: QuizEngine::new(&config)?,
            presenter: PresentationController::new(&config),
            watchdog: FocusWatchdog::new(&config.timing),
            filter: InputFilter::new(),
            target,
            config,
        })
    }

    /// Load a JSON config from disk and build a session around `target`.
    pub fn from_json_file(path: impl AsRef<Path>, target: FocusTarget) -> Result<Self, LockError> {
        let config = LockConfig::from_json_file(path)?;
        Self::new(config, target)
    }

    /// Pose the first question and put the answer field under watch.
    /// Calling it again restarts the quiz and abandons any running flash
    /// or lockout.
    pub fn start<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.presenter.reset(host);
        self.engine.start(self.config.total_questions, self.config.fail_threshold);
        self.filter.clear();
        if let Some(session) = self.engine.session() {
            self.presenter.question_changed(host, session, self.engine.fail_threshold());
        }
        self.watchdog.arm(host, self.target);
        info!(surface = self.target.0, "lock session started");
    }

    /// Feed one key event. Returns the outcome when the key was an Enter
    /// that submitted an answer.
    pub fn on_key<H: Host + ?Sized>(&mut self, host: &mut H, event: &KeyEvent) -> Option<Outcome> {
        if !self.engine.state().is_some_and(|s| s.accepts_answers()) {
            trace!(?event, state = ?self.engine.state(), "key dropped, not accepting answers");
            return None;
        }
        match self.filter.on_key(event) {
            FilterAction::AcceptControl(ControlKey::Enter) => self.submit(host),
            FilterAction::Reject
            | FilterAction::Accept(_)
            | FilterAction::AcceptText(_)
            | FilterAction::AcceptControl(ControlKey::Backspace) => None,
        }
    }

    /// Dispatch a timer the host scheduled on behalf of this session.
    pub fn on_timer<H: Host + ?Sized>(&mut self, host: &mut H, handle: TimerHandle, kind: TimerKind) {
        match kind {
            TimerKind::FlashRevert | TimerKind::FailureTick => {
                if let Some(PresentationEvent::FailureSequenceFinished) = self.presenter.on_timer(host, handle, kind) {
                    self.finish_lockout(host);
                }
            }
            TimerKind::FocusBurst | TimerKind::FocusHeartbeat => self.watchdog.on_timer(host, handle, kind),
        }
    }

    /// The environment reports that the focus holder changed.
    pub fn on_focus_changed<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.watchdog.assert_focus(host);
    }

    pub fn engine(&self) -> &QuizEngine {
        &self.engine
    }

    pub fn presenter(&self) -> &PresentationController {
        &self.presenter
    }

    pub fn watchdog(&self) -> &FocusWatchdog {
        &self.watchdog
    }

    pub fn input(&self) -> &InputFilter {
        &self.filter
    }

    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    pub fn target(&self) -> FocusTarget {
        self.target
    }

    pub fn is_complete(&self) -> bool {
        self.engine.is_complete()
    }

    /// Submit `text` as if it had been typed into the field and Enter
    /// pressed. Whatever was typed so far is discarded.
    pub fn submit_text<H: Host + ?Sized>(&mut self, host: &mut H, text: &str) -> Result<Outcome, LockError> {
        self.filter.clear();
        host.display(DisplayCommand::ClearAnswerField);
        let outcome = self.engine.on_submit(text)?;
        debug!(%outcome, "answer evaluated");
        self.present(host, outcome);
        Ok(outcome)
    }

    fn submit<H: Host + ?Sized>(&mut self, host: &mut H) -> Option<Outcome> {
        let text = self.filter.buffer_mut().take();
        match self.submit_text(host, &text) {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                warn!(%err, "submission ignored");
                None
            }
        }
    }

    fn present<H: Host + ?Sized>(&mut self, host: &mut H, outcome: Outcome) {
        let threshold = self.engine.fail_threshold();
        match outcome {
            Outcome::Correct => {
                self.presenter.flash_outcome(host, outcome);
                if let Some(session) = self.engine.session() {
                    self.presenter.question_changed(host, session, threshold);
                }
                self.watchdog.on_trigger_event(host);
            }
            Outcome::Incorrect => {
                self.presenter.flash_outcome(host, outcome);
                if let Some(session) = self.engine.session() {
                    self.presenter.show_counter(host, session, threshold);
                }
                self.watchdog.on_trigger_event(host);
            }
            Outcome::Malformed => {
                self.presenter.flash_outcome(host, outcome);
                self.watchdog.on_trigger_event(host);
            }
            Outcome::StruckOut => {
                if let Err(err) = self.engine.begin_cooldown() {
                    warn!(%err, "could not enter lockout");
                    return;
                }
                if let Some(PresentationEvent::FailureSequenceFinished) = self.presenter.begin_failure_sequence(host) {
                    self.finish_lockout(host);
                }
            }
            Outcome::SessionComplete => {
                self.presenter.flash_outcome(host, outcome);
                self.watchdog.disarm(host);
                info!("lock session complete");
            }
        }
    }

    fn finish_lockout<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Err(err) = self.engine.resume_after_failure() {
            warn!(%err, "lockout finished outside a lockout");
            return;
        }
        self.filter.clear();
        if let Some(session) = self.engine.session() {
            self.presenter.question_changed(host, session, self.engine.fail_threshold());
        }
        self.watchdog.on_trigger_event(host);
    }
}
