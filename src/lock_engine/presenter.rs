//! Turns quiz state into display commands and owns the flash timers.
//!
//! Two kinds of flash are mutually exclusive:
//!
//! - a **simple flash** (green/red) that reverts to neutral after a fixed
//!   delay; requesting another one before the revert pushes the revert out
//!   to a fresh full delay;
//! - the **failure sequence**, which alternates red/neutral on a repeating
//!   timer for a fixed number of ticks behind the failure overlay. While it
//!   runs, simple flashes are dropped.

use std::time::Duration;

use tracing::{debug, trace};

use crate::lock_engine::{
    config::LockConfig,
    host::{DisplaySink, TimerScheduler},
    models::{DisplayCommand, FlashColor, Outcome, TimerHandle, TimerKind},
    quiz::QuizSession,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashState {
    Idle,
    Flashing { revert: TimerHandle },
    FailureSequence { ticks_done: u32, timer: TimerHandle },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationEvent {
    /// Last failure tick shown; the quiz may resume.
    FailureSequenceFinished,
}

#[derive(Debug)]
pub struct PresentationController {
    flash_delay: Duration,
    tick_interval: Duration,
    failure_ticks: u32,
    counter_prefix: String,
    strike_prefix: String,
    failure_text: String,
    state: FlashState,
}

impl PresentationController {
    pub fn new(config: &LockConfig) -> Self {
        PresentationController {
            flash_delay: config.timing.flash(),
            tick_interval: config.timing.failure_tick(),
            failure_ticks: config.timing.failure_ticks.max(1),
            counter_prefix: config.counter_prefix.clone(),
            strike_prefix: config.strike_prefix.clone(),
            failure_text: config.failure_text.clone(),
            state: FlashState::Idle,
        }
    }

    pub fn state(&self) -> FlashState {
        self.state
    }

    pub fn in_failure_sequence(&self) -> bool {
        matches!(self.state, FlashState::FailureSequence { .. })
    }

    /// `"{prefix}{remaining}"`, plus a strike line when strikes are tracked.
    pub fn counter_text(&self, session: &QuizSession, fail_threshold: Option<u32>) -> String {
        let mut text = format!("{}{}", self.counter_prefix, session.questions_remaining);
        if let Some(threshold) = fail_threshold {
            text.push_str(&format!(
                "\n{}{} / {}",
                self.strike_prefix, session.wrong_answer_count, threshold
            ));
        }
        text
    }

    pub fn question_changed<H>(&self, host: &mut H, session: &QuizSession, fail_threshold: Option<u32>)
    where
        H: DisplaySink + ?Sized,
    {
        host.display(DisplayCommand::ShowQuestion(session.current_question.display_text.clone()));
        host.display(DisplayCommand::ClearAnswerField);
        self.show_counter(host, session, fail_threshold);
    }

    pub fn show_counter<H>(&self, host: &mut H, session: &QuizSession, fail_threshold: Option<u32>)
    where
        H: DisplaySink + ?Sized,
    {
        host.display(DisplayCommand::ShowCounter(self.counter_text(session, fail_threshold)));
    }

    /// Green for right answers, red for everything else.
    pub fn flash_outcome<H>(&mut self, host: &mut H, outcome: Outcome) -> bool
    where
        H: DisplaySink + TimerScheduler + ?Sized,
    {
        let color = if outcome.is_success() { FlashColor::Success } else { FlashColor::Error };
        self.flash(host, color)
    }

    /// Show `color` and schedule the revert. Returns `false` when a failure
    /// sequence suppressed the flash.
    pub fn flash<H>(&mut self, host: &mut H, color: FlashColor) -> bool
    where
        H: DisplaySink + TimerScheduler + ?Sized,
    {
        match self.state {
            FlashState::FailureSequence { .. } => {
                trace!(?color, "flash suppressed by failure sequence");
                return false;
            }
            FlashState::Flashing { revert } => host.cancel(revert),
            FlashState::Idle => {}
        }
        host.display(DisplayCommand::Flash(color));
        let revert = host.schedule_once(self.flash_delay, TimerKind::FlashRevert);
        self.state = FlashState::Flashing { revert };
        true
    }

    /// Hide the answer field, raise the overlay and show the first tick.
    pub fn begin_failure_sequence<H>(&mut self, host: &mut H) -> Option<PresentationEvent>
    where
        H: DisplaySink + TimerScheduler + ?Sized,
    {
        match self.state {
            FlashState::FailureSequence { .. } => return None,
            FlashState::Flashing { revert } => host.cancel(revert),
            FlashState::Idle => {}
        }
        debug!(ticks = self.failure_ticks, "failure sequence started");
        host.display(DisplayCommand::ShowAnswerField(false));
        host.display(DisplayCommand::ShowFailureOverlay { visible: true, text: self.failure_text.clone() });
        let timer = host.schedule_repeating(self.tick_interval, TimerKind::FailureTick);
        self.state = FlashState::FailureSequence { ticks_done: 0, timer };
        self.failure_tick(host)
    }

    /// Drop any pending flash or failure sequence and return to neutral.
    /// A running failure sequence is torn down without reporting
    /// `FailureSequenceFinished`.
    pub fn reset<H>(&mut self, host: &mut H)
    where
        H: DisplaySink + TimerScheduler + ?Sized,
    {
        match self.state {
            FlashState::Idle => return,
            FlashState::Flashing { revert } => host.cancel(revert),
            FlashState::FailureSequence { timer, ticks_done } => {
                host.cancel(timer);
                debug!(ticks_done, "failure sequence abandoned");
                host.display(DisplayCommand::ShowFailureOverlay { visible: false, text: self.failure_text.clone() });
                host.display(DisplayCommand::ShowAnswerField(true));
            }
        }
        host.display(DisplayCommand::Flash(FlashColor::Neutral));
        self.state = FlashState::Idle;
    }

    /// Route a fired timer. Handles this controller no longer owns are ignored.
    pub fn on_timer<H>(&mut self, host: &mut H, handle: TimerHandle, kind: TimerKind) -> Option<PresentationEvent>
    where
        H: DisplaySink + TimerScheduler + ?Sized,
    {
        match (kind, self.state) {
            (TimerKind::FlashRevert, FlashState::Flashing { revert }) if revert == handle => {
                host.display(DisplayCommand::Flash(FlashColor::Neutral));
                self.state = FlashState::Idle;
                None
            }
            (TimerKind::FailureTick, FlashState::FailureSequence { timer, .. }) if timer == handle => {
                self.failure_tick(host)
            }
            _ => {
                trace!(?handle, ?kind, "ignoring stale presentation timer");
                None
            }
        }
    }

    fn failure_tick<H>(&mut self, host: &mut H) -> Option<PresentationEvent>
    where
        H: DisplaySink + TimerScheduler + ?Sized,
    {
        let FlashState::FailureSequence { ticks_done, timer } = self.state else {
            return None;
        };
        let color = if ticks_done % 2 == 0 { FlashColor::Error } else { FlashColor::Neutral };
        host.display(DisplayCommand::Flash(color));
        let ticks_done = ticks_done + 1;
        trace!(tick = ticks_done, ?color, "failure tick");

        if ticks_done < self.failure_ticks {
            self.state = FlashState::FailureSequence { ticks_done, timer };
            return None;
        }

        host.cancel(timer);
        if color != FlashColor::Neutral {
            host.display(DisplayCommand::Flash(FlashColor::Neutral));
        }
        host.display(DisplayCommand::ShowFailureOverlay { visible: false, text: self.failure_text.clone() });
        host.display(DisplayCommand::ShowAnswerField(true));
        self.state = FlashState::Idle;
        debug!("failure sequence finished");
        Some(PresentationEvent::FailureSequenceFinished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock_engine::models::Question;
    use crate::lock_engine::models::{Operator, SessionState};
    use crate::lock_engine::sim::SimHost;

    fn session(remaining: u32, wrong: u32) -> QuizSession {
        QuizSession {
            questions_remaining: remaining,
            current_question: Question::new(Operator::Mul, 6, 7),
            wrong_answer_count: wrong,
            state: SessionState::Asking,
        }
    }

    fn advance(p: &mut PresentationController, host: &mut SimHost, ms: u64) -> Vec<PresentationEvent> {
        let until = host.now() + Duration::from_millis(ms);
        let mut events = Vec::new();
        while let Some((handle, kind)) = host.pop_due(until) {
            events.extend(p.on_timer(host, handle, kind));
        }
        host.set_now(until);
        events
    }

    fn flashes(host: &SimHost) -> Vec<FlashColor> {
        host.displayed()
            .iter()
            .filter_map(|c| match c {
                DisplayCommand::Flash(color) => Some(*color),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn counter_text_with_and_without_strikes() {
        let p = PresentationController::new(&LockConfig::default());
        assert_eq!(p.counter_text(&session(3, 1), Some(2)), "Problems left: 3\nStrikes: 1 / 2");
        assert_eq!(p.counter_text(&session(2, 0), None), "Problems left: 2");
    }

    #[test]
    fn question_changed_shows_question_and_counter() {
        let p = PresentationController::new(&LockConfig::default());
        let mut host = SimHost::new();
        p.question_changed(&mut host, &session(3, 0), Some(2));
        assert_eq!(
            host.displayed(),
            &[
                DisplayCommand::ShowQuestion("6 × 7 =".into()),
                DisplayCommand::ClearAnswerField,
                DisplayCommand::ShowCounter("Problems left: 3\nStrikes: 0 / 2".into()),
            ]
        );
    }

    #[test]
    fn simple_flash_reverts_after_delay() {
        let mut p = PresentationController::new(&LockConfig::default());
        let mut host = SimHost::new();
        assert!(p.flash_outcome(&mut host, Outcome::Correct));
        advance(&mut p, &mut host, 349);
        assert_eq!(flashes(&host), vec![FlashColor::Success]);
        advance(&mut p, &mut host, 1);
        assert_eq!(flashes(&host), vec![FlashColor::Success, FlashColor::Neutral]);
        assert_eq!(p.state(), FlashState::Idle);
    }

    #[test]
    fn new_flash_supersedes_pending_revert() {
        let mut p = PresentationController::new(&LockConfig::default());
        let mut host = SimHost::new();
        p.flash_outcome(&mut host, Outcome::Malformed);
        advance(&mut p, &mut host, 300);
        p.flash_outcome(&mut host, Outcome::Incorrect);
        advance(&mut p, &mut host, 300);
        // the first revert would have landed at 350 ms
        assert_eq!(flashes(&host), vec![FlashColor::Error, FlashColor::Error]);
        advance(&mut p, &mut host, 50);
        assert_eq!(flashes(&host).last(), Some(&FlashColor::Neutral));
        assert_eq!(host.pending_timers(), 0);
    }

    #[test]
    fn failure_sequence_runs_six_ticks_then_finishes() {
        let mut p = PresentationController::new(&LockConfig::default());
        let mut host = SimHost::new();
        assert_eq!(p.begin_failure_sequence(&mut host), None);
        assert!(p.in_failure_sequence());
        assert!(host.displayed().contains(&DisplayCommand::ShowAnswerField(false)));

        let events = advance(&mut p, &mut host, 3_499);
        assert!(events.is_empty());
        let events = advance(&mut p, &mut host, 1);
        assert_eq!(events, vec![PresentationEvent::FailureSequenceFinished]);

        use FlashColor::{Error as R, Neutral as N};
        assert_eq!(flashes(&host), vec![R, N, R, N, R, N]);
        let tail = &host.displayed()[host.displayed().len() - 2..];
        assert_eq!(
            tail,
            &[
                DisplayCommand::ShowFailureOverlay { visible: false, text: "Problem Failed".into() },
                DisplayCommand::ShowAnswerField(true),
            ]
        );
        assert_eq!(p.state(), FlashState::Idle);
        assert_eq!(host.pending_timers(), 0);
    }

    #[test]
    fn failure_sequence_suppresses_simple_flashes() {
        let mut p = PresentationController::new(&LockConfig::default());
        let mut host = SimHost::new();
        p.flash_outcome(&mut host, Outcome::Incorrect);
        p.begin_failure_sequence(&mut host);
        assert!(!p.flash_outcome(&mut host, Outcome::Correct));
        advance(&mut p, &mut host, 3_500);
        assert!(!flashes(&host).contains(&FlashColor::Success));
        // the revert of the pre-lockout flash was cancelled
        assert_eq!(host.pending_timers(), 0);
    }

    #[test]
    fn odd_tick_count_still_ends_neutral() {
        let mut cfg = LockConfig::default();
        cfg.timing.failure_ticks = 1;
        let mut p = PresentationController::new(&cfg);
        let mut host = SimHost::new();
        assert_eq!(
            p.begin_failure_sequence(&mut host),
            Some(PresentationEvent::FailureSequenceFinished)
        );
        assert_eq!(flashes(&host), vec![FlashColor::Error, FlashColor::Neutral]);
    }

    #[test]
    fn reset_abandons_failure_sequence() {
        let mut p = PresentationController::new(&LockConfig::default());
        let mut host = SimHost::new();
        p.begin_failure_sequence(&mut host);
        advance(&mut p, &mut host, 700);
        p.reset(&mut host);
        assert_eq!(p.state(), FlashState::Idle);
        assert_eq!(host.pending_timers(), 0);
        let tail = &host.displayed()[host.displayed().len() - 3..];
        assert_eq!(
            tail,
            &[
                DisplayCommand::ShowFailureOverlay { visible: false, text: "Problem Failed".into() },
                DisplayCommand::ShowAnswerField(true),
                DisplayCommand::Flash(FlashColor::Neutral),
            ]
        );
        assert!(advance(&mut p, &mut host, 5_000).is_empty());
        assert!(p.flash_outcome(&mut host, Outcome::Correct));
    }

    #[test]
    fn reset_cancels_pending_revert() {
        let mut p = PresentationController::new(&LockConfig::default());
        let mut host = SimHost::new();
        p.flash_outcome(&mut host, Outcome::Incorrect);
        p.reset(&mut host);
        assert_eq!(host.pending_timers(), 0);
        assert_eq!(flashes(&host), vec![FlashColor::Error, FlashColor::Neutral]);

        // nothing to undo when idle
        let before = host.displayed().len();
        p.reset(&mut host);
        assert_eq!(host.displayed().len(), before);
    }
}
