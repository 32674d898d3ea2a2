//! Focus retention for the answer field.
//!
//! The host may hand keyboard focus out asynchronously (after the window
//! appears, after an activation animation) and may take it away without
//! notice, so one focus request at startup is not enough. The watchdog
//! re-checks on two schedules:
//!
//! - a **burst ladder** of one-shot checks at fixed offsets after each
//!   triggering event (arming, a question change, a submission), and
//! - a **heartbeat** that repeats for the whole session.
//!
//! ```text
//! Idle --arm--> BurstArmed(n) --burst fires--> BurstArmed(n-1) ... --> Heartbeat
//!                    ^                                                  |
//!                    +------------------ on_trigger_event --------------+
//! ```
//!
//! Every check is check-then-act: when the target already holds focus
//! nothing is sent to the host. Failure to obtain focus is never reported;
//! the next check simply tries again.

use std::time::Duration;

use tracing::{debug, trace};

use crate::lock_engine::{
    config::TimingConfig,
    host::{FocusEnvironment, TimerScheduler},
    models::{FocusTarget, TimerHandle, TimerKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogState {
    Idle,
    /// `remaining_attempts` one-shot checks of the ladder still pending.
    BurstArmed { remaining_attempts: usize },
    /// Ladder exhausted; only the heartbeat runs.
    Heartbeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertOutcome {
    AlreadyFocused,
    Reacquired,
    Unarmed,
}

#[derive(Debug)]
pub struct FocusWatchdog {
    /// Offsets from the trigger, strictly increasing.
    burst_offsets: Vec<Duration>,
    heartbeat: Duration,
    target: Option<FocusTarget>,
    state: WatchdogState,
    burst_timer: Option<TimerHandle>,
    heartbeat_timer: Option<TimerHandle>,
    reacquisitions: u64,
}

impl FocusWatchdog {
    pub fn new(timing: &TimingConfig) -> Self {
        FocusWatchdog {
            burst_offsets: timing.focus_burst_ms.iter().map(|ms| Duration::from_millis(*ms)).collect(),
            heartbeat: timing.heartbeat(),
            target: None,
            state: WatchdogState::Idle,
            burst_timer: None,
            heartbeat_timer: None,
            reacquisitions: 0,
        }
    }

    /// Take `target` under watch: request focus right away, start the burst
    /// ladder and the heartbeat. Re-arming restarts both schedules.
    pub fn arm<H>(&mut self, host: &mut H, target: FocusTarget)
    where
        H: FocusEnvironment + TimerScheduler + ?Sized,
    {
        self.cancel_timers(host);
        self.target = Some(target);
        debug!(surface = target.0, "focus watchdog armed");

        host.request_focus(target);
        host.place_caret_at_end(target);

        self.start_ladder(host);
        self.heartbeat_timer = Some(host.schedule_repeating(self.heartbeat, TimerKind::FocusHeartbeat));
    }

    /// A display change just happened: check now and run the ladder again.
    pub fn on_trigger_event<H>(&mut self, host: &mut H)
    where
        H: FocusEnvironment + TimerScheduler + ?Sized,
    {
        if self.target.is_none() {
            return;
        }
        if let Some(handle) = self.burst_timer.take() {
            host.cancel(handle);
        }
        self.assert_focus(host);
        self.start_ladder(host);
    }

    pub fn heartbeat_tick<H>(&mut self, host: &mut H) -> AssertOutcome
    where
        H: FocusEnvironment + ?Sized,
    {
        self.assert_focus(host)
    }

    /// Route a fired timer. Handles this watchdog no longer owns are ignored.
    pub fn on_timer<H>(&mut self, host: &mut H, handle: TimerHandle, kind: TimerKind)
    where
        H: FocusEnvironment + TimerScheduler + ?Sized,
    {
        match kind {
            TimerKind::FocusBurst if self.burst_timer == Some(handle) => {
                self.burst_timer = None;
                self.assert_focus(host);
                self.advance_ladder(host);
            }
            TimerKind::FocusHeartbeat if self.heartbeat_timer == Some(handle) => {
                self.heartbeat_tick(host);
            }
            _ => trace!(?handle, ?kind, "ignoring stale watchdog timer"),
        }
    }

    /// Check-then-act: only touch the host when the target lost focus.
    pub fn assert_focus<H>(&mut self, host: &mut H) -> AssertOutcome
    where
        H: FocusEnvironment + ?Sized,
    {
        let Some(target) = self.target else {
            return AssertOutcome::Unarmed;
        };
        if host.focus_holder() == Some(target) {
            return AssertOutcome::AlreadyFocused;
        }
        host.request_focus(target);
        host.place_caret_at_end(target);
        self.reacquisitions += 1;
        debug!(
            surface = target.0,
            holder = ?host.focus_holder().map(|t| t.0),
            reacquisitions = self.reacquisitions,
            "focus re-requested"
        );
        AssertOutcome::Reacquired
    }

    /// Stop watching and cancel every pending timer.
    pub fn disarm<H>(&mut self, host: &mut H)
    where
        H: TimerScheduler + ?Sized,
    {
        self.cancel_timers(host);
        self.target = None;
        self.state = WatchdogState::Idle;
        debug!("focus watchdog disarmed");
    }

    pub fn state(&self) -> WatchdogState {
        self.state
    }

    pub fn target(&self) -> Option<FocusTarget> {
        self.target
    }

    /// How many times focus had to be requested again after being lost.
    pub fn reacquisitions(&self) -> u64 {
        self.reacquisitions
    }

    pub fn heartbeat_running(&self) -> bool {
        self.heartbeat_timer.is_some()
    }

    fn start_ladder<H>(&mut self, host: &mut H)
    where
        H: TimerScheduler + ?Sized,
    {
        match self.burst_offsets.first() {
            Some(first) => {
                self.burst_timer = Some(host.schedule_once(*first, TimerKind::FocusBurst));
                self.state = WatchdogState::BurstArmed { remaining_attempts: self.burst_offsets.len() };
            }
            None => self.state = WatchdogState::Heartbeat,
        }
    }

    fn advance_ladder<H>(&mut self, host: &mut H)
    where
        H: TimerScheduler + ?Sized,
    {
        let WatchdogState::BurstArmed { remaining_attempts } = self.state else {
            return;
        };
        let remaining = remaining_attempts.saturating_sub(1);
        if remaining == 0 {
            self.state = WatchdogState::Heartbeat;
            return;
        }
        let fired = self.burst_offsets.len() - remaining_attempts;
        let delay = self.burst_offsets[fired + 1].saturating_sub(self.burst_offsets[fired]);
        self.burst_timer = Some(host.schedule_once(delay, TimerKind::FocusBurst));
        self.state = WatchdogState::BurstArmed { remaining_attempts: remaining };
    }

    fn cancel_timers<H>(&mut self, host: &mut H)
    where
        H: TimerScheduler + ?Sized,
    {
        if let Some(handle) = self.burst_timer.take() {
            host.cancel(handle);
        }
        if let Some(handle) = self.heartbeat_timer.take() {
            host.cancel(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock_engine::sim::SimHost;

    const FIELD: FocusTarget = FocusTarget(1);
    const THIEF: FocusTarget = FocusTarget(99);

    fn armed() -> (FocusWatchdog, SimHost) {
        let mut host = SimHost::new();
        let mut dog = FocusWatchdog::new(&TimingConfig::default());
        dog.arm(&mut host, FIELD);
        (dog, host)
    }

    fn advance(dog: &mut FocusWatchdog, host: &mut SimHost, ms: u64) {
        let until = host.now() + Duration::from_millis(ms);
        while let Some((handle, kind)) = host.pop_due(until) {
            dog.on_timer(host, handle, kind);
        }
        host.set_now(until);
    }

    #[test]
    fn arm_requests_focus_immediately() {
        let (dog, host) = armed();
        assert_eq!(host.focus_holder(), Some(FIELD));
        assert_eq!(host.focus_requests(), 1);
        assert_eq!(dog.state(), WatchdogState::BurstArmed { remaining_attempts: 3 });
        assert!(dog.heartbeat_running());
    }

    #[test]
    fn check_is_a_noop_when_already_focused() {
        let (mut dog, mut host) = armed();
        let requests = host.focus_requests();
        let carets = host.caret_moves();
        for _ in 0..5 {
            assert_eq!(dog.assert_focus(&mut host), AssertOutcome::AlreadyFocused);
        }
        assert_eq!(host.focus_holder(), Some(FIELD));
        assert_eq!(host.focus_requests(), requests);
        assert_eq!(host.caret_moves(), carets);
        assert_eq!(dog.reacquisitions(), 0);
    }

    #[test]
    fn burst_ladder_recovers_focus_lost_after_show() {
        let (mut dog, mut host) = armed();
        // window manager grabs focus while the activation animation runs
        host.steal_focus(THIEF);
        advance(&mut dog, &mut host, 100);
        assert_eq!(host.focus_holder(), Some(FIELD));
        assert_eq!(dog.reacquisitions(), 1);
        assert_eq!(dog.state(), WatchdogState::BurstArmed { remaining_attempts: 2 });

        advance(&mut dog, &mut host, 400);
        assert_eq!(dog.state(), WatchdogState::Heartbeat);
        assert_eq!(dog.reacquisitions(), 1);
    }

    #[test]
    fn heartbeat_keeps_running_after_ladder() {
        let (mut dog, mut host) = armed();
        advance(&mut dog, &mut host, 1_000);
        assert_eq!(dog.state(), WatchdogState::Heartbeat);

        host.steal_focus(THIEF);
        advance(&mut dog, &mut host, 150);
        assert_eq!(host.focus_holder(), Some(FIELD));
        assert_eq!(dog.reacquisitions(), 1);
    }

    #[test]
    fn trigger_restarts_the_ladder_and_drops_the_old_burst() {
        let (mut dog, mut host) = armed();
        advance(&mut dog, &mut host, 350);
        assert_eq!(dog.state(), WatchdogState::BurstArmed { remaining_attempts: 1 });

        host.steal_focus(THIEF);
        dog.on_trigger_event(&mut host);
        assert_eq!(host.focus_holder(), Some(FIELD));
        assert_eq!(dog.state(), WatchdogState::BurstArmed { remaining_attempts: 3 });
        assert_eq!(host.pending_of_kind(TimerKind::FocusBurst), 1);
    }

    #[test]
    fn unattainable_focus_is_retried_forever_without_error() {
        let (mut dog, mut host) = armed();
        host.set_focus_locked(Some(THIEF));
        advance(&mut dog, &mut host, 3_000);
        assert_eq!(host.focus_holder(), Some(THIEF));
        // three burst checks plus twenty heartbeats
        assert_eq!(dog.reacquisitions(), 23);
        assert!(dog.heartbeat_running());
    }

    #[test]
    fn disarm_cancels_everything() {
        let (mut dog, mut host) = armed();
        dog.disarm(&mut host);
        assert_eq!(dog.state(), WatchdogState::Idle);
        assert_eq!(host.pending_timers(), 0);
        assert_eq!(dog.assert_focus(&mut host), AssertOutcome::Unarmed);
        dog.on_trigger_event(&mut host);
        assert_eq!(host.pending_timers(), 0);
    }

    #[test]
    fn stale_handles_are_ignored() {
        let (mut dog, mut host) = armed();
        host.steal_focus(THIEF);
        dog.on_timer(&mut host, TimerHandle(12_345), TimerKind::FocusBurst);
        assert_eq!(host.focus_holder(), Some(THIEF));
    }
}
