//! A deterministic in-memory host.
//!
//! `SimHost` keeps a virtual clock, a timer queue, a single focus holder and
//! a log of every display command. Nothing fires on its own: a driver pops
//! due timers with [`SimHost::pop_due`] and hands them to the session, which
//! is exactly what [`SimHost::advance`] does.
//!
//! Focus can be stolen (`steal_focus`) to model a window manager or an
//! activation animation grabbing the keyboard, or pinned to a surface
//! (`set_focus_locked`) so that focus requests have no effect at all.

use std::time::Duration;

use crate::lock_engine::{
    host::{DisplaySink, FocusEnvironment, TimerScheduler},
    lock_session::LockSession,
    models::{DisplayCommand, FocusTarget, TimerHandle, TimerKind},
};

#[derive(Debug, Clone)]
struct PendingTimer {
    handle: TimerHandle,
    kind: TimerKind,
    due: Duration,
    interval: Option<Duration>,
}

#[derive(Debug, Default)]
pub struct SimHost {
    now: Duration,
    next_handle: u64,
    timers: Vec<PendingTimer>,
    focus: Option<FocusTarget>,
    focus_lock: Option<FocusTarget>,
    focus_requests: u64,
    caret_moves: u64,
    displayed: Vec<DisplayCommand>,
}

impl SimHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the host was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Remove and return the earliest timer due at or before `until`,
    /// moving the clock to its due time. Repeating timers are re-queued.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerHandle, TimerKind)> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.handle))
            .map(|(i, _)| i)?;

        let fired = self.timers[idx].clone();
        self.now = self.now.max(fired.due);
        match fired.interval {
            Some(interval) => self.timers[idx].due = fired.due + interval,
            None => {
                self.timers.swap_remove(idx);
            }
        }
        Some((fired.handle, fired.kind))
    }

    /// Run `session` forward by `by`, firing every timer that falls due.
    pub fn advance(&mut self, session: &mut LockSession, by: Duration) {
        let until = self.now + by;
        while let Some((handle, kind)) = self.pop_due(until) {
            session.on_timer(self, handle, kind);
        }
        self.now = until;
    }

    pub fn advance_ms(&mut self, session: &mut LockSession, ms: u64) {
        self.advance(session, Duration::from_millis(ms));
    }

    /// Hand focus to another surface without the core noticing.
    pub fn steal_focus(&mut self, thief: FocusTarget) {
        self.focus = Some(thief);
    }

    /// While `Some`, focus stays on the given surface whatever is requested.
    pub fn set_focus_locked(&mut self, holder: Option<FocusTarget>) {
        self.focus_lock = holder;
        if holder.is_some() {
            self.focus = holder;
        }
    }

    pub fn focus_requests(&self) -> u64 {
        self.focus_requests
    }

    pub fn caret_moves(&self) -> u64 {
        self.caret_moves
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn pending_of_kind(&self, kind: TimerKind) -> usize {
        self.timers.iter().filter(|t| t.kind == kind).count()
    }

    pub fn displayed(&self) -> &[DisplayCommand] {
        &self.displayed
    }

    pub fn take_displayed(&mut self) -> Vec<DisplayCommand> {
        std::mem::take(&mut self.displayed)
    }

    /// The text of the most recent `ShowQuestion`.
    pub fn last_question(&self) -> Option<&str> {
        self.displayed.iter().rev().find_map(|c| match c {
            DisplayCommand::ShowQuestion(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// The text of the most recent `ShowCounter`.
    pub fn last_counter(&self) -> Option<&str> {
        self.displayed.iter().rev().find_map(|c| match c {
            DisplayCommand::ShowCounter(text) => Some(text.as_str()),
            _ => None,
        })
    }

    fn push_timer(&mut self, delay: Duration, kind: TimerKind, interval: Option<Duration>) -> TimerHandle {
        self.next_handle += 1;
        let handle = TimerHandle(self.next_handle);
        self.timers.push(PendingTimer { handle, kind, due: self.now + delay, interval });
        handle
    }
}

impl FocusEnvironment for SimHost {
    fn request_focus(&mut self, target: FocusTarget) {
        self.focus_requests += 1;
        if self.focus_lock.is_none() {
            self.focus = Some(target);
        }
    }

    fn focus_holder(&self) -> Option<FocusTarget> {
        self.focus
    }

    fn place_caret_at_end(&mut self, _target: FocusTarget) {
        self.caret_moves += 1;
    }
}

impl TimerScheduler for SimHost {
    fn schedule_once(&mut self, delay: Duration, kind: TimerKind) -> TimerHandle {
        self.push_timer(delay, kind, None)
    }

    fn schedule_repeating(&mut self, interval: Duration, kind: TimerKind) -> TimerHandle {
        self.push_timer(interval, kind, Some(interval))
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.retain(|t| t.handle != handle);
    }
}

impl DisplaySink for SimHost {
    fn display(&mut self, command: DisplayCommand) {
        self.displayed.push(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_fire_in_due_order_and_repeat() {
        let mut host = SimHost::new();
        let beat = host.schedule_repeating(Duration::from_millis(150), TimerKind::FocusHeartbeat);
        let once = host.schedule_once(Duration::from_millis(100), TimerKind::FocusBurst);

        let until = Duration::from_millis(300);
        let mut fired = Vec::new();
        while let Some((handle, _)) = host.pop_due(until) {
            fired.push(handle);
        }
        assert_eq!(fired, vec![once, beat, beat]);
        assert_eq!(host.pending_timers(), 1);
        host.cancel(beat);
        host.cancel(beat);
        assert_eq!(host.pending_timers(), 0);
    }

    #[test]
    fn locked_focus_ignores_requests() {
        let mut host = SimHost::new();
        host.set_focus_locked(Some(FocusTarget(7)));
        host.request_focus(FocusTarget(1));
        assert_eq!(host.focus_holder(), Some(FocusTarget(7)));
        host.set_focus_locked(None);
        host.request_focus(FocusTarget(1));
        assert_eq!(host.focus_holder(), Some(FocusTarget(1)));
        assert_eq!(host.focus_requests(), 2);
    }
}
