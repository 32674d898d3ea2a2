//! Primitives the core needs from its host environment.
//!
//! The host owns the window, the event loop and the clock. Every callback it
//! schedules for the core comes back through
//! [`LockSession::on_timer`](crate::LockSession::on_timer) together with the
//! handle and kind it was scheduled with.

use std::time::Duration;

use crate::lock_engine::models::{DisplayCommand, FocusTarget, TimerHandle, TimerKind};

pub trait FocusEnvironment {
    /// Ask the environment to give keyboard focus to `target`.
    fn request_focus(&mut self, target: FocusTarget);

    /// The surface currently receiving keystrokes, if any.
    fn focus_holder(&self) -> Option<FocusTarget>;

    /// Move the caret of `target` to the end of its text.
    fn place_caret_at_end(&mut self, target: FocusTarget);
}

pub trait TimerScheduler {
    fn schedule_once(&mut self, delay: Duration, kind: TimerKind) -> TimerHandle;

    fn schedule_repeating(&mut self, interval: Duration, kind: TimerKind) -> TimerHandle;

    /// Cancelling an unknown or already fired handle is a no-op.
    fn cancel(&mut self, handle: TimerHandle);
}

pub trait DisplaySink {
    fn display(&mut self, command: DisplayCommand);
}

/// Everything a [`LockSession`](crate::LockSession) talks to.
pub trait Host: FocusEnvironment + TimerScheduler + DisplaySink {}

impl<T: FocusEnvironment + TimerScheduler + DisplaySink> Host for T {}
