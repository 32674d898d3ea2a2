//! Scripted lock session on the virtual-clock host.
//!
//! Run with: `RUST_LOG=math_lock=debug cargo run --example session`
//!
//! The script walks through everything the core handles:
//!
//! 1. **Focus theft** — right after the overlay appears, another surface
//!    grabs the keyboard; the watchdog's burst ladder takes it back.
//! 2. **Rejected keys and a malformed answer** — letters are dropped
//!    silently, a lone `-` flashes red without costing a strike.
//! 3. **Lockout** — two wrong answers on one question raise the failure
//!    overlay; afterwards the same question is posed again with one more
//!    problem to solve.
//! 4. **Completion** — correct answers until the session ends.
//!
//! Every display command is printed as the JSON line a renderer would read.

use anyhow::Result;
use math_lock::{to_render_line, FocusTarget, KeyEvent, LockConfig, LockSession, SimHost};
use tracing_subscriber::EnvFilter;

const ANSWER_FIELD: FocusTarget = FocusTarget(1);
const LAUNCHER: FocusTarget = FocusTarget(2);

fn flush(host: &mut SimHost) {
    for cmd in host.take_displayed() {
        print!("  [{:>5} ms] {}", host.now().as_millis(), to_render_line(&cmd));
    }
}

fn type_and_submit(session: &mut LockSession, host: &mut SimHost, text: &str) {
    for c in text.chars() {
        session.on_key(host, &KeyEvent::Char(c));
    }
    let outcome = session.on_key(host, &KeyEvent::Enter);
    println!("> typed {text:?} + Enter -> {outcome:?}");
    flush(host);
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = LockConfig::default().with_seed(7);
    let mut host = SimHost::new();
    let mut session = LockSession::new(config, ANSWER_FIELD)?;

    println!("━━ start ━━");
    session.start(&mut host);
    flush(&mut host);

    println!("━━ focus theft ━━");
    host.steal_focus(LAUNCHER);
    host.advance_ms(&mut session, 120);
    println!(
        "  focus holder after burst: {:?} (reacquisitions: {})",
        math_lock::FocusEnvironment::focus_holder(&host),
        session.watchdog().reacquisitions()
    );

    println!("━━ rejected keys, malformed answer ━━");
    for c in ['a', 'b', '?'] {
        session.on_key(&mut host, &KeyEvent::Char(c));
    }
    type_and_submit(&mut session, &mut host, "-");
    host.advance_ms(&mut session, 400);
    flush(&mut host);

    println!("━━ lockout ━━");
    for _ in 0..2 {
        let wrong = session
            .engine()
            .current_question()
            .map(|q| q.expected_answer + 1)
            .unwrap_or_default();
        type_and_submit(&mut session, &mut host, &wrong.to_string());
    }
    host.advance_ms(&mut session, 3_600);
    flush(&mut host);

    println!("━━ answer until done ━━");
    while !session.is_complete() {
        let Some(q) = session.engine().current_question() else { break };
        let right = q.expected_answer.to_string();
        type_and_submit(&mut session, &mut host, &right);
        host.advance_ms(&mut session, 400);
        flush(&mut host);
    }

    println!("session complete, pending timers: {}", host.pending_timers());
    Ok(())
}
