//! Keystroke filtering for the answer field.
//!
//! Only ASCII digits, `+` and `-` reach the buffer. Enter and Backspace are
//! reported as control actions; everything else is dropped without any
//! visible effect.

use tracing::trace;

/// A raw input event as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEvent {
    Enter,
    Backspace,
    Char(char),
    /// Inserted text (paste, input method), accepted all-or-nothing.
    Text(String),
    /// Any other key (arrows, function keys, ...).
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKey {
    Backspace,
    Enter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    Accept(char),
    AcceptText(String),
    AcceptControl(ControlKey),
    Reject,
}

/// The in-progress typed answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerBuffer {
    chars: Vec<char>,
}

impl AnswerBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, c: char) {
        self.chars.push(c);
    }

    pub fn pop(&mut self) -> Option<char> {
        self.chars.pop()
    }

    pub fn clear(&mut self) {
        self.chars.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn as_string(&self) -> String {
        self.chars.iter().collect()
    }

    /// Return the contents and leave the buffer empty.
    pub fn take(&mut self) -> String {
        let text = self.as_string();
        self.chars.clear();
        text
    }
}

pub fn is_allowed_char(c: char) -> bool {
    c.is_ascii_digit() || c == '+' || c == '-'
}

#[derive(Debug, Default)]
pub struct InputFilter {
    buffer: AnswerBuffer,
}

impl InputFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `event` and apply it to the buffer. Never submits on its
    /// own; the caller acts on `AcceptControl(Enter)`.
    pub fn on_key(&mut self, event: &KeyEvent) -> FilterAction {
        match event {
            KeyEvent::Enter => FilterAction::AcceptControl(ControlKey::Enter),
            KeyEvent::Backspace => {
                self.buffer.pop();
                FilterAction::AcceptControl(ControlKey::Backspace)
            }
            KeyEvent::Char(c) if is_allowed_char(*c) => {
                self.buffer.push(*c);
                FilterAction::Accept(*c)
            }
            KeyEvent::Text(text) if !text.is_empty() && text.chars().all(is_allowed_char) => {
                text.chars().for_each(|c| self.buffer.push(c));
                FilterAction::AcceptText(text.clone())
            }
            other => {
                trace!(event = ?other, "rejected keystroke");
                FilterAction::Reject
            }
        }
    }

    pub fn buffer(&self) -> &AnswerBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut AnswerBuffer {
        &mut self.buffer
    }

    pub fn text(&self) -> String {
        self.buffer.as_string()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
