use serde_json::{json, Value};
use crate::lock_engine::models::{DisplayCommand, FlashColor};

/// Background color entry with both the symbolic name and the RGB value.
fn color(c: FlashColor) -> Value {
    let name = match c {
        FlashColor::Success => "success",
        FlashColor::Error   => "error",
        FlashColor::Neutral => "neutral",
    };
    json!({ "name": name, "rgb": c.hex() })
}

/// Map a `DisplayCommand` to the JSON message an out-of-process renderer
/// consumes. Every message carries a `"type"` discriminator.
pub fn to_render_message(command: &DisplayCommand) -> Value {
    match command {
        DisplayCommand::ShowQuestion(text) => json!({ "type": "question", "text": text }),
        DisplayCommand::ShowCounter(text) => json!({
            "type": "counter",
            "text": text,
            "lines": text.lines().collect::<Vec<_>>(),
        }),
        DisplayCommand::Flash(c) => json!({ "type": "background", "color": color(*c) }),
        DisplayCommand::ShowFailureOverlay { visible, text } => json!({
            "type": "failure_overlay",
            "visible": visible,
            "text": text,
        }),
        DisplayCommand::ShowAnswerField(visible) => json!({ "type": "answer_field", "visible": visible }),
        DisplayCommand::ClearAnswerField => json!({ "type": "answer_field", "clear": true }),
    }
}

/// One JSON document per line, ready to write to a renderer's stdin.
pub fn to_render_line(command: &DisplayCommand) -> String {
    let mut line = to_render_message(command).to_string();
    line.push('\n');
    line
}
