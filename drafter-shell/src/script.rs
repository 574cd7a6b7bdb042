//! One-line-per-event script format read from stdin.
//!
//! ```text
//! cmd line          # full command-line entry
//! type la           # characters through the keyboard buffer
//! key enter         # esc | enter | space | backspace
//! click 10 20       # left press + release at scene (10, 20)
//! move 12.5 -3      # pointer move
//! dump              # committed entities as JSON
//! ```

use thiserror::Error;

use drafter_core::Point;
use drafter_engine::Key;

#[derive(Debug, Clone, PartialEq)]
pub enum ShellEvent {
    Command(String),
    Type(String),
    Key(Key),
    Click(Point),
    Move(Point),
    Dump,
}

#[derive(Error, Debug, PartialEq)]
pub enum ScriptError {
    #[error("Unknown event '{0}'")]
    UnknownEvent(String),
    #[error("Unknown key '{0}'")]
    UnknownKey(String),
    #[error("Expected two coordinates, got '{0}'")]
    BadCoordinates(String),
}

/// Parse one script line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ShellEvent>, ScriptError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));

    let event = match word {
        // `cmd` with nothing after it is an empty entry (repeat / accept).
        "cmd" => ShellEvent::Command(rest.trim().to_string()),
        "type" => ShellEvent::Type(rest.to_string()),
        "key" => ShellEvent::Key(parse_key(rest.trim())?),
        "click" => ShellEvent::Click(parse_point(rest)?),
        "move" => ShellEvent::Move(parse_point(rest)?),
        "dump" => ShellEvent::Dump,
        other => return Err(ScriptError::UnknownEvent(other.to_string())),
    };
    Ok(Some(event))
}

fn parse_key(name: &str) -> Result<Key, ScriptError> {
    match name.to_ascii_lowercase().as_str() {
        "esc" | "escape" => Ok(Key::Escape),
        "enter" | "return" => Ok(Key::Enter),
        "space" => Ok(Key::Space),
        "backspace" => Ok(Key::Backspace),
        _ => Err(ScriptError::UnknownKey(name.to_string())),
    }
}

fn parse_point(text: &str) -> Result<Point, ScriptError> {
    let coords: Vec<f64> = text
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<_, _>>()
        .map_err(|_| ScriptError::BadCoordinates(text.trim().to_string()))?;
    match coords.as_slice() {
        [x, y] => Ok(Point::new(*x, *y)),
        _ => Err(ScriptError::BadCoordinates(text.trim().to_string())),
    }
}

// ===================================================================
// Tests
// ===================================================================
