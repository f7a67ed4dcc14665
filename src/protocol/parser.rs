//! Command parser.
//!
//! Parses incoming protocol lines into structured `Command` variants that
//! the main loop dispatches on.

use tracing::warn;

use crate::board::Color;
use crate::engine::CheckerStep;

/// Source of a `position` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionSpec {
    /// The standard opening position.
    StartPos,
    /// A position serialized as JSON.
    Json(String),
}

/// A parsed client-to-bridge command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Synchronization ping; replies `readyok`.
    IsReady,

    /// Set an option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Replace the current position.
    Position(PositionSpec),

    /// Set the roll: `dice <d1> <d2>`, `dice 0 0` clears it.
    Dice([u8; 2]),

    /// Set the color on roll.
    Turn(Color),

    /// Print the engine encoding of the current board.
    Board,

    /// Format engine-coordinate steps: `notation 23,19 12,7`.
    Notation(Vec<CheckerStep>),

    /// Rank plays for the current position.
    Candidates,

    /// Test the current position against a JSON filter position.
    Filter { json: String },

    /// Terminate the loop.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging.
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    match tokens[0] {
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),
        "board" => Some(Command::Board),
        "candidates" => Some(Command::Candidates),

        "setoption" => parse_setoption(trimmed),
        "position" => parse_position(trimmed),
        "dice" => parse_dice(&tokens),
        "turn" => parse_turn(&tokens),
        "notation" => parse_notation(&tokens),
        "filter" => parse_filter(trimmed),

        other => {
            warn!("unknown command: {}", other);
            None
        }
    }
}

/// Returns everything after the leading keyword.
fn rest_of_line<'a>(line: &'a str, keyword: &str) -> &'a str {
    line.strip_prefix(keyword).unwrap_or("").trim()
}

/// Parses `setoption name <id> [value <x>]`.
///
/// The name is a single token; the value is the rest of the line with its
/// inner spacing kept, so engine command lines pass through intact. Which
/// names exist is decided by the session.
fn parse_setoption(line: &str) -> Option<Command> {
    let rest = rest_of_line(line, "setoption");
    let Some(body) = rest
        .strip_prefix("name")
        .filter(|b| b.is_empty() || b.starts_with(char::is_whitespace))
    else {
        warn!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    };
    let body = body.trim();
    let (name, tail) = body.split_once(char::is_whitespace).unwrap_or((body, ""));
    if name.is_empty() || name == "value" {
        warn!("malformed setoption: empty name");
        return None;
    }

    let tail = tail.trim_start();
    if tail.is_empty() {
        return Some(Command::SetOption { name: name.to_string(), value: None });
    }
    match tail.strip_prefix("value") {
        Some(value) if value.is_empty() || value.starts_with(char::is_whitespace) => {
            let value = value.trim();
            Some(Command::SetOption {
                name: name.to_string(),
                value: (!value.is_empty()).then(|| value.to_string()),
            })
        }
        _ => {
            warn!("malformed setoption: expected 'value' after '{}'", name);
            None
        }
    }
}

/// Parses `position startpos` or `position <json>`. The JSON may contain spaces.
fn parse_position(line: &str) -> Option<Command> {
    let rest = rest_of_line(line, "position");
    match rest {
        "" => {
            warn!("malformed position: expected 'position startpos' or 'position <json>'");
            None
        }
        "startpos" => Some(Command::Position(PositionSpec::StartPos)),
        json => Some(Command::Position(PositionSpec::Json(json.to_string()))),
    }
}

/// Parses `dice <d1> <d2>` with each die in 0..=6.
fn parse_dice(tokens: &[&str]) -> Option<Command> {
    if tokens.len() != 3 {
        warn!("malformed dice: expected 'dice <d1> <d2>'");
        return None;
    }
    let mut dice = [0u8; 2];
    for (die, token) in dice.iter_mut().zip(&tokens[1..]) {
        match token.parse::<u8>() {
            Ok(v) if v <= 6 => *die = v,
            _ => {
                warn!("invalid die value: '{}'", token);
                return None;
            }
        }
    }
    Some(Command::Dice(dice))
}

/// Parses `turn <black|white>`.
fn parse_turn(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 2 {
        warn!("malformed turn: expected 'turn <black|white>'");
        return None;
    }
    match Color::from_name(tokens[1]) {
        Some(color) => Some(Command::Turn(color)),
        None => {
            warn!("unknown color: '{}'", tokens[1]);
            None
        }
    }
}

/// Parses `notation [<from>,<to> ...]`. No steps is a valid (empty) play.
fn parse_notation(tokens: &[&str]) -> Option<Command> {
    let mut steps = Vec::with_capacity(tokens.len() - 1);
    for token in &tokens[1..] {
        let parsed = token
            .split_once(',')
            .and_then(|(f, t)| Some((f.parse::<i8>().ok()?, t.parse::<i8>().ok()?)));
        match parsed {
            Some(pair) => steps.push(CheckerStep::from(pair)),
            None => {
                warn!("invalid engine step: '{}', expected '<from>,<to>'", token);
                return None;
            }
        }
    }
    Some(Command::Notation(steps))
}

/// Parses `filter <json>`.
fn parse_filter(line: &str) -> Option<Command> {
    let json = rest_of_line(line, "filter");
    if json.is_empty() {
        warn!("malformed filter: expected 'filter <json>'");
        return None;
    }
    Some(Command::Filter { json: json.to_string() })
}
