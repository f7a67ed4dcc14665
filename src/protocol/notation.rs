//! Checker-play notation.
//!
//! A play is written as space-separated `from/to` pairs, e.g. `24/20 13/8`.
//! Points are numbered 1..=24 from the mover's own bearing-off end, `bar`
//! is the entering origin and `off` the bearing-off destination. A play
//! with no checker movement is written `No move`.
//!
//! Engine steps are already mover-relative, so formatting is the same
//! formula for both colors: slot `n` is point `n + 1`.

use thiserror::Error;

use crate::engine::{CheckerStep, BAR_SLOT, OFF_SLOT};

/// Literal used for a play that moves no checkers.
pub const NO_MOVE: &str = "No move";

/// Other spellings of an empty play accepted by the parser.
const EMPTY_PLAY_ALIASES: [&str; 3] = [NO_MOVE, "Cannot Move", "????"];

/// Errors that can occur when parsing play notation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("empty input")]
    EmptyInput,

    #[error("expected 'from/to', got '{0}'")]
    MissingSlash(String),

    #[error("invalid origin '{0}', expected a point 1-24 or 'bar'")]
    InvalidOrigin(String),

    #[error("invalid destination '{0}', expected a point 1-24 or 'off'")]
    InvalidDestination(String),

    #[error("invalid repeat count in '{0}'")]
    InvalidRepeat(String),
}

/// Where a checker starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Bar,
    Point(u8),
}

/// Where a checker ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    Point(u8),
    Off,
}

/// One checker movement in notation terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotationStep {
    pub from: Origin,
    pub to: Destination,
}

impl NotationStep {
    /// Converts back to mover-relative engine coordinates.
    /// `off` maps to -1. Points outside 1..=24 are rejected.
    pub fn to_engine(self) -> Result<CheckerStep, NotationError> {
        let from = match self.from {
            Origin::Bar => BAR_SLOT,
            Origin::Point(p) => {
                point_slot(p).ok_or_else(|| NotationError::InvalidOrigin(p.to_string()))?
            }
        };
        let to = match self.to {
            Destination::Off => OFF_SLOT,
            Destination::Point(p) => {
                point_slot(p).ok_or_else(|| NotationError::InvalidDestination(p.to_string()))?
            }
        };
        Ok(CheckerStep::new(from, to))
    }
}

fn point_slot(point: u8) -> Option<i8> {
    if (1..=24).contains(&point) {
        i8::try_from(point - 1).ok()
    } else {
        None
    }
}

/// Formats one engine step as `from/to`.
///
/// The bar origin and both off encodings are checked before the numeric
/// conversion.
pub fn format_step(step: CheckerStep) -> String {
    let from = if step.is_bar_entry() {
        "bar".to_string()
    } else {
        (i32::from(step.from) + 1).to_string()
    };
    let to = if step.is_bear_off() {
        "off".to_string()
    } else {
        (i32::from(step.to) + 1).to_string()
    };
    format!("{}/{}", from, to)
}

/// Formats a full play, joining its steps with single spaces.
/// An empty play formats as `No move`.
pub fn format_play(steps: &[CheckerStep]) -> String {
    if steps.is_empty() {
        return NO_MOVE.to_string();
    }
    steps
        .iter()
        .map(|&s| format_step(s))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses a full play into its steps.
///
/// Accepts any whitespace between steps, `bar`/`off` in any case, and a
/// repeat suffix (`8/5(2)` is two `8/5` steps). The empty-play literals
/// parse to an empty list.
pub fn parse_play(s: &str) -> Result<Vec<NotationStep>, NotationError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(NotationError::EmptyInput);
    }
    if EMPTY_PLAY_ALIASES.iter().any(|a| a.eq_ignore_ascii_case(s)) {
        return Ok(Vec::new());
    }

    let mut steps = Vec::new();
    for token in s.split_whitespace() {
        let (body, count) = split_repeat(token)?;
        let step = parse_step(body)?;
        steps.extend(std::iter::repeat(step).take(count));
    }
    Ok(steps)
}

/// Splits `8/5(2)` into (`8/5`, 2). Tokens without a suffix repeat once.
fn split_repeat(token: &str) -> Result<(&str, usize), NotationError> {
    let Some(open) = token.find('(') else {
        return Ok((token, 1));
    };
    let count = token[open + 1..]
        .strip_suffix(')')
        .and_then(|n| n.parse::<usize>().ok())
        .filter(|&n| n > 0)
        .ok_or_else(|| NotationError::InvalidRepeat(token.to_string()))?;
    Ok((&token[..open], count))
}

/// Parses a single `from/to` pair.
pub fn parse_step(s: &str) -> Result<NotationStep, NotationError> {
    let (from, to) = s
        .split_once('/')
        .ok_or_else(|| NotationError::MissingSlash(s.to_string()))?;

    let from = if from.eq_ignore_ascii_case("bar") {
        Origin::Bar
    } else {
        parse_point(from)
            .map(Origin::Point)
            .ok_or_else(|| NotationError::InvalidOrigin(from.to_string()))?
    };

    let to = if to.eq_ignore_ascii_case("off") {
        Destination::Off
    } else {
        parse_point(to)
            .map(Destination::Point)
            .ok_or_else(|| NotationError::InvalidDestination(to.to_string()))?
    };

    Ok(NotationStep { from, to })
}

fn parse_point(s: &str) -> Option<u8> {
    s.parse::<u8>().ok().filter(|p| (1..=24).contains(p))
}
