//! Boundary to the external move-search engine.
//!
//! The engine works in its own coordinates: two 25-slot arrays, one per
//! color, where slot 0 is the owner's first point before bearing off and
//! slot 24 is the owner's bar. Callers always hand it the board from
//! Black's orientation (see [`encoding::to_engine_board`]); when White is on
//! roll the engine swaps the two arrays itself.
//!
//! Its answers come back mover-relative: in every [`CheckerStep`], 0 is the
//! mover's own first point, 23 the mover's furthest point, 24 the bar, and
//! -1 or 25 mean borne off. Nothing on this side re-applies a perspective
//! swap to those numbers.

pub mod encoding;
pub mod external;

use serde::{Deserialize, Serialize};

use crate::board::Color;

pub use encoding::{board_point, engine_slot, to_engine_board, EngineBoard, ENGINE_SLOTS};
pub use external::ExternalEngine;

/// Engine slot meaning "entering from the bar".
pub const BAR_SLOT: i8 = 24;

/// Engine destination meaning "borne off". Some engine call sites report 25.
pub const OFF_SLOT: i8 = -1;

/// Alternate borne-off destination.
pub const OFF_SLOT_ALT: i8 = 25;

/// A failed engine call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct EngineError {
    pub message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        EngineError { message: message.into() }
    }
}

/// One checker moving from one engine slot to another, mover-relative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(i8, i8)", into = "(i8, i8)")]
pub struct CheckerStep {
    pub from: i8,
    pub to: i8,
}

impl CheckerStep {
    pub const fn new(from: i8, to: i8) -> Self {
        CheckerStep { from, to }
    }

    pub const fn is_bar_entry(self) -> bool {
        self.from == BAR_SLOT
    }

    pub const fn is_bear_off(self) -> bool {
        self.to == OFF_SLOT || self.to == OFF_SLOT_ALT
    }
}

impl From<(i8, i8)> for CheckerStep {
    fn from((from, to): (i8, i8)) -> Self {
        CheckerStep { from, to }
    }
}

impl From<CheckerStep> for (i8, i8) {
    fn from(step: CheckerStep) -> Self {
        (step.from, step.to)
    }
}

/// A full play for one roll, as ranked by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineMove {
    pub steps: Vec<CheckerStep>,
    #[serde(default)]
    pub equity: f32,
}

impl EngineMove {
    pub fn new(steps: Vec<CheckerStep>, equity: f32) -> Self {
        EngineMove { steps, equity }
    }
}

/// Evaluation switches passed through to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalFlags {
    pub score_moves: bool,
    pub cubeful: bool,
}

impl Default for EvalFlags {
    fn default() -> Self {
        EvalFlags { score_moves: true, cubeful: false }
    }
}

/// A move-search engine.
///
/// `find_moves` receives the board in Black's orientation, the dice, and
/// the color on roll. It returns every play it considered, best first, in
/// mover-relative coordinates.
pub trait MoveEngine {
    fn find_moves(
        &mut self,
        board: &EngineBoard,
        dice: [u8; 2],
        player: Color,
        flags: EvalFlags,
    ) -> Result<Vec<EngineMove>, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_predicates() {
        assert!(CheckerStep::new(24, 19).is_bar_entry());
        assert!(CheckerStep::new(5, -1).is_bear_off());
        assert!(CheckerStep::new(5, 25).is_bear_off());
        assert!(!CheckerStep::new(23, 19).is_bar_entry());
        assert!(!CheckerStep::new(23, 19).is_bear_off());
    }

    #[test]
    fn step_serializes_as_pair() {
        let json = serde_json::to_string(&CheckerStep::new(23, 19)).unwrap();
        assert_eq!(json, "[23,19]");
        let step: CheckerStep = serde_json::from_str("[24,-1]").unwrap();
        assert_eq!(step, CheckerStep::new(24, -1));
    }

    #[test]
    fn engine_move_equity_defaults_to_zero() {
        let mv: EngineMove = serde_json::from_str(r#"{"steps":[[12,7]]}"#).unwrap();
        assert_eq!(mv.steps, vec![CheckerStep::new(12, 7)]);
        assert_eq!(mv.equity, 0.0);
    }

    #[test]
    fn default_flags_are_scored_cubeless() {
        let flags = EvalFlags::default();
        assert!(flags.score_moves);
        assert!(!flags.cubeful);
    }

    #[test]
    fn engine_error_displays_message() {
        assert_eq!(EngineError::new("boom").to_string(), "boom");
    }
}
