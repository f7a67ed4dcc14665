//! Checker colors and the small integer-tagged enums of the data model.
//!
//! The wire data model stores colors, cube ownership and decision kinds as
//! raw integers (`Black = 0`, `White = 1`, `None = -1`). Each is decoded
//! into a closed enum at the serde boundary so nothing downstream does
//! arithmetic on an opaque tag.

use serde::{Deserialize, Serialize};

/// Errors produced when decoding an integer tag.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("invalid color tag {0}, expected 0 (black) or 1 (white)")]
    InvalidColor(i64),

    #[error("invalid cube owner tag {0}, expected -1, 0 or 1")]
    InvalidCubeOwner(i64),

    #[error("invalid decision type tag {0}, expected 0 or 1")]
    InvalidDecisionType(i64),
}

/// The two sides of the board.
///
/// Black moves from point 24 toward point 1 and bears off past point 1.
/// White moves the opposite way and bears off past point 24.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Color {
    #[default]
    Black,
    White,
}

/// Both colors in tag order.
pub const ALL_COLORS: [Color; 2] = [Color::Black, Color::White];

impl Color {
    /// Returns the array index used for per-color pairs (score, bear-off, engine sides).
    pub const fn index(self) -> usize {
        match self {
            Color::Black => 0,
            Color::White => 1,
        }
    }

    pub const fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Returns the lowercase name used by the command protocol.
    pub const fn name(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::White => "white",
        }
    }

    /// Parses a color from its name, case-insensitively.
    pub fn from_name(s: &str) -> Option<Color> {
        match s.to_ascii_lowercase().as_str() {
            "black" => Some(Color::Black),
            "white" => Some(Color::White),
            _ => None,
        }
    }
}

impl TryFrom<i64> for Color {
    type Error = ColorError;

    fn try_from(tag: i64) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Color::Black),
            1 => Ok(Color::White),
            other => Err(ColorError::InvalidColor(other)),
        }
    }
}

impl From<Color> for i64 {
    fn from(color: Color) -> i64 {
        color.index() as i64
    }
}

/// Who may redouble. `Centered` is the `-1` tag of the data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum CubeOwner {
    #[default]
    Centered,
    Owned(Color),
}

impl TryFrom<i64> for CubeOwner {
    type Error = ColorError;

    fn try_from(tag: i64) -> Result<Self, Self::Error> {
        match tag {
            -1 => Ok(CubeOwner::Centered),
            0 | 1 => Color::try_from(tag).map(CubeOwner::Owned),
            other => Err(ColorError::InvalidCubeOwner(other)),
        }
    }
}

impl From<CubeOwner> for i64 {
    fn from(owner: CubeOwner) -> i64 {
        match owner {
            CubeOwner::Centered => -1,
            CubeOwner::Owned(color) => color.into(),
        }
    }
}

/// Kind of decision pending in a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum DecisionType {
    #[default]
    CheckerAction,
    CubeAction,
}

impl TryFrom<i64> for DecisionType {
    type Error = ColorError;

    fn try_from(tag: i64) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(DecisionType::CheckerAction),
            1 => Ok(DecisionType::CubeAction),
            other => Err(ColorError::InvalidDecisionType(other)),
        }
    }
}

impl From<DecisionType> for i64 {
    fn from(kind: DecisionType) -> i64 {
        match kind {
            DecisionType::CheckerAction => 0,
            DecisionType::CubeAction => 1,
        }
    }
}
