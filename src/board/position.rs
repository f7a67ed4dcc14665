//! Board-relative position model.
//!
//! The board is stored from one fixed orientation: slot 0 is White's bar,
//! slots 1..=24 are the playable points numbered from Black's bearing-off
//! end, and slot 25 is Black's bar. Per-color pairs (bear-off, score) are
//! indexed by `Color::index()`.

use serde::{Deserialize, Serialize};

use super::color::{Color, ColorError, CubeOwner, DecisionType};

/// Number of playable points.
pub const NUM_POINTS: usize = 24;

/// Number of addressable board slots (points plus both bars).
pub const BOARD_SLOTS: usize = NUM_POINTS + 2;

/// Slot holding White's hit checkers.
pub const WHITE_BAR: usize = 0;

/// Slot holding Black's hit checkers.
pub const BLACK_BAR: usize = 25;

/// Checkers each side owns in a complete position.
pub const CHECKERS_PER_SIDE: u32 = 15;

/// Returns the bar slot of the given color.
pub const fn bar_index(color: Color) -> usize {
    match color {
        Color::Black => BLACK_BAR,
        Color::White => WHITE_BAR,
    }
}

/// A single board slot. `color` carries no meaning when `checkers == 0`.
///
/// Decoding accepts any color tag on an empty slot (the data model writes
/// `-1` there) and stores it as [`Point::EMPTY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RawPoint")]
pub struct Point {
    pub checkers: u8,
    pub color: Color,
}

impl Point {
    pub const EMPTY: Point = Point { checkers: 0, color: Color::Black };

    pub const fn new(checkers: u8, color: Color) -> Self {
        Point { checkers, color }
    }
}

#[derive(Deserialize)]
struct RawPoint {
    checkers: u8,
    color: i64,
}

impl TryFrom<RawPoint> for Point {
    type Error = ColorError;

    fn try_from(raw: RawPoint) -> Result<Self, Self::Error> {
        if raw.checkers == 0 {
            return Ok(Point::EMPTY);
        }
        Ok(Point::new(raw.checkers, Color::try_from(raw.color)?))
    }
}

/// The 26 board slots plus per-color borne-off counters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    pub points: [Point; BOARD_SLOTS],
    pub bearoff: [u8; 2],
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

impl Board {
    /// Creates a board with no checkers anywhere.
    pub const fn empty() -> Self {
        Board {
            points: [Point::EMPTY; BOARD_SLOTS],
            bearoff: [0; 2],
        }
    }

    /// Creates the standard starting layout.
    pub fn initial() -> Self {
        let mut board = Board::empty();

        board.points[1] = Point::new(2, Color::White);
        board.points[12] = Point::new(5, Color::White);
        board.points[17] = Point::new(3, Color::White);
        board.points[19] = Point::new(5, Color::White);

        board.points[24] = Point::new(2, Color::Black);
        board.points[13] = Point::new(5, Color::Black);
        board.points[8] = Point::new(3, Color::Black);
        board.points[6] = Point::new(5, Color::Black);
        board
    }

    /// Returns the color and count of the checkers at `index`, or `None` if
    /// the slot is empty or out of range.
    ///
    /// Bar slots report the color they belong to regardless of the stored
    /// color field; playable points report their stored color.
    pub fn occupant(&self, index: usize) -> Option<(Color, u8)> {
        let point = self.points.get(index)?;
        if point.checkers == 0 {
            return None;
        }
        let color = match index {
            WHITE_BAR => Color::White,
            BLACK_BAR => Color::Black,
            _ => point.color,
        };
        Some((color, point.checkers))
    }

    /// Sets the number of `color` checkers on that color's bar.
    pub fn set_bar(&mut self, color: Color, checkers: u8) {
        self.points[bar_index(color)] = Point::new(checkers, color);
    }

    /// Counts every checker of `color`: on points, on the bar, and borne off.
    pub fn checker_total(&self, color: Color) -> u32 {
        let on_board: u32 = (0..BOARD_SLOTS)
            .filter_map(|i| self.occupant(i))
            .filter(|&(c, _)| c == color)
            .map(|(_, n)| u32::from(n))
            .sum();
        on_board + u32::from(self.bearoff[color.index()])
    }

    /// Returns true if both colors account for exactly 15 checkers.
    pub fn is_complete(&self) -> bool {
        self.checker_total(Color::Black) == CHECKERS_PER_SIDE
            && self.checker_total(Color::White) == CHECKERS_PER_SIDE
    }
}

/// The doubling cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cube {
    pub owner: CubeOwner,
    /// Power-of-two exponent of the stake: 0 is a 1-cube, 1 a 2-cube.
    pub value: u32,
}

impl Default for Cube {
    fn default() -> Self {
        Cube { owner: CubeOwner::Centered, value: 0 }
    }
}

impl Cube {
    /// Returns the stake the cube shows, or `None` if it overflows.
    pub fn stake(&self) -> Option<u64> {
        1u64.checked_shl(self.value)
    }
}

mod flag {
    //! Booleans stored as 0/1 integers in the data model.

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(i64::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(i64::deserialize(deserializer)? != 0)
    }
}

/// A complete position: board, cube, dice, match score and whose turn it is.
///
/// Dice of `[0, 0]` mean no roll has been assigned yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub id: i64,
    pub board: Board,
    pub cube: Cube,
    pub dice: [u8; 2],
    pub score: [i32; 2],
    pub player_on_roll: Color,
    pub decision_type: DecisionType,
    #[serde(default, with = "flag")]
    pub has_jacoby: bool,
    #[serde(default, with = "flag")]
    pub has_beaver: bool,
}

impl Default for Position {
    fn default() -> Self {
        Position {
            id: 0,
            board: Board::empty(),
            cube: Cube::default(),
            dice: [0, 0],
            score: [0, 0],
            player_on_roll: Color::Black,
            decision_type: DecisionType::CheckerAction,
            has_jacoby: false,
            has_beaver: false,
        }
    }
}

impl Position {
    /// Creates the opening position: starting layout, centered cube, a 3-1
    /// roll for Black at 7-away/7-away.
    pub fn initial() -> Self {
        Position {
            board: Board::initial(),
            dice: [3, 1],
            score: [7, 7],
            ..Position::default()
        }
    }

    /// Returns true if a roll has been assigned.
    pub fn has_dice(&self) -> bool {
        self.dice != [0, 0]
    }

    /// Checks this position against a stored checker pattern.
    ///
    /// Every slot where `filter` has checkers must hold at least as many
    /// checkers of the same color here. Empty filter slots match anything,
    /// so an empty filter matches every position. Cube, dice and score are
    /// not compared.
    pub fn matches_filter(&self, filter: &Position) -> bool {
        (0..BOARD_SLOTS).all(|i| match filter.board.occupant(i) {
            None => true,
            Some((want_color, want_count)) => matches!(
                self.board.occupant(i),
                Some((color, count)) if color == want_color && count >= want_count
            ),
        })
    }
}
