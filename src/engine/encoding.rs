//! Board -> engine array encoding.
//!
//! Each color gets a 25-slot array counted from its own bearing-off end:
//!
//! | color | board point `p` (1..=24) | own bar      |
//! |-------|--------------------------|--------------|
//! | Black | slot `p - 1`             | 25 -> slot 24 |
//! | White | slot `24 - p`            | 0 -> slot 24  |
//!
//! The pair is always laid out Black first, whoever is on roll.
//! Counts are copied as-is; nothing here checks the 15-checker total.

use serde::{Deserialize, Serialize};

use crate::board::{
    Board, Color, Point, ALL_COLORS, BLACK_BAR, BOARD_SLOTS, CHECKERS_PER_SIDE, WHITE_BAR,
};

/// Slots per color in the engine layout (24 points + bar).
pub const ENGINE_SLOTS: usize = 25;

/// Engine slot of a color's bar.
const ENGINE_BAR: usize = ENGINE_SLOTS - 1;

/// Two single-color checker arrays, indexed by `Color::index()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineBoard {
    pub sides: [[u8; ENGINE_SLOTS]; 2],
}

impl EngineBoard {
    /// Returns the array belonging to `color`.
    pub fn side(&self, color: Color) -> &[u8; ENGINE_SLOTS] {
        &self.sides[color.index()]
    }

    /// Rebuilds a board from the engine arrays.
    ///
    /// Bear-off counts are whatever the 15 checkers per side do not account
    /// for on the arrays. If both colors claim the same point, White's
    /// checkers win; such input is not a legal position.
    pub fn to_board(&self) -> Board {
        let mut board = Board::empty();
        for color in ALL_COLORS {
            let mut on_board: u32 = 0;
            for (slot, &checkers) in self.side(color).iter().enumerate() {
                if checkers == 0 {
                    continue;
                }
                if let Some(index) = board_point(color, slot) {
                    board.points[index] = Point::new(checkers, color);
                    on_board += u32::from(checkers);
                }
            }
            let off = CHECKERS_PER_SIDE.saturating_sub(on_board);
            board.bearoff[color.index()] = u8::try_from(off).unwrap_or(u8::MAX);
        }
        board
    }
}

/// Maps a board slot holding `color` checkers to that color's engine slot.
///
/// Returns `None` for slots the color cannot occupy (the other color's bar)
/// and for indices past the board.
pub const fn engine_slot(color: Color, index: usize) -> Option<usize> {
    match (color, index) {
        (Color::Black, BLACK_BAR) | (Color::White, WHITE_BAR) => Some(ENGINE_BAR),
        (_, WHITE_BAR) | (_, BLACK_BAR) => None,
        (Color::Black, p) if p < BOARD_SLOTS => Some(p - 1),
        (Color::White, p) if p < BOARD_SLOTS => Some(24 - p),
        _ => None,
    }
}

/// Inverse of [`engine_slot`]: the board slot of `color`'s engine slot.
pub const fn board_point(color: Color, slot: usize) -> Option<usize> {
    match (color, slot) {
        (Color::Black, ENGINE_BAR) => Some(BLACK_BAR),
        (Color::White, ENGINE_BAR) => Some(WHITE_BAR),
        (Color::Black, s) if s < ENGINE_BAR => Some(s + 1),
        (Color::White, s) if s < ENGINE_BAR => Some(24 - s),
        _ => None,
    }
}

/// Encodes a board as the engine's Black-first pair of arrays.
///
/// Empty points contribute nothing, so their stored color is never read.
/// Bar slots are attributed to the color that owns them.
pub fn to_engine_board(board: &Board) -> EngineBoard {
    let mut engine = EngineBoard::default();
    for index in 0..BOARD_SLOTS {
        let Some((color, checkers)) = board.occupant(index) else {
            continue;
        };
        if let Some(slot) = engine_slot(color, index) {
            engine.sides[color.index()][slot] = checkers;
        }
    }
    engine
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(index: usize, color: Color, checkers: u8) -> Board {
        let mut board = Board::empty();
        board.points[index] = Point::new(checkers, color);
        board
    }

    #[test]
    fn black_point_maps_to_point_minus_one() {
        for p in 1..=24 {
            let engine = to_engine_board(&single(p, Color::Black, 1));
            let black = engine.side(Color::Black);
            assert_eq!(black[p - 1], 1, "black checker on {}", p);
            assert_eq!(black.iter().map(|&n| u32::from(n)).sum::<u32>(), 1);
            assert!(engine.side(Color::White).iter().all(|&n| n == 0));
        }
    }

    #[test]
    fn white_point_maps_to_twenty_four_minus_point() {
        for p in 1..=24 {
            let engine = to_engine_board(&single(p, Color::White, 1));
            let white = engine.side(Color::White);
            assert_eq!(white[24 - p], 1, "white checker on {}", p);
            assert_eq!(white.iter().map(|&n| u32::from(n)).sum::<u32>(), 1);
            assert!(engine.side(Color::Black).iter().all(|&n| n == 0));
        }
    }

    #[test]
    fn bars_land_in_slot_twenty_four() {
        let mut board = Board::empty();
        board.set_bar(Color::Black, 2);
        let engine = to_engine_board(&board);
        assert_eq!(engine.side(Color::Black)[24], 2);
        assert_eq!(engine.side(Color::Black).iter().filter(|&&n| n > 0).count(), 1);
        assert!(engine.side(Color::White).iter().all(|&n| n == 0));

        let mut board = Board::empty();
        board.set_bar(Color::White, 3);
        let engine = to_engine_board(&board);
        assert_eq!(engine.side(Color::White)[24], 3);
        assert_eq!(engine.side(Color::White).iter().filter(|&&n| n > 0).count(), 1);
        assert!(engine.side(Color::Black).iter().all(|&n| n == 0));
    }

    #[test]
    fn empty_board_is_all_zero() {
        assert_eq!(to_engine_board(&Board::empty()), EngineBoard::default());
    }

    #[test]
    fn empty_point_color_is_ignored() {
        let board = single(7, Color::White, 0);
        assert_eq!(to_engine_board(&board), EngineBoard::default());
    }

    #[test]
    fn opening_layout() {
        let engine = to_engine_board(&Board::initial());
        let mut expected = [0u8; ENGINE_SLOTS];
        expected[23] = 2;
        expected[12] = 5;
        expected[7] = 3;
        expected[5] = 5;
        // Symmetric start: both sides see the same home-relative layout.
        assert_eq!(engine.side(Color::Black), &expected);
        assert_eq!(engine.side(Color::White), &expected);
    }

    #[test]
    fn slot_mapping_inverts() {
        for color in ALL_COLORS {
            for index in 0..BOARD_SLOTS {
                if let Some(slot) = engine_slot(color, index) {
                    assert_eq!(board_point(color, slot), Some(index));
                }
            }
            for slot in 0..ENGINE_SLOTS {
                let index = board_point(color, slot).unwrap();
                assert_eq!(engine_slot(color, index), Some(slot));
            }
            assert_eq!(board_point(color, ENGINE_SLOTS), None);
        }
    }

    #[test]
    fn opponent_bar_has_no_slot() {
        assert_eq!(engine_slot(Color::Black, WHITE_BAR), None);
        assert_eq!(engine_slot(Color::White, BLACK_BAR), None);
        assert_eq!(engine_slot(Color::Black, BOARD_SLOTS), None);
    }

    #[test]
    fn to_board_restores_populated_slots() {
        let mut board = Board::initial();
        board.points[24] = Point::new(1, Color::Black);
        board.set_bar(Color::Black, 1);
        board.points[1] = Point::new(1, Color::White);
        board.points[2] = Point::new(1, Color::White);
        let back = to_engine_board(&board).to_board();
        for i in 0..BOARD_SLOTS {
            assert_eq!(back.occupant(i), board.occupant(i), "slot {}", i);
        }
        assert_eq!(back.bearoff, [0, 0]);
    }

    #[test]
    fn to_board_derives_bearoff() {
        let mut board = Board::empty();
        board.points[3] = Point::new(4, Color::Black);
        board.points[22] = Point::new(15, Color::White);
        let back = to_engine_board(&board).to_board();
        assert_eq!(back.bearoff, [11, 0]);
        assert!(back.is_complete());
    }

    #[test]
    fn serializes_as_nested_arrays() {
        let json = serde_json::to_value(to_engine_board(&Board::initial())).unwrap();
        let sides = json.as_array().unwrap();
        assert_eq!(sides.len(), 2);
        assert_eq!(sides[0].as_array().unwrap().len(), ENGINE_SLOTS);
        assert_eq!(sides[0][23], 2);
    }
}
