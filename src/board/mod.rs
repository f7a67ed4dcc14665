//! Board representation and match records.
//!
//! Contains the board-relative position model, the integer-tagged color
//! enums of the data model, and the match transcription records.

pub mod color;
pub mod position;
pub mod transcription;

pub use color::{Color, ColorError, CubeOwner, DecisionType, ALL_COLORS};
pub use position::{
    bar_index, Board, Cube, Point, Position, BLACK_BAR, BOARD_SLOTS, CHECKERS_PER_SIDE,
    NUM_POINTS, WHITE_BAR,
};
pub use transcription::{
    CubeActionData, GameWinner, MoveData, Transcription, TranscriptionGame, TranscriptionMetadata,
    TranscriptionMove,
};
