//! Text protocols.
//!
//! Checker-play notation (formatting engine plays, parsing written plays)
//! and the command parser for the main loop.

pub mod notation;
pub mod parser;

pub use notation::{
    format_play, format_step, parse_play, parse_step, Destination, NotationError, NotationStep,
    Origin, NO_MOVE,
};
pub use parser::{parse_command, Command, PositionSpec};
