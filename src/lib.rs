//! gammon_bridge library.
//!
//! Bridges a board-relative backgammon position model to an external
//! move-search engine that works in per-player, home-relative coordinates,
//! and renders the engine's ranked plays back into checker-play notation.

pub mod analysis;
pub mod board;
pub mod config;
pub mod engine;
pub mod protocol;
pub mod session;
