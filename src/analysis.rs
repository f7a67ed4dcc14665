//! Candidate play ranking.
//!
//! Encodes a position for the engine, asks it for ranked plays once, keeps
//! the best few in the order given, and renders each as notation.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::board::Position;
use crate::config::AnalysisConfig;
use crate::engine::{to_engine_board, EvalFlags, MoveEngine};
use crate::protocol::notation::format_play;

/// Errors returned by [`candidate_moves`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("engine invocation failed: {0}")]
    EngineInvocationFailed(String),
}

/// One ranked play. Rank is the position in the returned list, best first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateMove {
    #[serde(rename = "move")]
    pub notation: String,
}

/// Returns up to `config.max_candidates` plays for the side on roll.
///
/// A position without dice (`[0, 0]`) has no pending play: the result is
/// empty and the engine is not called. Engine output is trusted to be
/// sorted best first and is only truncated.
pub fn candidate_moves<E: MoveEngine + ?Sized>(
    engine: &mut E,
    position: &Position,
    config: &AnalysisConfig,
) -> Result<Vec<CandidateMove>, AnalysisError> {
    if !position.has_dice() {
        debug!("no dice set, skipping engine call");
        return Ok(Vec::new());
    }

    let board = to_engine_board(&position.board);
    let player = position.player_on_roll;
    debug!(dice = ?position.dice, player = player.name(), "requesting engine moves");

    let moves = engine
        .find_moves(&board, position.dice, player, EvalFlags::default())
        .map_err(|e| {
            warn!(error = %e, "engine call failed");
            AnalysisError::EngineInvocationFailed(e.message)
        })?;

    if moves.len() > config.max_candidates {
        debug!(
            returned = moves.len(),
            kept = config.max_candidates,
            "truncating engine moves"
        );
    }

    Ok(moves
        .iter()
        .take(config.max_candidates)
        .enumerate()
        .map(|(rank, mv)| {
            let notation = format_play(&mv.steps);
            let equity = (mv.equity * 1000.0).round() / 1000.0;
            debug!(rank = rank + 1, equity, %notation, "candidate");
            CandidateMove { notation }
        })
        .collect())
}

/// [`candidate_moves`] with the default settings (ten scored, cubeless plays).
pub fn default_candidate_moves<E: MoveEngine + ?Sized>(
    engine: &mut E,
    position: &Position,
) -> Result<Vec<CandidateMove>, AnalysisError> {
    candidate_moves(engine, position, &AnalysisConfig::default())
}
