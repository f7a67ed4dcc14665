//! Command-loop state.
//!
//! Holds the current position, analysis settings and the engine, and
//! answers the commands dispatched by the binary's main loop.

use std::io::{self, Write};

use thiserror::Error;
use tracing::{debug, info};

use crate::analysis::{candidate_moves, AnalysisError, CandidateMove};
use crate::board::{Color, Position};
use crate::config::AnalysisConfig;
use crate::engine::{to_engine_board, CheckerStep, ExternalEngine, MoveEngine};
use crate::protocol::notation::format_play;
use crate::protocol::parser::PositionSpec;

/// Errors raised while handling a command.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no position set")]
    NoPosition,

    #[error("no engine configured")]
    NoEngine,

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("invalid value for option '{name}': '{value}'")]
    InvalidOption { name: String, value: String },

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("output error: {0}")]
    Io(#[from] io::Error),
}

pub type OptionSetter = fn(&mut Session, &str) -> Result<(), SessionError>;

/// Options accepted by `setoption`: `MaxCandidates` (integer) and `Engine`
/// (command line of an external engine).
pub const OPTIONS: &[(&str, OptionSetter)] = &[
    ("MaxCandidates", Session::set_max_candidates),
    ("Engine", Session::set_engine_command),
];

fn invalid_option(name: &str, value: &str) -> SessionError {
    SessionError::InvalidOption {
        name: name.to_string(),
        value: value.to_string(),
    }
}

/// Mutable state shared across commands.
pub struct Session {
    pub position: Option<Position>,
    pub config: AnalysisConfig,
    engine: Option<Box<dyn MoveEngine>>,
}

impl Default for Session {
    fn default() -> Self {
        Session::new(AnalysisConfig::default())
    }
}

impl Session {
    /// Creates a session with no position and no engine.
    pub fn new(config: AnalysisConfig) -> Self {
        Session {
            position: None,
            config,
            engine: None,
        }
    }

    /// Installs the engine used by `candidates`.
    pub fn set_engine(&mut self, engine: Box<dyn MoveEngine>) {
        self.engine = Some(engine);
    }

    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    /// Replaces the current position.
    pub fn set_position(&mut self, spec: &PositionSpec) -> Result<(), SessionError> {
        let position = match spec {
            PositionSpec::StartPos => Position::initial(),
            PositionSpec::Json(json) => serde_json::from_str(json)?,
        };
        debug!(id = position.id, "position set");
        self.position = Some(position);
        Ok(())
    }

    fn position_mut(&mut self) -> Result<&mut Position, SessionError> {
        self.position.as_mut().ok_or(SessionError::NoPosition)
    }

    pub fn set_dice(&mut self, dice: [u8; 2]) -> Result<(), SessionError> {
        self.position_mut()?.dice = dice;
        Ok(())
    }

    pub fn set_turn(&mut self, color: Color) -> Result<(), SessionError> {
        self.position_mut()?.player_on_roll = color;
        Ok(())
    }

    /// Applies `setoption`. Names are matched case-insensitively against
    /// [`OPTIONS`].
    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), SessionError> {
        let (canonical, setter) = OPTIONS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .copied()
            .ok_or_else(|| SessionError::UnknownOption(name.to_string()))?;
        let value = value.ok_or_else(|| invalid_option(canonical, ""))?;
        setter(self, value)?;
        debug!(option = canonical, value, "option set");
        Ok(())
    }

    fn set_max_candidates(&mut self, value: &str) -> Result<(), SessionError> {
        self.config.max_candidates = value
            .parse::<usize>()
            .map_err(|_| invalid_option("MaxCandidates", value))?;
        Ok(())
    }

    fn set_engine_command(&mut self, value: &str) -> Result<(), SessionError> {
        let engine =
            ExternalEngine::from_command_line(value).ok_or_else(|| invalid_option("Engine", value))?;
        info!(program = engine.program(), "engine configured");
        self.engine = Some(Box::new(engine));
        Ok(())
    }

    pub fn handle_isready<W: Write>(&self, out: &mut W) -> Result<(), SessionError> {
        writeln!(out, "readyok")?;
        out.flush()?;
        Ok(())
    }

    /// Writes the engine encoding of the current board, Black's array first.
    pub fn handle_board<W: Write>(&self, out: &mut W) -> Result<(), SessionError> {
        let position = self.position.as_ref().ok_or(SessionError::NoPosition)?;
        let engine_board = to_engine_board(&position.board);
        for color in [Color::Black, Color::White] {
            let slots: Vec<String> = engine_board
                .side(color)
                .iter()
                .map(|n| n.to_string())
                .collect();
            writeln!(out, "{} {}", color.name(), slots.join(" "))?;
        }
        out.flush()?;
        Ok(())
    }

    /// Writes the notation of a play given in engine coordinates.
    pub fn handle_notation<W: Write>(
        &self,
        steps: &[CheckerStep],
        out: &mut W,
    ) -> Result<(), SessionError> {
        writeln!(out, "notation {}", format_play(steps))?;
        out.flush()?;
        Ok(())
    }

    /// Ranks plays for the current position and writes one line per
    /// candidate followed by `candidatesok`. On failure writes a single
    /// `error <message>` line instead and returns the error.
    pub fn handle_candidates<W: Write>(&mut self, out: &mut W) -> Result<(), SessionError> {
        match self.rank_candidates() {
            Ok(candidates) => {
                for (rank, candidate) in candidates.iter().enumerate() {
                    writeln!(out, "candidate {} {}", rank + 1, candidate.notation)?;
                }
                writeln!(out, "candidatesok")?;
                out.flush()?;
                Ok(())
            }
            Err(e) => {
                writeln!(out, "error {}", e)?;
                out.flush()?;
                Err(e)
            }
        }
    }

    fn rank_candidates(&mut self) -> Result<Vec<CandidateMove>, SessionError> {
        let position = self.position.as_ref().ok_or(SessionError::NoPosition)?;
        let engine = self.engine.as_mut().ok_or(SessionError::NoEngine)?;
        Ok(candidate_moves(engine.as_mut(), position, &self.config)?)
    }

    /// Writes whether the current position matches a JSON filter position.
    pub fn handle_filter<W: Write>(&self, json: &str, out: &mut W) -> Result<(), SessionError> {
        let position = self.position.as_ref().ok_or(SessionError::NoPosition)?;
        let filter: Position = serde_json::from_str(json)?;
        writeln!(out, "match {}", position.matches_filter(&filter))?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Point;
    use crate::engine::{EngineBoard, EngineError, EngineMove, EvalFlags};

    struct Fixed(Vec<EngineMove>);

    impl MoveEngine for Fixed {
        fn find_moves(
            &mut self,
            _board: &EngineBoard,
            _dice: [u8; 2],
            _player: Color,
            _flags: EvalFlags,
        ) -> Result<Vec<EngineMove>, EngineError> {
            Ok(self.0.clone())
        }
    }

    fn output_of<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<(), SessionError>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn new_session_has_no_state() {
        let session = Session::default();
        assert!(session.position.is_none());
        assert!(!session.has_engine());
        assert_eq!(session.config, AnalysisConfig::default());
    }

    #[test]
    fn startpos_sets_opening_position() {
        let mut session = Session::default();
        session.set_position(&PositionSpec::StartPos).unwrap();
        assert_eq!(session.position, Some(Position::initial()));
    }

    #[test]
    fn json_position_roundtrips() {
        let mut pos = Position::initial();
        pos.id = 9;
        pos.board.points[5] = Point::new(1, Color::White);
        let json = serde_json::to_string(&pos).unwrap();
        let mut session = Session::default();
        session.set_position(&PositionSpec::Json(json)).unwrap();
        assert_eq!(session.position, Some(pos));
    }

    #[test]
    fn invalid_json_keeps_previous_position() {
        let mut session = Session::default();
        session.set_position(&PositionSpec::StartPos).unwrap();
        let err = session
            .set_position(&PositionSpec::Json("{garbage".to_string()))
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidJson(_)));
        assert_eq!(session.position, Some(Position::initial()));
    }

    #[test]
    fn dice_and_turn_need_a_position() {
        let mut session = Session::default();
        assert!(matches!(session.set_dice([1, 2]), Err(SessionError::NoPosition)));
        assert!(matches!(session.set_turn(Color::White), Err(SessionError::NoPosition)));

        session.set_position(&PositionSpec::StartPos).unwrap();
        session.set_dice([6, 6]).unwrap();
        session.set_turn(Color::White).unwrap();
        let pos = session.position.as_ref().unwrap();
        assert_eq!(pos.dice, [6, 6]);
        assert_eq!(pos.player_on_roll, Color::White);
    }

    #[test]
    fn set_option_max_candidates() {
        let mut session = Session::default();
        session.set_option("MaxCandidates", Some("4")).unwrap();
        assert_eq!(session.config.max_candidates, 4);
        assert!(matches!(
            session.set_option("MaxCandidates", Some("many")),
            Err(SessionError::InvalidOption { .. })
        ));
        assert!(matches!(
            session.set_option("Threads", Some("8")),
            Err(SessionError::UnknownOption(_))
        ));
        assert!(matches!(
            session.set_option("MaxCandidates", None),
            Err(SessionError::InvalidOption { .. })
        ));
    }

    #[test]
    fn option_names_ignore_case() {
        let mut session = Session::default();
        session.set_option("maxcandidates", Some("2")).unwrap();
        assert_eq!(session.config.max_candidates, 2);
        session.set_option("ENGINE", Some("my-engine")).unwrap();
        assert!(session.has_engine());
        assert_eq!(OPTIONS.len(), 2);
    }

    #[test]
    fn set_option_engine() {
        let mut session = Session::default();
        session.set_option("Engine", Some("my-engine --fast")).unwrap();
        assert!(session.has_engine());
        assert!(matches!(
            session.set_option("Engine", None),
            Err(SessionError::InvalidOption { .. })
        ));
    }

    #[test]
    fn isready_outputs_readyok() {
        let session = Session::default();
        let out = output_of(|o| session.handle_isready(o));
        assert_eq!(out.trim(), "readyok");
    }

    #[test]
    fn board_prints_both_sides() {
        let mut session = Session::default();
        session.set_position(&PositionSpec::StartPos).unwrap();
        let out = output_of(|o| session.handle_board(o));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("black "));
        assert!(lines[1].starts_with("white "));
        let black: Vec<u8> = lines[0][6..]
            .split(' ')
            .map(|n| n.parse().unwrap())
            .collect();
        assert_eq!(black.len(), 25);
        assert_eq!(black[23], 2);
        assert_eq!(black[5], 5);
    }

    #[test]
    fn notation_output() {
        let session = Session::default();
        let steps = [CheckerStep::new(23, 19), CheckerStep::new(12, 7)];
        let out = output_of(|o| session.handle_notation(&steps, o));
        assert_eq!(out, "notation 24/20 13/8\n");
        let out = output_of(|o| session.handle_notation(&[], o));
        assert_eq!(out, "notation No move\n");
    }

    #[test]
    fn candidates_without_engine_fail() {
        let mut session = Session::default();
        session.set_position(&PositionSpec::StartPos).unwrap();
        let mut out = Vec::new();
        let err = session.handle_candidates(&mut out).unwrap_err();
        assert!(matches!(err, SessionError::NoEngine));
        assert_eq!(String::from_utf8(out).unwrap(), "error no engine configured\n");
    }

    #[test]
    fn candidates_engine_failure_is_reported_on_output() {
        struct Broken;
        impl MoveEngine for Broken {
            fn find_moves(
                &mut self,
                _board: &EngineBoard,
                _dice: [u8; 2],
                _player: Color,
                _flags: EvalFlags,
            ) -> Result<Vec<EngineMove>, EngineError> {
                Err(EngineError::new("tables missing"))
            }
        }

        let mut session = Session::default();
        session.set_position(&PositionSpec::StartPos).unwrap();
        session.set_engine(Box::new(Broken));
        let mut out = Vec::new();
        let err = session.handle_candidates(&mut out).unwrap_err();
        assert!(matches!(err, SessionError::Analysis(_)));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "error engine invocation failed: tables missing\n"
        );
    }

    #[test]
    fn candidates_lists_ranked_plays() {
        let mut session = Session::default();
        session.set_position(&PositionSpec::StartPos).unwrap();
        session.set_engine(Box::new(Fixed(vec![
            EngineMove::new(vec![CheckerStep::new(7, 4), CheckerStep::new(5, 4)], 0.16),
            EngineMove::new(vec![CheckerStep::new(23, 20), CheckerStep::new(23, 22)], -0.01),
        ])));
        let out = output_of(|o| session.handle_candidates(o));
        assert_eq!(out, "candidate 1 8/5 6/5\ncandidate 2 24/21 24/23\ncandidatesok\n");
    }

    #[test]
    fn candidates_without_dice_is_empty() {
        let mut session = Session::default();
        session.set_position(&PositionSpec::StartPos).unwrap();
        session.set_dice([0, 0]).unwrap();
        session.set_engine(Box::new(Fixed(vec![EngineMove::new(Vec::new(), 0.0)])));
        let out = output_of(|o| session.handle_candidates(o));
        assert_eq!(out, "candidatesok\n");
    }

    #[test]
    fn filter_reports_match() {
        let mut session = Session::default();
        session.set_position(&PositionSpec::StartPos).unwrap();

        let mut filter = Position::default();
        filter.board.points[13] = Point::new(5, Color::Black);
        let json = serde_json::to_string(&filter).unwrap();
        let out = output_of(|o| session.handle_filter(&json, o));
        assert_eq!(out, "match true\n");

        filter.board.points[13] = Point::new(6, Color::Black);
        let json = serde_json::to_string(&filter).unwrap();
        let out = output_of(|o| session.handle_filter(&json, o));
        assert_eq!(out, "match false\n");
    }
}
