//! Match transcription records.
//!
//! A transcription is the move-by-move record of a match: header metadata
//! followed by games, each a list of numbered moves holding either player's
//! checker play and any cube action. These types only round-trip the stored
//! JSON shape; they do not replay moves or derive positions.

use serde::{Deserialize, Serialize};

/// Match header. String fields are kept verbatim as transcribed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranscriptionMetadata {
    pub site: String,
    pub match_id: String,
    pub event: String,
    pub round: String,
    pub player1: String,
    pub player2: String,
    pub event_date: String,
    pub event_time: String,
    pub variation: String,
    pub unrated: String,
    pub crawford: String,
    pub cube_limit: String,
    pub transcriber: String,
    pub match_length: i32,
}

/// One player's checker play within a numbered move.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveData {
    pub dice: String,
    #[serde(rename = "move")]
    pub play: String,
    #[serde(default)]
    pub is_illegal: bool,
    #[serde(default)]
    pub is_gala: bool,
}

/// A double and, once given, the opponent's response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubeActionData {
    pub player: i32,
    pub action: String,
    pub value: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionMove {
    pub move_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player1_move: Option<MoveData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player2_move: Option<MoveData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cube_action: Option<CubeActionData>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameWinner {
    pub player: i32,
    pub points: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionGame {
    pub game_number: u32,
    pub player1_score: i32,
    pub player2_score: i32,
    #[serde(default)]
    pub moves: Vec<TranscriptionMove>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<GameWinner>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcription {
    pub metadata: TranscriptionMetadata,
    #[serde(default)]
    pub games: Vec<TranscriptionGame>,
}
