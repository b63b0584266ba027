use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::PlayerId;

/// Avatar blob assembled by the client's avatar picker. The engine forwards
/// it verbatim and never looks inside.
pub type Avatar = serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub avatar: Avatar,
    pub score: i32,
    pub is_host: bool,
    pub is_connected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChatEntry {
    pub player_id: PlayerId,
    pub player_name: String,
    pub text: String,
    pub timestamp: String, // ISO 8601 string
}

/// One judged guess. Kept for the lifetime of the round it was made in.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessRecord {
    pub player_id: PlayerId,
    pub text: String,
    pub correct: bool,
    pub timestamp: String, // ISO 8601 string
}
