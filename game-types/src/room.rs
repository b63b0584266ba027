use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{DrawEvent, Player, PlayerId};

/// Session lifecycle state for a room.
///
/// ```text
/// Lobby → Countdown → Drawing → RoundEnd → {Drawing | GameEnd}
/// GameEnd → Lobby (play again)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RoomState {
    Lobby,
    Countdown,
    Drawing,
    RoundEnd,
    GameEnd,
}

impl RoomState {
    /// Whether new players may join (only before the game starts).
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Lobby)
    }

    /// Whether a game is underway (round machinery active).
    pub fn is_in_game(&self) -> bool {
        matches!(self, Self::Countdown | Self::Drawing | Self::RoundEnd)
    }
}

impl std::fmt::Display for RoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lobby => write!(f, "Lobby"),
            Self::Countdown => write!(f, "Countdown"),
            Self::Drawing => write!(f, "Drawing"),
            Self::RoundEnd => write!(f, "RoundEnd"),
            Self::GameEnd => write!(f, "GameEnd"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameSettings {
    pub round_count: u32,
    pub round_duration_seconds: u32,
    pub difficulty: Difficulty,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            round_count: 3,
            round_duration_seconds: 60,
            difficulty: Difficulty::Easy,
        }
    }
}

/// Per-recipient view of the active round. The secret word is present only
/// in the drawer's copy; everyone else gets the masked pattern.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoundView {
    pub index: u32,
    pub drawer_id: PlayerId,
    pub drawer_name: String,
    pub word: Option<String>,
    pub word_pattern: String,
    pub seconds_remaining: u32,
    pub correct_guessers: Vec<PlayerId>,
}

/// Full-state snapshot served to a (re)connecting client: room, active round,
/// and the ordered draw log for deterministic replay.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionSnapshot {
    pub room_code: String,
    pub state: RoomState,
    pub settings: GameSettings,
    pub players: Vec<Player>,
    pub round: Option<RoundView>,
    pub drawing: Vec<DrawEvent>,
}
