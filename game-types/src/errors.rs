use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Intent rejections, surfaced to the originating client only. Session state
/// is unchanged when one of these comes back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum IntentError {
    RoomNotFound { code: String },
    RoomAlreadyStarted { code: String },
    InsufficientPlayers { required: usize, actual: usize },
    NotHost,
    PlayerNotFound { player_id: String },
    InvalidState { current_state: String },
}

impl std::fmt::Display for IntentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RoomNotFound { code } => write!(f, "room {} not found", code),
            Self::RoomAlreadyStarted { code } => write!(f, "room {} already started", code),
            Self::InsufficientPlayers { required, actual } => {
                write!(f, "need {} players, have {}", required, actual)
            }
            Self::NotHost => write!(f, "only the host may do that"),
            Self::PlayerNotFound { player_id } => {
                write!(f, "player {} not found", player_id)
            }
            Self::InvalidState { current_state } => {
                write!(f, "not allowed in state {}", current_state)
            }
        }
    }
}
