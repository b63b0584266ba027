use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{
    Avatar, ChatEntry, DrawEvent, DrawPayload, GameSettings, Player, PlayerId, SessionSnapshot,
};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ClientIntent {
    CreateRoom { host_name: String, avatar: Avatar },
    JoinRoom { room_code: String, name: String, avatar: Avatar },
    StartGame { settings: GameSettings },
    SubmitGuess { text: String },
    Drawing { payload: DrawPayload },
    ClearCanvas,
    LobbyMessage { text: String },
    ChatMessage { text: String },
    PlayAgain,
    Leave,
    Reconnect,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ServerEvent {
    PlayerJoined { players: Vec<Player> },
    PlayerLeft { players: Vec<Player> },
    HostChanged { host_id: PlayerId },
    GameStarted { snapshot: SessionSnapshot },
    NextRound { snapshot: SessionSnapshot },
    TimerTick { seconds_remaining: u32 },
    Hint { pattern: String },
    Drawing { event: DrawEvent },
    ClearCanvas,
    CorrectGuess {
        player_id: PlayerId,
        player_name: String,
        text: String,
        is_originator: bool,
    },
    GameMessage { entry: ChatEntry },
    RoundEnded { word: String, players: Vec<Player> },
    GameEnded { final_scores: Vec<Player> },
    ReturnedToLobby { players: Vec<Player> },
}

/// Addressing for one outbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    All,
    Player(PlayerId),
    AllExcept(PlayerId),
}

/// One outbound event with its addressing, as produced by the session.
pub type Outbound = (Recipient, ServerEvent);
