use std::time::{Duration, Instant};

use game_core::{COUNTDOWN_SECONDS, Session, WordBank};
use game_types::{
    Avatar, Difficulty, GameSettings, Outbound, PlayerId, Recipient, ServerEvent,
};
use serde_json::json;

/// Opaque avatar blob of the kind the client's picker produces.
pub fn test_avatar() -> Avatar {
    json!({ "icon": "🦊", "colors": { "primary": "#FF5733", "secondary": "#33FF57" } })
}

/// A bank where every difficulty resolves to the same known word, so tests
/// can guess it deterministically.
pub fn single_word_bank(word: &str) -> WordBank {
    WordBank::from_lists(word, word, word)
}

pub fn test_settings(rounds: u32, seconds: u32) -> GameSettings {
    GameSettings {
        round_count: rounds,
        round_duration_seconds: seconds,
        difficulty: Difficulty::Easy,
    }
}

/// Room "GAME" with host Ava and guest Ben, still in the lobby.
pub fn lobby_session() -> (Session, PlayerId, PlayerId) {
    let (mut session, ava) = Session::new("GAME", "Ava", test_avatar(), single_word_bank("rocket"));
    let (ben, _) = session.join("Ben", test_avatar()).unwrap();
    (session, ava, ben)
}

/// Room with host Ava and guest Ben, game started and round 1 underway.
/// Returns the instant round 1 began.
pub fn drawing_session(
    word: &str,
    rounds: u32,
    seconds: u32,
) -> (Session, PlayerId, PlayerId, Instant) {
    let (mut session, ava) = Session::new("GAME", "Ava", test_avatar(), single_word_bank(word));
    let (ben, _) = session.join("Ben", test_avatar()).unwrap();
    let t0 = Instant::now();
    session
        .start_game(ava, test_settings(rounds, seconds), t0)
        .unwrap();
    let round_start = t0 + Duration::from_secs(COUNTDOWN_SECONDS as u64);
    session.tick(round_start);
    (session, ava, ben, round_start)
}

/// Events of a batch as one specific player would receive them.
pub fn events_for(batch: &[Outbound], player: PlayerId) -> Vec<ServerEvent> {
    batch
        .iter()
        .filter(|(recipient, _)| match recipient {
            Recipient::All => true,
            Recipient::Player(p) => *p == player,
            Recipient::AllExcept(excluded) => *excluded != player,
        })
        .map(|(_, event)| event.clone())
        .collect()
}

pub fn has_event(batch: &[Outbound], check: impl Fn(&ServerEvent) -> bool) -> bool {
    batch.iter().any(|(_, event)| check(event))
}
