use std::time::Duration;

use game_core::WordBank;
use game_server::{Config, RoomRegistry, Subscription};
use game_types::{Avatar, Difficulty, GameSettings, ServerEvent};
use serde_json::json;

/// Config that never reads the environment, for hermetic tests.
pub fn test_config() -> Config {
    Config {
        command_channel_capacity: 64,
        room_idle_timeout_seconds: 1800,
        cleanup_interval_seconds: 30,
        words_directory: None,
    }
}

/// Registry whose every room will pick the word "rocket".
pub fn test_registry() -> RoomRegistry {
    RoomRegistry::new(
        &test_config(),
        WordBank::from_lists("rocket", "rocket", "rocket"),
    )
}

pub fn test_avatar() -> Avatar {
    json!({ "icon": "🐸", "colors": { "primary": "#33AA55" } })
}

pub fn test_settings(rounds: u32) -> GameSettings {
    GameSettings {
        round_count: rounds,
        round_duration_seconds: 60,
        difficulty: Difficulty::Easy,
    }
}

/// Next event on the subscription, bounded by (virtual) time.
pub async fn next_event(subscription: &mut Subscription) -> ServerEvent {
    tokio::time::timeout(Duration::from_secs(120), subscription.recv())
        .await
        .expect("timed out waiting for an event")
        .expect("subscription closed")
}

/// Drain events until one matches, bounded so a wrong stream fails loudly.
pub async fn wait_for(
    subscription: &mut Subscription,
    check: impl Fn(&ServerEvent) -> bool,
) -> ServerEvent {
    for _ in 0..200 {
        let event = next_event(subscription).await;
        if check(&event) {
            return event;
        }
    }
    panic!("expected event never arrived");
}
