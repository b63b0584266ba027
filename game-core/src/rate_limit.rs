use std::collections::HashMap;
use std::time::{Duration, Instant};

use game_types::PlayerId;

/// Chat channels throttled independently for the same player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatChannel {
    Lobby,
    Game,
}

/// Per-player, per-channel message throttle.
///
/// A message is accepted only when at least `min_interval` has passed since
/// the last accepted message on that channel. Rejections are silent: the
/// sender is never told, which keeps probing unrewarding.
#[derive(Debug)]
pub struct ChatRateLimiter {
    min_interval: Duration,
    last_accepted: HashMap<(PlayerId, ChatChannel), Instant>,
}

impl ChatRateLimiter {
    pub fn new() -> Self {
        Self::with_interval(Duration::from_secs(1))
    }

    pub fn with_interval(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_accepted: HashMap::new(),
        }
    }

    pub fn check(&mut self, player: PlayerId, channel: ChatChannel) -> bool {
        self.check_at(player, channel, Instant::now())
    }

    /// Clock-injected variant used by the session (and tests).
    pub fn check_at(&mut self, player: PlayerId, channel: ChatChannel, now: Instant) -> bool {
        match self.last_accepted.get(&(player, channel)) {
            Some(&last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last_accepted.insert((player, channel), now);
                true
            }
        }
    }

    /// Drop all state for a departed player.
    pub fn forget(&mut self, player: PlayerId) {
        self.last_accepted.retain(|(id, _), _| *id != player);
    }
}

impl Default for ChatRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
