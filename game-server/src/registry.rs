//! Room registry: code → handle map, room creation and routing.

use std::time::Duration;

use dashmap::DashMap;
use game_core::WordBank;
use game_types::{Avatar, IntentError, PlayerId};
use rand::Rng;
use tracing::info;

use crate::config::Config;
use crate::room::{RoomError, RoomHandle, Subscription, spawn_room};

/// Length of generated room codes.
const ROOM_CODE_LEN: usize = 4;

/// Tracks every live room, keyed by its code.
pub struct RoomRegistry {
    rooms: DashMap<String, RoomHandle>,
    words: WordBank,
    channel_capacity: usize,
    idle_timeout: Duration,
}

impl RoomRegistry {
    pub fn new(config: &Config, words: WordBank) -> Self {
        Self {
            rooms: DashMap::new(),
            words,
            channel_capacity: config.command_channel_capacity,
            idle_timeout: Duration::from_secs(config.room_idle_timeout_seconds),
        }
    }

    /// Create a room with a fresh unique code and the host as sole player.
    /// Room creation never fails.
    pub fn create_room(
        &self,
        host_name: &str,
        avatar: Avatar,
    ) -> (RoomHandle, PlayerId, Subscription) {
        let code = self.generate_code();
        let (handle, host_id, subscription) = spawn_room(
            code.clone(),
            host_name,
            avatar,
            self.words.clone(),
            self.channel_capacity,
            self.idle_timeout,
        );
        self.rooms.insert(code.clone(), handle.clone());
        info!("Registered room {} ({} rooms live)", code, self.rooms.len());
        (handle, host_id, subscription)
    }

    /// Join an existing room by code. Codes are case-insensitive on entry.
    pub async fn join_room(
        &self,
        code: &str,
        name: &str,
        avatar: Avatar,
    ) -> Result<(RoomHandle, PlayerId, Subscription), RoomError> {
        let handle = self
            .get(code)
            .ok_or_else(|| RoomError::Rejected(IntentError::RoomNotFound {
                code: code.to_uppercase(),
            }))?;
        let (player_id, subscription) = handle.join(name, avatar).await?;
        Ok((handle, player_id, subscription))
    }

    pub fn get(&self, code: &str) -> Option<RoomHandle> {
        let code = code.trim().to_uppercase();
        self.rooms
            .get(&code)
            .filter(|entry| !entry.is_closed())
            .map(|entry| entry.value().clone())
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Drop handles whose actors have stopped (abandoned or idle rooms).
    /// Returns how many were removed.
    pub fn sweep_closed(&self) -> usize {
        let before = self.rooms.len();
        self.rooms.retain(|_, handle| !handle.is_closed());
        before - self.rooms.len()
    }

    /// Random uppercase code, retried until unused.
    fn generate_code(&self) -> String {
        let mut rng = rand::rng();
        loop {
            let code: String = (0..ROOM_CODE_LEN)
                .map(|_| rng.random_range(b'A'..=b'Z') as char)
                .collect();
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }
}
