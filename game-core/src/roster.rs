use game_types::{Avatar, Player, PlayerId};
use uuid::Uuid;

/// Join-ordered player bookkeeping: host designation, score ledger,
/// connection flags. No game rules live here beyond "exactly one host, and
/// the host is connected whenever anyone is".
#[derive(Debug, Default)]
pub struct PlayerRoster {
    players: Vec<Player>,
}

impl PlayerRoster {
    pub fn new() -> Self {
        Self { players: Vec::new() }
    }

    /// Add a connected player at the end of the join order. The first player
    /// in an otherwise host-less roster becomes host.
    pub fn add(&mut self, name: &str, avatar: Avatar) -> PlayerId {
        let id = Uuid::new_v4();
        let is_host = !self.players.iter().any(|p| p.is_host);
        self.players.push(Player {
            id,
            name: name.to_string(),
            avatar,
            score: 0,
            is_host,
            is_connected: true,
        });
        id
    }

    /// Remove a player entirely. Returns the removed entry, plus the id of
    /// the newly designated host when the removal forced a reassignment.
    pub fn remove(&mut self, id: PlayerId) -> Option<(Player, Option<PlayerId>)> {
        let index = self.players.iter().position(|p| p.id == id)?;
        let removed = self.players.remove(index);
        let new_host = if removed.is_host { self.reassign_host() } else { None };
        Some((removed, new_host))
    }

    /// Flag a player as disconnected, keeping their entry for reconnection.
    /// Returns the new host id when the disconnect forced a reassignment.
    pub fn mark_disconnected(&mut self, id: PlayerId) -> Option<PlayerId> {
        let was_host = {
            let player = self.players.iter_mut().find(|p| p.id == id)?;
            player.is_connected = false;
            player.is_host
        };
        if was_host { self.reassign_host() } else { None }
    }

    /// Flag a player as connected again. Returns false for unknown ids.
    pub fn mark_connected(&mut self, id: PlayerId) -> bool {
        let Some(player) = self.players.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        player.is_connected = true;
        // A roster that lost its last connected host while this player was
        // away may have nobody wearing the crown.
        if !self.players.iter().any(|p| p.is_host) {
            self.reassign_host();
        }
        true
    }

    /// Move the host role to the earliest-joined connected player. Returns
    /// the new host id if one was designated.
    fn reassign_host(&mut self) -> Option<PlayerId> {
        for p in &mut self.players {
            p.is_host = false;
        }
        let new_host = self.players.iter_mut().find(|p| p.is_connected)?;
        new_host.is_host = true;
        Some(new_host.id)
    }

    pub fn host_id(&self) -> Option<PlayerId> {
        self.players.iter().find(|p| p.is_host).map(|p| p.id)
    }

    pub fn is_host(&self, id: PlayerId) -> bool {
        self.host_id() == Some(id)
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.get(id).is_some()
    }

    pub fn is_connected(&self, id: PlayerId) -> bool {
        self.get(id).is_some_and(|p| p.is_connected)
    }

    pub fn name_of(&self, id: PlayerId) -> String {
        self.get(id).map(|p| p.name.clone()).unwrap_or_default()
    }

    /// Award points. Scores only ever move up; a non-positive award is a
    /// no-op rather than a decrement.
    pub fn award(&mut self, id: PlayerId, points: i32) {
        if points <= 0 {
            return;
        }
        if let Some(player) = self.players.iter_mut().find(|p| p.id == id) {
            player.score = player.score.saturating_add(points);
        }
    }

    pub fn score_of(&self, id: PlayerId) -> i32 {
        self.get(id).map(|p| p.score).unwrap_or(0)
    }

    pub fn reset_scores(&mut self) {
        for p in &mut self.players {
            p.score = 0;
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn connected_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_connected).count()
    }

    /// Connected player ids in join order.
    pub fn connected_ids(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.is_connected)
            .map(|p| p.id)
            .collect()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Cloned roster for broadcast payloads.
    pub fn roster_view(&self) -> Vec<Player> {
        self.players.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn roster_with(names: &[&str]) -> (PlayerRoster, Vec<PlayerId>) {
        let mut roster = PlayerRoster::new();
        let ids = names
            .iter()
            .map(|n| roster.add(n, json!({ "icon": "🐱" })))
            .collect();
        (roster, ids)
    }

    #[test]
    fn test_first_player_is_host() {
        let (roster, ids) = roster_with(&["Ava", "Ben"]);
        assert_eq!(roster.host_id(), Some(ids[0]));
        assert!(roster.is_host(ids[0]));
        assert!(!roster.is_host(ids[1]));
    }

    #[test]
    fn test_host_reassigns_to_earliest_connected_on_remove() {
        let (mut roster, ids) = roster_with(&["Ava", "Ben", "Cal"]);
        let (_, new_host) = roster.remove(ids[0]).unwrap();
        assert_eq!(new_host, Some(ids[1]));
        assert_eq!(roster.host_id(), Some(ids[1]));
    }

    #[test]
    fn test_host_reassigns_on_disconnect_skipping_disconnected() {
        let (mut roster, ids) = roster_with(&["Ava", "Ben", "Cal"]);
        roster.mark_disconnected(ids[1]);
        let new_host = roster.mark_disconnected(ids[0]);
        // Ben is disconnected, so the crown skips to Cal.
        assert_eq!(new_host, Some(ids[2]));
    }

    #[test]
    fn test_award_is_monotonic() {
        let (mut roster, ids) = roster_with(&["Ava"]);
        roster.award(ids[0], 10);
        roster.award(ids[0], -5);
        roster.award(ids[0], 0);
        assert_eq!(roster.score_of(ids[0]), 10);
        roster.award(ids[0], 3);
        assert_eq!(roster.score_of(ids[0]), 13);
    }

    #[test]
    fn test_reset_scores() {
        let (mut roster, ids) = roster_with(&["Ava", "Ben"]);
        roster.award(ids[0], 50);
        roster.award(ids[1], 20);
        roster.reset_scores();
        assert_eq!(roster.score_of(ids[0]), 0);
        assert_eq!(roster.score_of(ids[1]), 0);
    }

    #[test]
    fn test_connected_ids_keep_join_order() {
        let (mut roster, ids) = roster_with(&["Ava", "Ben", "Cal"]);
        roster.mark_disconnected(ids[1]);
        assert_eq!(roster.connected_ids(), vec![ids[0], ids[2]]);
        assert_eq!(roster.connected_count(), 2);
        assert_eq!(roster.len(), 3);
    }

    #[test]
    fn test_reconnect_restores_connection() {
        let (mut roster, ids) = roster_with(&["Ava", "Ben"]);
        roster.mark_disconnected(ids[1]);
        assert!(!roster.is_connected(ids[1]));
        assert!(roster.mark_connected(ids[1]));
        assert!(roster.is_connected(ids[1]));
        // Host never moved.
        assert_eq!(roster.host_id(), Some(ids[0]));
    }
}
