use std::collections::{BTreeSet, HashSet};
use std::time::Duration;

use game_types::PlayerId;
use rand::Rng;

use crate::PlayerRoster;

/// Fractions of the round duration at which one more letter is revealed to
/// the guessers.
pub const HINT_FRACTIONS: [f64; 2] = [0.5, 0.75];

/// Drawer rotation and hint-schedule bookkeeping.
///
/// Rotation is fair: each connected player draws at most once per cycle
/// before anyone repeats. Disconnected players are skipped at pick time; the
/// cycle resets only once every eligible player has drawn.
#[derive(Debug, Default)]
pub struct TurnScheduler {
    drawn_this_cycle: HashSet<PlayerId>,
}

impl TurnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the next drawer: the earliest-joined connected player who has
    /// not drawn this cycle. Returns `None` for an empty roster.
    pub fn next_drawer(&mut self, roster: &PlayerRoster) -> Option<PlayerId> {
        // Departed players must not block the cycle from completing.
        self.drawn_this_cycle.retain(|id| roster.contains(*id));

        let eligible = roster.connected_ids();
        if eligible.is_empty() {
            return None;
        }

        let pick = match eligible
            .iter()
            .find(|id| !self.drawn_this_cycle.contains(*id))
        {
            Some(&id) => id,
            None => {
                self.drawn_this_cycle.clear();
                eligible[0]
            }
        };
        self.drawn_this_cycle.insert(pick);
        Some(pick)
    }

    /// Forget rotation history (play-again).
    pub fn reset_cycle(&mut self) {
        self.drawn_this_cycle.clear();
    }

    /// How many hint letters should be revealed once `elapsed` of a round
    /// lasting `duration` has passed.
    pub fn hints_due(elapsed: Duration, duration: Duration) -> usize {
        if duration.is_zero() {
            return 0;
        }
        let fraction = elapsed.as_secs_f64() / duration.as_secs_f64();
        HINT_FRACTIONS.iter().filter(|f| fraction >= **f).count()
    }

    /// Choose one not-yet-revealed, non-space position of the word, or
    /// `None` when nothing is left to reveal.
    pub fn pick_hint_position(word: &str, revealed: &BTreeSet<usize>) -> Option<usize> {
        let candidates: Vec<usize> = word
            .chars()
            .enumerate()
            .filter(|(i, c)| !c.is_whitespace() && !revealed.contains(i))
            .map(|(i, _)| i)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let index = rand::rng().random_range(0..candidates.len());
        Some(candidates[index])
    }

    /// Render the guesser-facing pattern: revealed letters shown, the rest
    /// masked, spaces always visible.
    pub fn hint_pattern(word: &str, revealed: &BTreeSet<usize>) -> String {
        word.chars()
            .enumerate()
            .map(|(i, c)| {
                if c.is_whitespace() || revealed.contains(&i) {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}
