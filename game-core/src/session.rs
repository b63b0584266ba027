use std::collections::{BTreeSet, HashSet};
use std::time::{Duration, Instant};

use chrono::Utc;
use game_types::{
    Avatar, ChatEntry, DrawPayload, GameSettings, GuessRecord, IntentError, Outbound, PlayerId,
    Recipient, RoomState, RoundView, ServerEvent, SessionSnapshot,
};
use tracing::{debug, info, warn};

use crate::{
    ChatChannel, ChatRateLimiter, DRAWER_BONUS, DrawEventLog, GuessEvaluator, GuessOutcome,
    PlayerRoster, TurnScheduler, WordBank,
};

/// Get-ready pause between the lobby and the first round.
pub const COUNTDOWN_SECONDS: u32 = 3;
/// Pause between rounds while the word and the tally are on screen.
pub const ROUND_END_SECONDS: u32 = 5;
/// Players required to start, and to keep a game going.
pub const MIN_PLAYERS: usize = 2;

/// The active round's mutable state.
#[derive(Debug)]
pub struct Round {
    pub index: u32,
    pub word: String,
    pub drawer_id: PlayerId,
    pub started_at: Instant,
    pub duration: Duration,
    /// Character positions of the word already revealed as hints.
    pub revealed: BTreeSet<usize>,
    /// Players who have guessed the word this round.
    pub correct: HashSet<PlayerId>,
    pub guesses: Vec<GuessRecord>,
}

impl Round {
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.duration.saturating_sub(self.elapsed(now))
    }

    pub fn seconds_remaining(&self, now: Instant) -> u32 {
        self.remaining(now).as_secs() as u32
    }

    pub fn is_elapsed(&self, now: Instant) -> bool {
        self.elapsed(now) >= self.duration
    }
}

/// Top-level controller for one room.
///
/// Owns the roster, the round lifecycle, the draw log and the chat throttle,
/// and turns client intents into outbound event batches. Every mutation goes
/// through `&mut self`, so a caller that owns the session serializes intents
/// per room by construction; the server gives each session its own task.
///
/// Methods that depend on time take `now` explicitly; the session never
/// reads the clock itself, which keeps round timing reproducible in tests
/// and pins the authority for "remaining seconds" to the caller's ticks.
pub struct Session {
    code: String,
    state: RoomState,
    settings: GameSettings,
    roster: PlayerRoster,
    scheduler: TurnScheduler,
    rate_limiter: ChatRateLimiter,
    words: WordBank,
    round: Option<Round>,
    draw_log: DrawEventLog,
    /// Deadline driving the Countdown and RoundEnd pauses.
    pause_until: Option<Instant>,
    /// Bumped on every round boundary. A countdown tick armed for an earlier
    /// epoch must be ignored by the caller; see `round_epoch()`.
    round_epoch: u64,
}

impl Session {
    /// Create a room in the lobby with the host as its only player.
    /// Room creation never fails.
    pub fn new(
        code: impl Into<String>,
        host_name: &str,
        avatar: Avatar,
        words: WordBank,
    ) -> (Self, PlayerId) {
        let code = code.into();
        let mut roster = PlayerRoster::new();
        let host_id = roster.add(host_name, avatar);
        info!("Room {} created by {}", code, host_name);
        (
            Self {
                code,
                state: RoomState::Lobby,
                settings: GameSettings::default(),
                roster,
                scheduler: TurnScheduler::new(),
                rate_limiter: ChatRateLimiter::new(),
                words,
                round: None,
                draw_log: DrawEventLog::new(),
                pause_until: None,
                round_epoch: 0,
            },
            host_id,
        )
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn state(&self) -> RoomState {
        self.state
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn host_id(&self) -> Option<PlayerId> {
        self.roster.host_id()
    }

    pub fn score_of(&self, player: PlayerId) -> i32 {
        self.roster.score_of(player)
    }

    pub fn draw_log(&self) -> &DrawEventLog {
        &self.draw_log
    }

    pub fn connected_count(&self) -> usize {
        self.roster.connected_count()
    }

    /// Current round boundary epoch. The room actor rearms its countdown
    /// interval whenever this changes, so a tick scheduled for an ended
    /// round can never advance the next one.
    pub fn round_epoch(&self) -> u64 {
        self.round_epoch
    }

    /// Whether the periodic clock should be running at all.
    pub fn needs_clock(&self) -> bool {
        self.state.is_in_game()
    }

    /// A room with nobody connected has no further business.
    pub fn is_abandoned(&self) -> bool {
        self.roster.connected_count() == 0
    }

    // -- joining and leaving ------------------------------------------------

    pub fn join(
        &mut self,
        name: &str,
        avatar: Avatar,
    ) -> Result<(PlayerId, Vec<Outbound>), IntentError> {
        if !self.state.is_joinable() {
            return Err(IntentError::RoomAlreadyStarted {
                code: self.code.clone(),
            });
        }
        let id = self.roster.add(name, avatar);
        info!("{} joined room {}", name, self.code);
        let events = vec![(
            Recipient::All,
            ServerEvent::PlayerJoined {
                players: self.roster.roster_view(),
            },
        )];
        Ok((id, events))
    }

    /// Explicit departure: the player is removed from the roster.
    pub fn leave(&mut self, player: PlayerId, now: Instant) -> Vec<Outbound> {
        let Some((removed, new_host)) = self.roster.remove(player) else {
            return Vec::new();
        };
        self.rate_limiter.forget(player);
        info!("{} left room {}", removed.name, self.code);

        let mut events = vec![(
            Recipient::All,
            ServerEvent::PlayerLeft {
                players: self.roster.roster_view(),
            },
        )];
        if let Some(host_id) = new_host {
            events.push((Recipient::All, ServerEvent::HostChanged { host_id }));
        }
        events.extend(self.handle_departure(player, now));
        events
    }

    /// Connection drop: the entry stays for a possible reconnect, flagged
    /// disconnected.
    pub fn disconnect(&mut self, player: PlayerId, now: Instant) -> Vec<Outbound> {
        if !self.roster.is_connected(player) {
            return Vec::new();
        }
        let new_host = self.roster.mark_disconnected(player);
        info!("{} disconnected from room {}", self.roster.name_of(player), self.code);

        let mut events = vec![(
            Recipient::All,
            ServerEvent::PlayerLeft {
                players: self.roster.roster_view(),
            },
        )];
        if let Some(host_id) = new_host {
            events.push((Recipient::All, ServerEvent::HostChanged { host_id }));
        }
        events.extend(self.handle_departure(player, now));
        events
    }

    /// A returning player resumes mid-session: flagged connected again and
    /// handed a personalized snapshot whose draw log replays deterministically.
    pub fn reconnect(
        &mut self,
        player: PlayerId,
        now: Instant,
    ) -> Result<(SessionSnapshot, Vec<Outbound>), IntentError> {
        if !self.roster.mark_connected(player) {
            return Err(IntentError::PlayerNotFound {
                player_id: player.to_string(),
            });
        }
        info!("{} reconnected to room {}", self.roster.name_of(player), self.code);
        let events = vec![(
            Recipient::All,
            ServerEvent::PlayerJoined {
                players: self.roster.roster_view(),
            },
        )];
        Ok((self.snapshot_for(player, now), events))
    }

    /// Shared fallout of a player dropping out, in precedence order: too few
    /// players reverts the session to the lobby; an absent drawer ends the
    /// round early.
    fn handle_departure(&mut self, player: PlayerId, now: Instant) -> Vec<Outbound> {
        if !self.state.is_in_game() {
            return Vec::new();
        }
        if self.roster.connected_count() < MIN_PLAYERS {
            info!("Room {} below minimum players, returning to lobby", self.code);
            return self.revert_to_lobby();
        }
        let drawer_left = self
            .round
            .as_ref()
            .is_some_and(|r| r.drawer_id == player);
        if self.state == RoomState::Drawing && drawer_left {
            info!("Drawer left room {}, ending round early", self.code);
            return self.end_round(now);
        }
        // The departed player may have been the last one still guessing.
        if self.state == RoomState::Drawing && self.all_guessers_correct() {
            return self.end_round(now);
        }
        Vec::new()
    }

    // -- lobby --------------------------------------------------------------

    pub fn start_game(
        &mut self,
        sender: PlayerId,
        settings: GameSettings,
        now: Instant,
    ) -> Result<Vec<Outbound>, IntentError> {
        if self.state != RoomState::Lobby {
            return Err(IntentError::InvalidState {
                current_state: self.state.to_string(),
            });
        }
        if !self.roster.is_host(sender) {
            return Err(IntentError::NotHost);
        }
        let connected = self.roster.connected_count();
        if connected < MIN_PLAYERS {
            return Err(IntentError::InsufficientPlayers {
                required: MIN_PLAYERS,
                actual: connected,
            });
        }

        self.settings = GameSettings {
            round_count: settings.round_count.max(1),
            ..settings
        };
        self.state = RoomState::Countdown;
        self.pause_until = Some(now + Duration::from_secs(COUNTDOWN_SECONDS as u64));
        self.round_epoch += 1;
        info!(
            "Room {} starting: {} rounds of {}s",
            self.code, self.settings.round_count, self.settings.round_duration_seconds
        );

        Ok(vec![
            (
                Recipient::All,
                ServerEvent::GameStarted {
                    snapshot: self.masked_snapshot(now),
                },
            ),
            (
                Recipient::All,
                ServerEvent::TimerTick {
                    seconds_remaining: COUNTDOWN_SECONDS,
                },
            ),
        ])
    }

    pub fn play_again(&mut self, sender: PlayerId) -> Result<Vec<Outbound>, IntentError> {
        if self.state != RoomState::GameEnd {
            return Err(IntentError::InvalidState {
                current_state: self.state.to_string(),
            });
        }
        if !self.roster.is_host(sender) {
            return Err(IntentError::NotHost);
        }
        self.roster.reset_scores();
        self.scheduler.reset_cycle();
        Ok(self.revert_to_lobby())
    }

    fn revert_to_lobby(&mut self) -> Vec<Outbound> {
        self.state = RoomState::Lobby;
        self.round = None;
        self.draw_log.reset();
        self.pause_until = None;
        self.round_epoch += 1;
        vec![(
            Recipient::All,
            ServerEvent::ReturnedToLobby {
                players: self.roster.roster_view(),
            },
        )]
    }

    // -- the clock ----------------------------------------------------------

    /// Advance time-driven state: the get-ready countdown, remaining-seconds
    /// ticks, hint reveals, round expiry and the between-rounds pause. Called
    /// at a fixed cadence by the owning room task; the resulting ticks are
    /// the authoritative countdown clients must reconcile against.
    pub fn tick(&mut self, now: Instant) -> Vec<Outbound> {
        match self.state {
            RoomState::Countdown => {
                if self.pause_elapsed(now) {
                    self.begin_round(now)
                } else {
                    vec![(
                        Recipient::All,
                        ServerEvent::TimerTick {
                            seconds_remaining: self.pause_seconds_remaining(now),
                        },
                    )]
                }
            }
            RoomState::Drawing => self.tick_drawing(now),
            RoomState::RoundEnd => {
                if self.pause_elapsed(now) {
                    self.begin_round(now)
                } else {
                    Vec::new()
                }
            }
            RoomState::Lobby | RoomState::GameEnd => Vec::new(),
        }
    }

    fn tick_drawing(&mut self, now: Instant) -> Vec<Outbound> {
        let Some(round) = self.round.as_ref() else {
            return Vec::new();
        };
        if round.is_elapsed(now) {
            return self.end_round(now);
        }

        let mut events = vec![(
            Recipient::All,
            ServerEvent::TimerTick {
                seconds_remaining: round.seconds_remaining(now),
            },
        )];

        // Reveal any hints that have come due. The drawer already knows the
        // word and is never a recipient.
        let due = TurnScheduler::hints_due(round.elapsed(now), round.duration);
        let round = self.round.as_mut().expect("round checked above");
        while round.revealed.len() < due {
            let Some(position) = TurnScheduler::pick_hint_position(&round.word, &round.revealed)
            else {
                break;
            };
            round.revealed.insert(position);
            events.push((
                Recipient::AllExcept(round.drawer_id),
                ServerEvent::Hint {
                    pattern: TurnScheduler::hint_pattern(&round.word, &round.revealed),
                },
            ));
        }
        events
    }

    fn pause_elapsed(&self, now: Instant) -> bool {
        self.pause_until.is_some_and(|until| now >= until)
    }

    fn pause_seconds_remaining(&self, now: Instant) -> u32 {
        self.pause_until
            .map(|until| until.saturating_duration_since(now).as_secs() as u32)
            .unwrap_or(0)
    }

    // -- round lifecycle ----------------------------------------------------

    fn begin_round(&mut self, now: Instant) -> Vec<Outbound> {
        let Some(drawer_id) = self.scheduler.next_drawer(&self.roster) else {
            return self.revert_to_lobby();
        };
        let word = match self.words.pick(self.settings.difficulty) {
            Ok(word) => word,
            Err(e) => {
                warn!("Room {} has no words to draw: {}", self.code, e);
                return self.revert_to_lobby();
            }
        };

        let index = self.round.as_ref().map(|r| r.index + 1).unwrap_or(1);
        self.draw_log.reset();
        self.round = Some(Round {
            index,
            word,
            drawer_id,
            started_at: now,
            duration: Duration::from_secs(self.settings.round_duration_seconds as u64),
            revealed: BTreeSet::new(),
            correct: HashSet::new(),
            guesses: Vec::new(),
        });
        self.state = RoomState::Drawing;
        self.pause_until = None;
        self.round_epoch += 1;
        info!(
            "Room {} round {} started, drawer {}",
            self.code,
            index,
            self.roster.name_of(drawer_id)
        );

        // The drawer's snapshot carries the word; everyone else gets the
        // masked pattern.
        vec![
            (
                Recipient::Player(drawer_id),
                ServerEvent::NextRound {
                    snapshot: self.snapshot_for(drawer_id, now),
                },
            ),
            (
                Recipient::AllExcept(drawer_id),
                ServerEvent::NextRound {
                    snapshot: self.masked_snapshot(now),
                },
            ),
        ]
    }

    /// Close the current round: reveal the word, then either pause before
    /// the next round or finish the game after the last one.
    fn end_round(&mut self, now: Instant) -> Vec<Outbound> {
        let Some(round) = self.round.as_ref() else {
            return Vec::new();
        };
        let word = round.word.clone();
        let index = round.index;
        self.round_epoch += 1;

        let mut events = vec![(
            Recipient::All,
            ServerEvent::RoundEnded {
                word,
                players: self.roster.roster_view(),
            },
        )];

        if index >= self.settings.round_count {
            self.state = RoomState::GameEnd;
            self.pause_until = None;
            info!("Room {} game over after {} rounds", self.code, index);
            events.push((
                Recipient::All,
                ServerEvent::GameEnded {
                    final_scores: self.roster.roster_view(),
                },
            ));
        } else {
            self.state = RoomState::RoundEnd;
            self.pause_until = Some(now + Duration::from_secs(ROUND_END_SECONDS as u64));
        }
        events
    }

    // -- guessing and chat --------------------------------------------------

    /// Judge a guess. Silently a no-op for the drawer, for players already
    /// correct this round, for unknown players and for rate-limited senders;
    /// none of these get an error back.
    pub fn submit_guess(&mut self, sender: PlayerId, text: &str, now: Instant) -> Vec<Outbound> {
        if self.state != RoomState::Drawing {
            return Vec::new();
        }
        let Some(round) = self.round.as_ref() else {
            return Vec::new();
        };
        if !self.roster.is_connected(sender) || sender == round.drawer_id {
            return Vec::new();
        }
        if round.correct.contains(&sender) {
            // Accepted for the record, never re-scored, never broadcast:
            // a correct guesser repeating the word must not leak it.
            let record = GuessRecord {
                player_id: sender,
                text: text.to_string(),
                correct: false,
                timestamp: Utc::now().to_rfc3339(),
            };
            self.round.as_mut().expect("round checked above").guesses.push(record);
            return Vec::new();
        }
        if !self.rate_limiter.check_at(sender, ChatChannel::Game, now) {
            debug!("Rate-limited guess from {} in room {}", sender, self.code);
            return Vec::new();
        }

        let outcome = GuessEvaluator::evaluate(
            text,
            &round.word,
            round.remaining(now),
            round.duration,
        );
        let drawer_id = round.drawer_id;
        let record = GuessRecord {
            player_id: sender,
            text: text.to_string(),
            correct: matches!(outcome, GuessOutcome::Correct { .. }),
            timestamp: Utc::now().to_rfc3339(),
        };
        let sender_name = self.roster.name_of(sender);

        match outcome {
            GuessOutcome::Correct { award } => {
                {
                    let round = self.round.as_mut().expect("round checked above");
                    round.correct.insert(sender);
                    round.guesses.push(record);
                }
                self.roster.award(sender, award);
                self.roster.award(drawer_id, DRAWER_BONUS);
                info!(
                    "{} guessed the word in room {} (+{})",
                    sender_name, self.code, award
                );

                let mut events = vec![
                    (
                        Recipient::Player(sender),
                        ServerEvent::CorrectGuess {
                            player_id: sender,
                            player_name: sender_name.clone(),
                            text: text.to_string(),
                            is_originator: true,
                        },
                    ),
                    (
                        Recipient::AllExcept(sender),
                        ServerEvent::CorrectGuess {
                            player_id: sender,
                            player_name: sender_name,
                            text: GuessEvaluator::mask(text),
                            is_originator: false,
                        },
                    ),
                ];
                if self.all_guessers_correct() {
                    events.extend(self.end_round(now));
                }
                events
            }
            GuessOutcome::Incorrect => {
                self.round.as_mut().expect("round checked above").guesses.push(record);
                vec![(
                    Recipient::All,
                    ServerEvent::GameMessage {
                        entry: ChatEntry {
                            player_id: sender,
                            player_name: sender_name,
                            text: text.to_string(),
                            timestamp: Utc::now().to_rfc3339(),
                        },
                    },
                )]
            }
        }
    }

    fn all_guessers_correct(&self) -> bool {
        let Some(round) = self.round.as_ref() else {
            return false;
        };
        let guessers: Vec<PlayerId> = self
            .roster
            .connected_ids()
            .into_iter()
            .filter(|id| *id != round.drawer_id)
            .collect();
        !guessers.is_empty() && guessers.iter().all(|id| round.correct.contains(id))
    }

    pub fn lobby_message(&mut self, sender: PlayerId, text: &str, now: Instant) -> Vec<Outbound> {
        self.chat_on(ChatChannel::Lobby, sender, text, now)
    }

    pub fn chat_message(&mut self, sender: PlayerId, text: &str, now: Instant) -> Vec<Outbound> {
        self.chat_on(ChatChannel::Game, sender, text, now)
    }

    fn chat_on(
        &mut self,
        channel: ChatChannel,
        sender: PlayerId,
        text: &str,
        now: Instant,
    ) -> Vec<Outbound> {
        if !self.roster.is_connected(sender) {
            return Vec::new();
        }
        if !self.rate_limiter.check_at(sender, channel, now) {
            debug!("Rate-limited chat from {} in room {}", sender, self.code);
            return Vec::new();
        }
        vec![(
            Recipient::All,
            ServerEvent::GameMessage {
                entry: ChatEntry {
                    player_id: sender,
                    player_name: self.roster.name_of(sender),
                    text: text.to_string(),
                    timestamp: Utc::now().to_rfc3339(),
                },
            },
        )]
    }

    // -- drawing ------------------------------------------------------------

    /// Serialize a drawing primitive into the round log. Only the current
    /// drawer's events are accepted; everything else is dropped silently.
    pub fn apply_draw(&mut self, sender: PlayerId, payload: DrawPayload) -> Vec<Outbound> {
        if self.state != RoomState::Drawing {
            return Vec::new();
        }
        let Some(round) = self.round.as_ref() else {
            return Vec::new();
        };
        if sender != round.drawer_id {
            debug!("Dropping draw event from non-drawer {} in room {}", sender, self.code);
            return Vec::new();
        }
        let is_clear = payload.is_clear();
        let Some(event) = self.draw_log.append(payload) else {
            return Vec::new();
        };
        let event = event.clone();
        if is_clear {
            vec![(Recipient::AllExcept(sender), ServerEvent::ClearCanvas)]
        } else {
            vec![(Recipient::AllExcept(sender), ServerEvent::Drawing { event })]
        }
    }

    /// The drawer wiping their canvas; logged like any other primitive so
    /// late joiners replay it in order.
    pub fn clear_canvas(&mut self, sender: PlayerId) -> Vec<Outbound> {
        self.apply_draw(sender, DrawPayload::Clear)
    }

    // -- snapshots ----------------------------------------------------------

    /// Personalized full-state snapshot: the secret word is present only
    /// when the viewer is the drawer.
    pub fn snapshot_for(&self, viewer: PlayerId, now: Instant) -> SessionSnapshot {
        self.snapshot(Some(viewer), now)
    }

    fn masked_snapshot(&self, now: Instant) -> SessionSnapshot {
        self.snapshot(None, now)
    }

    fn snapshot(&self, viewer: Option<PlayerId>, now: Instant) -> SessionSnapshot {
        SessionSnapshot {
            room_code: self.code.clone(),
            state: self.state,
            settings: self.settings,
            players: self.roster.roster_view(),
            round: self.round.as_ref().map(|round| RoundView {
                index: round.index,
                drawer_id: round.drawer_id,
                drawer_name: self.roster.name_of(round.drawer_id),
                word: (viewer == Some(round.drawer_id)).then(|| round.word.clone()),
                word_pattern: TurnScheduler::hint_pattern(&round.word, &round.revealed),
                seconds_remaining: round.seconds_remaining(now),
                correct_guessers: round.correct.iter().copied().collect(),
            }),
            drawing: self.draw_log.events().to_vec(),
        }
    }
}
