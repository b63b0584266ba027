//! Room actor: one Tokio task per room, owning its session.
//!
//! Every intent for a room flows through the actor's command channel and is
//! applied one at a time, so no two mutations of the same session ever run
//! concurrently. Broadcast fan-out happens after mutation, onto per-player
//! channels, and never blocks the actor.

use std::collections::HashMap;
use std::time::Duration;

use game_core::{Session, WordBank};
use game_types::{
    Avatar, ClientIntent, IntentError, Outbound, PlayerId, Recipient, RoomState, ServerEvent,
    SessionSnapshot,
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

/// Errors crossing the room boundary.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room's actor is gone or its channel is full.
    #[error("room {0} is unavailable")]
    Unavailable(String),

    /// The session rejected the intent; surfaced to the originator only.
    #[error("intent rejected: {0}")]
    Rejected(IntentError),
}

/// Per-player outbound channel into a connection handler.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// A snapshot of room metadata, for sweeps and diagnostics.
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub code: String,
    pub state: RoomState,
    pub player_count: usize,
    pub connected_count: usize,
}

pub(crate) enum RoomCommand {
    Join {
        name: String,
        avatar: Avatar,
        sender: EventSender,
        reply: oneshot::Sender<Result<PlayerId, IntentError>>,
    },
    Reconnect {
        player_id: PlayerId,
        sender: EventSender,
        reply: oneshot::Sender<Result<SessionSnapshot, IntentError>>,
    },
    Intent {
        player_id: PlayerId,
        intent: ClientIntent,
        reply: Option<oneshot::Sender<Result<(), IntentError>>>,
    },
    Disconnect {
        player_id: PlayerId,
    },
    Info {
        reply: oneshot::Sender<RoomInfo>,
    },
    Shutdown,
}

/// Scoped event subscription for one player.
///
/// Dropping the handle (or calling [`Subscription::release`]) unregisters
/// the player's sender on the actor. The disconnect path is deterministic,
/// never dependent on ambient connection state.
pub struct Subscription {
    player_id: PlayerId,
    events: mpsc::UnboundedReceiver<ServerEvent>,
    commands: mpsc::Sender<RoomCommand>,
}

impl Subscription {
    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub async fn recv(&mut self) -> Option<ServerEvent> {
        self.events.recv().await
    }

    pub fn try_recv(&mut self) -> Option<ServerEvent> {
        self.events.try_recv().ok()
    }

    /// Explicit teardown; equivalent to dropping the handle.
    pub fn release(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let _ = self.commands.try_send(RoomCommand::Disconnect {
            player_id: self.player_id,
        });
    }
}

/// Handle to a running room actor. Cheap to clone.
#[derive(Clone)]
pub struct RoomHandle {
    code: String,
    tx: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Whether the actor behind this handle has stopped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub async fn join(
        &self,
        name: &str,
        avatar: Avatar,
    ) -> Result<(PlayerId, Subscription), RoomError> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Join {
            name: name.to_string(),
            avatar,
            sender: event_tx,
            reply: reply_tx,
        })
        .await?;
        let player_id = self.recv_reply(reply_rx).await?.map_err(RoomError::Rejected)?;
        Ok((
            player_id,
            Subscription {
                player_id,
                events: event_rx,
                commands: self.tx.clone(),
            },
        ))
    }

    /// Resume a player mid-session. The returned snapshot replays
    /// deterministically; the subscription receives everything after it.
    pub async fn reconnect(
        &self,
        player_id: PlayerId,
    ) -> Result<(SessionSnapshot, Subscription), RoomError> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Reconnect {
            player_id,
            sender: event_tx,
            reply: reply_tx,
        })
        .await?;
        let snapshot = self.recv_reply(reply_rx).await?.map_err(RoomError::Rejected)?;
        Ok((
            snapshot,
            Subscription {
                player_id,
                events: event_rx,
                commands: self.tx.clone(),
            },
        ))
    }

    /// Fire-and-forget intent delivery, for the silently-judged operations
    /// (guesses, drawing, chat, leaving).
    pub async fn send_intent(
        &self,
        player_id: PlayerId,
        intent: ClientIntent,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::Intent {
            player_id,
            intent,
            reply: None,
        })
        .await
    }

    /// Intent delivery that waits for the session's verdict; use for the
    /// operations that may be rejected (start game, play again).
    pub async fn request(
        &self,
        player_id: PlayerId,
        intent: ClientIntent,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Intent {
            player_id,
            intent,
            reply: Some(reply_tx),
        })
        .await?;
        self.recv_reply(reply_rx).await?.map_err(RoomError::Rejected)
    }

    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Info { reply: reply_tx }).await?;
        self.recv_reply(reply_rx).await
    }

    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.send(RoomCommand::Shutdown).await
    }

    async fn send(&self, command: RoomCommand) -> Result<(), RoomError> {
        self.tx
            .send(command)
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    async fn recv_reply<T>(&self, rx: oneshot::Receiver<T>) -> Result<T, RoomError> {
        rx.await.map_err(|_| RoomError::Unavailable(self.code.clone()))
    }
}

struct RoomActor {
    session: Session,
    senders: HashMap<PlayerId, EventSender>,
    idle_timeout: Duration,
}

impl RoomActor {
    async fn run(mut self, mut rx: mpsc::Receiver<RoomCommand>) {
        let code = self.session.code().to_string();
        info!("Room {} actor started", code);

        // The 1 Hz countdown. Ticks only matter while a game is running;
        // the interval is re-armed at every round boundary (epoch change) so
        // a tick scheduled against an ended round is never applied to the
        // next one.
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut epoch = self.session.round_epoch();

        let idle = tokio::time::sleep(self.idle_timeout);
        tokio::pin!(idle);

        loop {
            tokio::select! {
                command = rx.recv() => {
                    let Some(command) = command else { break };
                    let shutdown = matches!(command, RoomCommand::Shutdown);
                    self.handle_command(command);
                    if shutdown {
                        break;
                    }
                    idle.as_mut()
                        .reset(tokio::time::Instant::now() + self.idle_timeout);
                }
                _ = ticker.tick(), if self.session.needs_clock() => {
                    let now = tokio::time::Instant::now().into_std();
                    let batch = self.session.tick(now);
                    self.dispatch(batch);
                }
                _ = &mut idle => {
                    info!("Room {} idle for {:?}, closing", code, self.idle_timeout);
                    break;
                }
            }

            if self.session.round_epoch() != epoch {
                epoch = self.session.round_epoch();
                ticker.reset();
            }
            if self.session.is_abandoned() {
                info!("Room {} has no connected players, closing", code);
                break;
            }
        }

        info!("Room {} actor stopped", code);
    }

    fn handle_command(&mut self, command: RoomCommand) {
        let now = tokio::time::Instant::now().into_std();
        match command {
            RoomCommand::Join { name, avatar, sender, reply } => {
                let result = match self.session.join(&name, avatar) {
                    Ok((player_id, batch)) => {
                        self.senders.insert(player_id, sender);
                        self.dispatch(batch);
                        Ok(player_id)
                    }
                    Err(e) => Err(e),
                };
                let _ = reply.send(result);
            }
            RoomCommand::Reconnect { player_id, sender, reply } => {
                let result = match self.session.reconnect(player_id, now) {
                    Ok((snapshot, batch)) => {
                        self.senders.insert(player_id, sender);
                        self.dispatch(batch);
                        Ok(snapshot)
                    }
                    Err(e) => Err(e),
                };
                let _ = reply.send(result);
            }
            RoomCommand::Intent { player_id, intent, reply } => {
                let result = self.handle_intent(player_id, intent, now);
                if let Some(reply) = reply {
                    let _ = reply.send(result);
                }
            }
            RoomCommand::Disconnect { player_id } => {
                self.senders.remove(&player_id);
                let batch = self.session.disconnect(player_id, now);
                self.dispatch(batch);
            }
            RoomCommand::Info { reply } => {
                let _ = reply.send(RoomInfo {
                    code: self.session.code().to_string(),
                    state: self.session.state(),
                    player_count: self.senders.len(),
                    connected_count: self.session.connected_count(),
                });
            }
            RoomCommand::Shutdown => {
                info!("Room {} shutting down", self.session.code());
            }
        }
    }

    fn handle_intent(
        &mut self,
        player_id: PlayerId,
        intent: ClientIntent,
        now: std::time::Instant,
    ) -> Result<(), IntentError> {
        let batch = match intent {
            ClientIntent::StartGame { settings } => {
                self.session.start_game(player_id, settings, now)?
            }
            ClientIntent::PlayAgain => self.session.play_again(player_id)?,
            ClientIntent::SubmitGuess { text } => self.session.submit_guess(player_id, &text, now),
            ClientIntent::Drawing { payload } => self.session.apply_draw(player_id, payload),
            ClientIntent::ClearCanvas => self.session.clear_canvas(player_id),
            ClientIntent::LobbyMessage { text } => {
                self.session.lobby_message(player_id, &text, now)
            }
            ClientIntent::ChatMessage { text } => self.session.chat_message(player_id, &text, now),
            ClientIntent::Leave => {
                self.senders.remove(&player_id);
                self.session.leave(player_id, now)
            }
            ClientIntent::CreateRoom { .. }
            | ClientIntent::JoinRoom { .. }
            | ClientIntent::Reconnect => {
                // Routed at the registry level, not to a live room.
                debug!("Ignoring registry-level intent inside room {}", self.session.code());
                Vec::new()
            }
        };
        self.dispatch(batch);
        Ok(())
    }

    /// Fan an event batch out to its recipients. A closed receiver means the
    /// player's connection handler is gone; the send is dropped silently and
    /// the disconnect path cleans up via the subscription's drop.
    fn dispatch(&self, batch: Vec<Outbound>) {
        for (recipient, event) in batch {
            match recipient {
                Recipient::All => {
                    for sender in self.senders.values() {
                        let _ = sender.send(event.clone());
                    }
                }
                Recipient::Player(id) => {
                    if let Some(sender) = self.senders.get(&id) {
                        let _ = sender.send(event);
                    }
                }
                Recipient::AllExcept(excluded) => {
                    for (id, sender) in &self.senders {
                        if *id != excluded {
                            let _ = sender.send(event.clone());
                        }
                    }
                }
            }
        }
    }
}

/// Spawn a room actor with the given host already joined. Returns the
/// handle, the host's player id and the host's subscription.
pub(crate) fn spawn_room(
    code: String,
    host_name: &str,
    avatar: Avatar,
    words: WordBank,
    channel_capacity: usize,
    idle_timeout: Duration,
) -> (RoomHandle, PlayerId, Subscription) {
    let (tx, rx) = mpsc::channel(channel_capacity);
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let (session, host_id) = Session::new(code.clone(), host_name, avatar, words);
    let mut senders = HashMap::new();
    senders.insert(host_id, event_tx);

    let actor = RoomActor {
        session,
        senders,
        idle_timeout,
    };
    tokio::spawn(actor.run(rx));

    let handle = RoomHandle { code, tx: tx.clone() };
    let subscription = Subscription {
        player_id: host_id,
        events: event_rx,
        commands: tx,
    };
    (handle, host_id, subscription)
}
