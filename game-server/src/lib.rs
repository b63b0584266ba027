//! Per-room actor runtime for the draw-and-guess session engine.
//!
//! The transport substrate (wire framing, sockets) lives outside this crate:
//! a connection handler obtains a [`Subscription`] by creating or joining a
//! room through the [`RoomRegistry`], forwards inbound [`ClientIntent`]s via
//! the room's [`RoomHandle`], and pumps outbound events from the
//! subscription to its client.
//!
//! [`ClientIntent`]: game_types::ClientIntent

pub mod config;
pub mod registry;
pub mod room;

pub use config::Config;
pub use registry::RoomRegistry;
pub use room::{EventSender, RoomError, RoomHandle, RoomInfo, Subscription};
