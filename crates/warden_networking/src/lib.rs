//! # WARDEN Networking
//!
//! Player lifecycle on top of [`warden_core::SlotPool`].
//!
//! ## Architecture
//!
//! - **Protocol**: ordered binary records built from `UINT8`, `UINT16`, `UINT32`, `INT32`
//!   and `DYNAMIC_LEN_STR_8` fields, decoded all-or-nothing
//! - **Transport**: a black box that sends `(opcode, payload)` to one peer
//! - **Server**: the [`PlayerPool`], which announces every join (opcode 137) and quit
//!   (opcode 138) to all other connected players
//!
//! ## Threading Model
//!
//! ```text
//!  I/O THREAD                       OWNER THREAD
//!    |                                 |
//!    |-- InboundEvent::Connect ------->| pump() -> admit()  -> 137 to others
//!    |-- InboundEvent::Disconnect ---->| pump() -> remove() -> 138 to others
//!    |<-- OutboundMessage -------------| ChannelTransport
//! ```
//!
//! The player pool is never touched from the I/O side.
//!
//! ## Example
//!
//! ```rust,ignore
//! use warden_networking::{inbound_channel, PlayerPool, ServerConfig};
//!
//! let config = ServerConfig::from_toml_file("server.toml")?;
//! let mut players = PlayerPool::from_config(&config)?;
//! let (events_tx, events_rx) = inbound_channel(config.inbound_queue_capacity);
//! // hand events_tx to the socket thread, then every tick:
//! players.pump(&events_rx);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod protocol;
pub mod server;
pub mod transport;

// Re-exports for convenience
pub use protocol::{
    DisconnectReason, FieldKind, FieldValue, PlayerJoinNotice, PlayerJoinRequest,
    PlayerQuitNotice, RecordFields, WireError, WireReader, WireWriter,
};
pub use server::{
    inbound_channel, InboundEvent, Player, PlayerEventHandler, PlayerPool, PlayerPoolError,
    PumpStats, ServerConfig,
};
pub use transport::{ChannelTransport, Inbox, LoopbackTransport, OutboundMessage, Transport, TransportError};

/// RPC id announcing a newly joined player.
pub const PLAYER_JOIN_OPCODE: u8 = 137;

/// RPC id announcing a departed player.
pub const PLAYER_QUIT_OPCODE: u8 = 138;

/// Upper bound on pool size: player indices travel as `UINT16`.
pub const MAX_PLAYERS: usize = u16::MAX as usize;
