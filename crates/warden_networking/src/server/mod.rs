//! # Player Server
//!
//! The player pool and everything that feeds it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       PLAYER SERVER                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌──────────────┐    ┌──────────────┐    ┌──────────────┐   │
//! │  │ Network I/O  │───▶│ Inbound      │───▶│ PlayerPool   │   │
//! │  │ (any thread) │    │ Queue        │    │ (owner)      │   │
//! │  └──────────────┘    └──────────────┘    └──────┬───────┘   │
//! │         ▲                                       │           │
//! │         └──────────── OutboundMessage ──────────┘           │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod events;
mod player;
mod pool;

pub use config::ServerConfig;
pub use events::PlayerEventHandler;
pub use player::Player;
pub use pool::{PlayerPool, PlayerPoolError};

use std::net::SocketAddr;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use warden_core::SlotIndex;

use crate::protocol::DisconnectReason;
use crate::transport::Transport;

/// Work handed from the I/O side to the pool owner.
pub enum InboundEvent {
    /// A client finished connecting and sent its join payload.
    Connect {
        /// Client address.
        address: SocketAddr,
        /// Transport for replies to this client.
        transport: Box<dyn Transport>,
        /// Raw join payload.
        payload: Vec<u8>,
    },
    /// A player left or must be removed.
    Disconnect {
        /// Pool index of the player.
        player: SlotIndex,
        /// Why.
        reason: DisconnectReason,
    },
}

/// Creates the bounded queue between the I/O side and the pool owner.
#[must_use]
pub fn inbound_channel(capacity: usize) -> (Sender<InboundEvent>, Receiver<InboundEvent>) {
    bounded(capacity)
}

/// Outcome of one [`PlayerPool::pump`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PumpStats {
    /// Players admitted.
    pub admitted: usize,
    /// Players removed.
    pub removed: usize,
    /// Connects rejected (pool full).
    pub rejected: usize,
    /// Disconnects naming a player that is not connected.
    pub ignored: usize,
}

impl PlayerPool {
    /// Applies every queued event, without blocking.
    ///
    /// Must be called from the thread that owns the pool.
    pub fn pump(&mut self, events: &Receiver<InboundEvent>) -> PumpStats {
        let mut stats = PumpStats::default();

        loop {
            let event = match events.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            };

            match event {
                InboundEvent::Connect {
                    address,
                    transport,
                    payload,
                } => match self.admit(address, transport, &payload) {
                    Ok(_) => stats.admitted += 1,
                    Err(e) => {
                        tracing::warn!("Rejected connection from {}: {}", address, e);
                        stats.rejected += 1;
                    }
                },
                InboundEvent::Disconnect { player, reason } => {
                    match self.remove(player, reason) {
                        Ok(()) => stats.removed += 1,
                        Err(e) => {
                            tracing::debug!("Ignored disconnect for {}: {}", player, e);
                            stats.ignored += 1;
                        }
                    }
                }
            }
        }

        stats
    }
}
