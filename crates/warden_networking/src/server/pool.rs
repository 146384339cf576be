//! # Player Pool
//!
//! Slot pool of players that announces every join and quit to all other players.
//!
//! ## Lifecycle
//!
//! ```text
//! admit()                                   remove()
//!   claim slot                                lock slot
//!   decode join payload (all-or-nothing)      send 138 to every other player
//!   send 137 to every other player            run handlers (registration order)
//!   run handlers (registration order)         release; freed on unlock
//! ```

use std::net::SocketAddr;

use thiserror::Error;
use warden_core::{PoolError, SlotIndex, SlotPool};

use super::config::ServerConfig;
use super::events::PlayerEventHandler;
use super::player::Player;
use crate::protocol::{DisconnectReason, PlayerJoinNotice, PlayerJoinRequest, PlayerQuitNotice, WireError};
use crate::transport::Transport;
use crate::{MAX_PLAYERS, PLAYER_JOIN_OPCODE, PLAYER_QUIT_OPCODE};

/// Errors that can occur in the player pool.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayerPoolError {
    /// Slot pool failure: full, or an unknown player index.
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// A record could not be encoded or decoded.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// An event handler released the player while it was being admitted.
    #[error("player {index} rejected during admission")]
    Rejected {
        /// Index the player briefly held.
        index: u32,
    },

    /// Invalid configuration file or value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Player slots plus the join/quit broadcast.
///
/// Single owner: call it from one thread and feed it network events through
/// [`pump`](Self::pump).
pub struct PlayerPool {
    players: SlotPool<Player>,
    handlers: Vec<Box<dyn PlayerEventHandler>>,
    colour: i32,
}

impl PlayerPool {
    /// Creates a pool for `capacity` players using the default nametag colour.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or exceeds [`MAX_PLAYERS`].
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity <= MAX_PLAYERS,
            "Player indices must fit in a UINT16"
        );
        Self {
            players: SlotPool::new(capacity),
            handlers: Vec::new(),
            colour: colour_bits(ServerConfig::default().player_colour),
        }
    }

    /// Creates a pool from a config.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerPoolError::InvalidConfig`] if the config does not validate.
    pub fn from_config(config: &ServerConfig) -> Result<Self, PlayerPoolError> {
        config.validate()?;
        let mut pool = Self::new(config.max_players);
        pool.colour = colour_bits(config.player_colour);
        Ok(pool)
    }

    /// Registers an observer. Observers run in registration order.
    pub fn add_event_handler(&mut self, handler: Box<dyn PlayerEventHandler>) {
        self.handlers.push(handler);
    }

    /// Number of registered observers.
    #[must_use]
    pub fn event_handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Admits a new player.
    ///
    /// Claims a slot, attaches the network data, decodes `inbound` into the player's
    /// identity and announces the player to everyone else. A malformed payload is
    /// logged and leaves the identity at its defaults; the player is still admitted.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Exhausted`] (wrapped) when the server is full, and
    /// [`PlayerPoolError::Rejected`] if a handler released the player; peers that heard
    /// the join then get a quit notice with [`DisconnectReason::Kicked`].
    pub fn admit(
        &mut self,
        address: SocketAddr,
        transport: Box<dyn Transport>,
        inbound: &[u8],
    ) -> Result<SlotIndex, PlayerPoolError> {
        let capacity = self.players.capacity();
        let index = self
            .players
            .claim_with(None, Player::new)
            .ok_or(PoolError::Exhausted { capacity })?;

        let mut guard = self.players.lock_scoped(index)?;
        let handle = guard
            .handle(index)
            .ok_or(PoolError::InvalidHandle { index: index.0 })?;
        let player_id = wire_id(index)?;

        let player = guard.get_mut(index)?;
        player.set_network_data(address, transport);
        match PlayerJoinRequest::decode(inbound) {
            Ok(join) => player.apply_join(join),
            Err(e) => tracing::warn!("Malformed join payload from {} (player {}): {}", address, index, e),
        }
        let name = player.name().to_vec();

        let notice = PlayerJoinNotice {
            player: player_id,
            colour: self.colour,
            is_npc: false,
            name,
        };
        let announced = match notice.encode() {
            Ok(payload) => {
                broadcast(&mut guard, index, PLAYER_JOIN_OPCODE, &payload);
                true
            }
            Err(e) => {
                tracing::warn!("Join notice for player {} not sent: {}", index, e);
                false
            }
        };

        for handler in &mut self.handlers {
            handler.on_connect(&mut guard, index, inbound);
        }
        drop(guard);

        let player = match self.players.resolve(handle) {
            Ok(_) if !self.players.is_pending_release(index) => self.players.get(index)?,
            _ => {
                // Peers already heard the join; take it back.
                if announced {
                    let quit = PlayerQuitNotice {
                        player: player_id,
                        reason: DisconnectReason::Kicked,
                    };
                    broadcast(&mut self.players, index, PLAYER_QUIT_OPCODE, &quit.encode());
                }
                tracing::info!("Player {} from {} rejected by a handler", index, address);
                return Err(PlayerPoolError::Rejected { index: index.0 });
            }
        };
        tracing::info!(
            "Player {} ({}) connected from {}",
            index,
            player.name_lossy(),
            address
        );
        Ok(index)
    }

    /// Removes a player, announcing the departure to everyone else.
    ///
    /// The player stays readable for every handler; its slot is freed once the
    /// dispatch is over and no other lock holds it.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidHandle`] (wrapped) if `index` is not a connected
    /// player or is already being removed.
    pub fn remove(&mut self, index: SlotIndex, reason: DisconnectReason) -> Result<(), PlayerPoolError> {
        if self.players.is_pending_release(index) {
            return Err(PoolError::InvalidHandle { index: index.0 }.into());
        }
        let mut guard = self.players.lock_scoped(index)?;
        let handle = guard
            .handle(index)
            .ok_or(PoolError::InvalidHandle { index: index.0 })?;
        let name = guard.get(index)?.name_lossy().into_owned();

        let notice = PlayerQuitNotice {
            player: wire_id(index)?,
            reason,
        };
        broadcast(&mut guard, index, PLAYER_QUIT_OPCODE, &notice.encode());

        for handler in &mut self.handlers {
            handler.on_disconnect(&mut guard, index, reason);
        }

        // A handler may have released the slot and handed it to someone else.
        if guard.resolve(handle).is_ok() && !guard.is_pending_release(index) {
            guard.release(index, false)?;
        }
        drop(guard);

        tracing::info!("Player {} ({}) disconnected: {:?}", index, name, reason);
        Ok(())
    }

    /// Drops every player without announcing anything. Returns how many were dropped.
    pub fn shutdown(&mut self) -> usize {
        let dropped = self.players.release_all().len();
        if dropped > 0 {
            tracing::info!("Player pool shut down, {} players dropped", dropped);
        }
        dropped
    }

    /// The underlying slot pool.
    #[must_use]
    pub const fn players(&self) -> &SlotPool<Player> {
        &self.players
    }

    /// The underlying slot pool, mutably. Changes made here are not broadcast.
    pub fn players_mut(&mut self) -> &mut SlotPool<Player> {
        &mut self.players
    }

    /// Returns true if `index` is a connected player.
    #[must_use]
    pub fn valid(&self, index: SlotIndex) -> bool {
        self.players.valid(index)
    }

    /// Borrows a player.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidHandle`] if `index` is not a connected player.
    pub fn get(&self, index: SlotIndex) -> Result<&Player, PoolError> {
        self.players.get(index)
    }

    /// Mutably borrows a player.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidHandle`] if `index` is not a connected player.
    pub fn get_mut(&mut self, index: SlotIndex) -> Result<&mut Player, PoolError> {
        self.players.get_mut(index)
    }

    /// Connected players in index order.
    pub fn entries(&self) -> impl Iterator<Item = (SlotIndex, &Player)> + '_ {
        self.players.entries()
    }

    /// Number of connected players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns true if nobody is connected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Maximum number of players.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.players.capacity()
    }

    /// Locks a player to postpone its release until unlocked.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidHandle`] if `index` is not a connected player.
    pub fn lock(&mut self, index: SlotIndex) -> Result<(), PoolError> {
        self.players.lock(index)
    }

    /// Unlocks a player, completing a postponed release.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidHandle`] or [`PoolError::NotLocked`].
    pub fn unlock(&mut self, index: SlotIndex) -> Result<Option<Player>, PoolError> {
        self.players.unlock(index)
    }
}

/// Sends one record to every live player except `subject`. Returns the delivery count.
fn broadcast(players: &mut SlotPool<Player>, subject: SlotIndex, opcode: u8, payload: &[u8]) -> usize {
    let mut delivered = 0;
    for target in players.live_indices() {
        if target == subject {
            continue;
        }
        let Ok(peer) = players.get_mut(target) else {
            continue;
        };
        match peer.send_message(opcode, payload) {
            Ok(()) => delivered += 1,
            Err(e) => tracing::warn!("RPC {} to player {} failed: {}", opcode, target, e),
        }
    }
    delivered
}

/// Player ids travel as `UINT16`.
fn wire_id(index: SlotIndex) -> Result<u16, PoolError> {
    u16::try_from(index.get()).map_err(|_| PoolError::InvalidHandle { index: index.get() })
}

/// Reinterprets an RGBA value as the `INT32` the wire carries.
#[allow(clippy::cast_possible_wrap)]
const fn colour_bits(rgba: u32) -> i32 {
    rgba as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Inbox;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    fn join_payload(name: &[u8]) -> Vec<u8> {
        PlayerJoinRequest {
            version: 4057,
            modded: 0,
            name: name.to_vec(),
            challenge_response: 1,
            key: b"key".to_vec(),
            version_string: b"0.3.7".to_vec(),
        }
        .encode()
        .unwrap()
    }

    #[test]
    fn test_admit_decodes_identity() {
        let mut pool = PlayerPool::new(4);
        let inbox = Inbox::new();
        let index = pool
            .admit(addr(1), Box::new(inbox.transport()), &join_payload(b"Ann"))
            .unwrap();

        let player = pool.get(index).unwrap();
        assert_eq!(player.name(), b"Ann");
        assert_eq!(player.version(), 4057);
        assert_eq!(player.address(), Some(addr(1)));
        assert!(inbox.is_empty(), "first player has nobody to hear about");
        assert_eq!(pool.lock_count_of(index), Some(0));
    }

    #[test]
    fn test_malformed_join_keeps_defaults() {
        let mut pool = PlayerPool::new(4);
        let mut payload = join_payload(b"Bob");
        payload.truncate(payload.len() - 2);

        let index = pool
            .admit(addr(1), Box::new(Inbox::new().transport()), &payload)
            .unwrap();
        let player = pool.get(index).unwrap();
        assert_eq!(player.version(), 0);
        assert!(player.name().is_empty());
        assert!(player.key().is_empty());
    }

    #[test]
    fn test_full_pool_rejects() {
        let mut pool = PlayerPool::new(1);
        pool.admit(addr(1), Box::new(Inbox::new().transport()), &[]).unwrap();
        let err = pool
            .admit(addr(2), Box::new(Inbox::new().transport()), &[])
            .unwrap_err();
        assert_eq!(err, PlayerPoolError::Pool(PoolError::Exhausted { capacity: 1 }));
    }

    #[test]
    fn test_remove_unknown_player() {
        let mut pool = PlayerPool::new(2);
        assert!(pool.remove(SlotIndex(1), DisconnectReason::Quit).is_err());
        assert!(pool.remove(SlotIndex::NONE, DisconnectReason::Quit).is_err());
    }

    #[test]
    fn test_remove_frees_slot() {
        let mut pool = PlayerPool::new(2);
        let index = pool
            .admit(addr(1), Box::new(Inbox::new().transport()), &[])
            .unwrap();
        pool.remove(index, DisconnectReason::Timeout).unwrap();
        assert!(!pool.valid(index));
        assert!(pool.is_empty());
        assert!(pool.remove(index, DisconnectReason::Timeout).is_err());
    }

    #[test]
    fn test_remove_while_externally_locked() {
        let mut pool = PlayerPool::new(2);
        let index = pool
            .admit(addr(1), Box::new(Inbox::new().transport()), &[])
            .unwrap();
        pool.lock(index).unwrap();
        pool.remove(index, DisconnectReason::Kicked).unwrap();

        assert!(pool.valid(index), "external lock keeps the player alive");
        assert!(pool.remove(index, DisconnectReason::Kicked).is_err());
        assert!(pool.unlock(index).unwrap().is_some());
        assert!(!pool.valid(index));
    }

    #[test]
    fn test_shutdown() {
        let mut pool = PlayerPool::new(3);
        for port in 1..=3 {
            pool.admit(addr(port), Box::new(Inbox::new().transport()), &[])
                .unwrap();
        }
        assert_eq!(pool.shutdown(), 3);
        assert!(pool.is_empty());
    }

    impl PlayerPool {
        fn lock_count_of(&self, index: SlotIndex) -> Option<u32> {
            self.players.lock_count(index)
        }
    }
}
