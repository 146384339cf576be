//! # Player
//!
//! Identity and session data of one connected player.

use std::borrow::Cow;
use std::fmt;
use std::net::SocketAddr;

use warden_core::SlotIndex;

use crate::protocol::PlayerJoinRequest;
use crate::transport::{Transport, TransportError};

/// A connected player.
///
/// Lives in a slot of the [`PlayerPool`](super::PlayerPool); its id is that slot's
/// index for as long as the connection lasts.
#[derive(Default)]
pub struct Player {
    index: SlotIndex,
    address: Option<SocketAddr>,
    transport: Option<Box<dyn Transport>>,
    version: u32,
    modded: u8,
    name: Vec<u8>,
    challenge_response: u32,
    key: Vec<u8>,
    version_string: Vec<u8>,
    position: [f32; 3],
    rotation: [f32; 4],
}

impl Player {
    /// Creates a blank player for `index`.
    #[must_use]
    pub fn new(index: SlotIndex) -> Self {
        Self {
            index,
            rotation: [1.0, 0.0, 0.0, 0.0],
            ..Self::default()
        }
    }

    /// Pool index, which doubles as the player id.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> SlotIndex {
        self.index
    }

    /// Attaches the network side of the player.
    pub fn set_network_data(&mut self, address: SocketAddr, transport: Box<dyn Transport>) {
        self.address = Some(address);
        self.transport = Some(transport);
    }

    /// Client address, once attached.
    #[must_use]
    pub const fn address(&self) -> Option<SocketAddr> {
        self.address
    }

    /// Sends one message to this player.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::NotConnected`] without a transport, or whatever the
    /// transport reports.
    pub fn send_message(&mut self, opcode: u8, payload: &[u8]) -> Result<(), TransportError> {
        self.transport
            .as_mut()
            .ok_or(TransportError::NotConnected)?
            .send_message(opcode, payload)
    }

    /// Copies the identity fields of a decoded join payload.
    pub fn apply_join(&mut self, join: PlayerJoinRequest) {
        self.version = join.version;
        self.modded = join.modded;
        self.name = join.name;
        self.challenge_response = join.challenge_response;
        self.key = join.key;
        self.version_string = join.version_string;
    }

    /// Client protocol version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Non-zero for modified clients.
    #[must_use]
    pub const fn modded(&self) -> u8 {
        self.modded
    }

    /// Display name, raw bytes as received.
    #[must_use]
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// Display name for logs.
    #[must_use]
    pub fn name_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    /// Answer to the connection challenge.
    #[must_use]
    pub const fn challenge_response(&self) -> u32 {
        self.challenge_response
    }

    /// Authentication key.
    #[must_use]
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Human-readable client version.
    #[must_use]
    pub fn version_string(&self) -> &[u8] {
        &self.version_string
    }

    /// World position.
    #[must_use]
    pub const fn position(&self) -> [f32; 3] {
        self.position
    }

    /// Moves the player.
    pub fn set_position(&mut self, position: [f32; 3]) {
        self.position = position;
    }

    /// Orientation quaternion (w, x, y, z).
    #[must_use]
    pub const fn rotation(&self) -> [f32; 4] {
        self.rotation
    }

    /// Turns the player.
    pub fn set_rotation(&mut self, rotation: [f32; 4]) {
        self.rotation = rotation;
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("index", &self.index)
            .field("address", &self.address)
            .field("name", &self.name_lossy())
            .field("version", &self.version)
            .field("connected", &self.transport.is_some())
            .finish_non_exhaustive()
    }
}
