//! # Lifecycle Records
//!
//! The three records exchanged around a player's join and quit.

use super::wire::{FieldKind, RecordFields, WireError, WireReader, WireWriter};

/// Why a player left.
///
/// The wire carries a plain `UINT8`; codes without a named variant travel as
/// [`Other`](Self::Other).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DisconnectReason {
    /// The connection stopped responding.
    Timeout,
    /// The client left on its own.
    Quit,
    /// The server removed the player.
    Kicked,
    /// Any other caller-supplied code.
    Other(u8),
}

impl DisconnectReason {
    /// Wire code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Timeout => 0,
            Self::Quit => 1,
            Self::Kicked => 2,
            Self::Other(code) => code,
        }
    }

    /// Parses a wire code. Every code is accepted.
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Timeout,
            1 => Self::Quit,
            2 => Self::Kicked,
            code => Self::Other(code),
        }
    }
}

impl From<u8> for DisconnectReason {
    fn from(code: u8) -> Self {
        Self::from_code(code)
    }
}

/// Join payload sent by a connecting client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerJoinRequest {
    /// Client protocol version.
    pub version: u32,
    /// Non-zero when the client runs modifications.
    pub modded: u8,
    /// Requested display name, raw bytes.
    pub name: Vec<u8>,
    /// Answer to the connection challenge.
    pub challenge_response: u32,
    /// Authentication key.
    pub key: Vec<u8>,
    /// Human-readable client version.
    pub version_string: Vec<u8>,
}

impl PlayerJoinRequest {
    /// Field order on the wire.
    pub const SCHEMA: [FieldKind; 6] = [
        FieldKind::U32,
        FieldKind::U8,
        FieldKind::DynamicLenStr8,
        FieldKind::U32,
        FieldKind::DynamicLenStr8,
        FieldKind::DynamicLenStr8,
    ];

    /// Decodes a join payload. Nothing is produced unless every field is present.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Truncated`] for a short payload.
    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut fields = RecordFields::new(WireReader::new(bytes).read_record(&Self::SCHEMA)?);
        Ok(Self {
            version: fields.u32()?,
            modded: fields.u8()?,
            name: fields.str8()?,
            challenge_response: fields.u32()?,
            key: fields.str8()?,
            version_string: fields.str8()?,
        })
    }

    /// Encodes the payload as a client would send it.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::StringTooLong`] if a string exceeds 255 bytes.
    pub fn encode(&self) -> Result<Vec<u8>, WireError> {
        let mut writer = WireWriter::with_capacity(
            12 + self.name.len() + self.key.len() + self.version_string.len(),
        );
        writer.write_u32(self.version);
        writer.write_u8(self.modded);
        writer.write_str8(&self.name)?;
        writer.write_u32(self.challenge_response);
        writer.write_str8(&self.key)?;
        writer.write_str8(&self.version_string)?;
        Ok(writer.into_bytes())
    }
}

/// Announcement of a new player, sent to everyone else (opcode 137).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerJoinNotice {
    /// Pool index of the new player.
    pub player: u16,
    /// Nametag colour, RGBA.
    pub colour: i32,
    /// True for server-side bots.
    pub is_npc: bool,
    /// Display name, raw bytes.
    pub name: Vec<u8>,
}

impl PlayerJoinNotice {
    /// Field order on the wire.
    pub const SCHEMA: [FieldKind; 4] = [
        FieldKind::U16,
        FieldKind::I32,
        FieldKind::U8,
        FieldKind::DynamicLenStr8,
    ];

    /// Encodes the notice.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::StringTooLong`] if the name exceeds 255 bytes.
    pub fn encode(&self) -> Result<Vec<u8>, WireError> {
        let mut writer = WireWriter::with_capacity(8 + self.name.len());
        writer.write_u16(self.player);
        writer.write_i32(self.colour);
        writer.write_u8(u8::from(self.is_npc));
        writer.write_str8(&self.name)?;
        Ok(writer.into_bytes())
    }

    /// Decodes a notice as a client would.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Truncated`] for a short payload.
    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut fields = RecordFields::new(WireReader::new(bytes).read_record(&Self::SCHEMA)?);
        Ok(Self {
            player: fields.u16()?,
            colour: fields.i32()?,
            is_npc: fields.u8()? != 0,
            name: fields.str8()?,
        })
    }
}

/// Announcement of a departed player (opcode 138).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerQuitNotice {
    /// Pool index of the departed player.
    pub player: u16,
    /// Why they left.
    pub reason: DisconnectReason,
}

impl PlayerQuitNotice {
    /// Field order on the wire.
    pub const SCHEMA: [FieldKind; 2] = [FieldKind::U16, FieldKind::U8];

    /// Encodes the notice.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut writer = WireWriter::with_capacity(3);
        writer.write_u16(self.player);
        writer.write_u8(self.reason.code());
        writer.into_bytes()
    }

    /// Decodes a notice as a client would.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Truncated`] for a short payload.
    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut fields = RecordFields::new(WireReader::new(bytes).read_record(&Self::SCHEMA)?);
        Ok(Self {
            player: fields.u16()?,
            reason: DisconnectReason::from_code(fields.u8()?),
        })
    }
}
