//! # Wire Protocol
//!
//! Binary records exchanged with the transport.
//!
//! ## Record Layout
//!
//! ```text
//! ┌────────┬────────┬────────┬────────┬───────────────────────────┐
//! │ UINT8  │ UINT16 │ UINT32 │ INT32  │ DYNAMIC_LEN_STR_8         │
//! │ 1 byte │ 2 LE   │ 4 LE   │ 4 LE   │ len (1) + len raw bytes   │
//! └────────┴────────┴────────┴────────┴───────────────────────────┘
//! ```
//!
//! A record is a fixed, ordered list of such fields with no framing of its own.

mod records;
mod wire;

pub use records::{DisconnectReason, PlayerJoinNotice, PlayerJoinRequest, PlayerQuitNotice};
pub use wire::{FieldKind, FieldValue, RecordFields, WireError, WireReader, WireWriter, MAX_STR8_LEN};
