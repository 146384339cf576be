//! Player lifecycle observers.

use warden_core::{SlotIndex, SlotPool};

use super::player::Player;
use crate::protocol::DisconnectReason;

/// Observer of player joins and quits.
///
/// Handlers run synchronously, in registration order, after the pool's own
/// broadcast. The subject player is locked for the whole dispatch: a handler may
/// release it (or any other player) and later handlers still find it in `players`.
/// Handlers own their failures; nothing propagates back to the pool.
pub trait PlayerEventHandler {
    /// A player was admitted. `inbound` is the raw join payload.
    fn on_connect(&mut self, players: &mut SlotPool<Player>, player: SlotIndex, inbound: &[u8]) {
        let _ = (players, player, inbound);
    }

    /// A player is being removed.
    fn on_disconnect(
        &mut self,
        players: &mut SlotPool<Player>,
        player: SlotIndex,
        reason: DisconnectReason,
    ) {
        let _ = (players, player, reason);
    }
}
