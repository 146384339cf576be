//! # Transport Layer
//!
//! The player pool only needs one thing from the network: "send message with opcode O
//! to this peer". Delivery order and reliability belong to the implementation.
//!
//! ## Implementations
//!
//! - [`ChannelTransport`] hands messages to an I/O thread over a bounded channel
//! - [`LoopbackTransport`] keeps them in memory, for in-process bots and tools

use std::net::SocketAddr;
use std::sync::Arc;

use crossbeam_channel::{Sender, TrySendError};
use parking_lot::Mutex;
use thiserror::Error;

/// Errors reported by a transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The player has no transport attached.
    #[error("no transport attached")]
    NotConnected,

    /// The outbound queue is full; the message was dropped.
    #[error("outbound queue full for {peer}")]
    QueueFull {
        /// Intended recipient.
        peer: SocketAddr,
    },

    /// The I/O side has gone away.
    #[error("transport to {peer} closed")]
    Closed {
        /// Intended recipient.
        peer: SocketAddr,
    },
}

/// Per-peer message sink.
///
/// `Send` so a transport can be created on an I/O thread and moved to the pool owner.
pub trait Transport: Send {
    /// Sends one message to the peer behind this transport.
    ///
    /// # Errors
    ///
    /// Implementations report messages they could not queue.
    fn send_message(&mut self, opcode: u8, payload: &[u8]) -> Result<(), TransportError>;
}

/// A message leaving the pool owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Recipient.
    pub peer: SocketAddr,
    /// RPC id.
    pub opcode: u8,
    /// Encoded record.
    pub payload: Vec<u8>,
}

/// Transport that forwards messages to an I/O thread.
#[derive(Clone, Debug)]
pub struct ChannelTransport {
    peer: SocketAddr,
    outbound: Sender<OutboundMessage>,
}

impl ChannelTransport {
    /// Creates a transport for `peer` feeding `outbound`.
    #[must_use]
    pub const fn new(peer: SocketAddr, outbound: Sender<OutboundMessage>) -> Self {
        Self { peer, outbound }
    }

    /// The peer this transport writes to.
    #[must_use]
    pub const fn peer(&self) -> SocketAddr {
        self.peer
    }
}

impl Transport for ChannelTransport {
    fn send_message(&mut self, opcode: u8, payload: &[u8]) -> Result<(), TransportError> {
        let message = OutboundMessage {
            peer: self.peer,
            opcode,
            payload: payload.to_vec(),
        };
        self.outbound.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => TransportError::QueueFull { peer: self.peer },
            TrySendError::Disconnected(_) => TransportError::Closed { peer: self.peer },
        })
    }
}

/// Shared view of what a [`LoopbackTransport`] received.
#[derive(Clone, Debug, Default)]
pub struct Inbox {
    messages: Arc<Mutex<Vec<(u8, Vec<u8>)>>>,
}

impl Inbox {
    /// Creates an empty inbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every message received so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<(u8, Vec<u8>)> {
        self.messages.lock().clone()
    }

    /// Removes and returns every message received so far.
    pub fn drain(&self) -> Vec<(u8, Vec<u8>)> {
        std::mem::take(&mut *self.messages.lock())
    }

    /// Number of messages waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    /// Returns true if nothing was received.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    /// A transport delivering into this inbox.
    #[must_use]
    pub fn transport(&self) -> LoopbackTransport {
        LoopbackTransport {
            inbox: self.clone(),
        }
    }
}

/// In-memory transport; every message lands in an [`Inbox`].
#[derive(Clone, Debug)]
pub struct LoopbackTransport {
    inbox: Inbox,
}

impl Transport for LoopbackTransport {
    fn send_message(&mut self, opcode: u8, payload: &[u8]) -> Result<(), TransportError> {
        self.inbox.messages.lock().push((opcode, payload.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    fn addr() -> SocketAddr {
        "127.0.0.1:7777".parse().unwrap()
    }

    #[test]
    fn test_channel_transport_forwards() {
        let (tx, rx) = bounded(4);
        let mut transport = ChannelTransport::new(addr(), tx);
        transport.send_message(138, &[1, 0, 1]).unwrap();

        let message = rx.try_recv().unwrap();
        assert_eq!(message.peer, addr());
        assert_eq!(message.opcode, 138);
        assert_eq!(message.payload, vec![1, 0, 1]);
    }

    #[test]
    fn test_channel_transport_full_and_closed() {
        let (tx, rx) = bounded(1);
        let mut transport = ChannelTransport::new(addr(), tx);
        transport.send_message(1, &[]).unwrap();
        assert_eq!(
            transport.send_message(2, &[]),
            Err(TransportError::QueueFull { peer: addr() })
        );

        drop(rx);
        assert_eq!(
            transport.send_message(3, &[]),
            Err(TransportError::Closed { peer: addr() })
        );
    }

    #[test]
    fn test_loopback_inbox() {
        let inbox = Inbox::new();
        let mut transport = inbox.transport();
        transport.send_message(137, b"x").unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox.drain(), vec![(137, b"x".to_vec())]);
        assert!(inbox.is_empty());
    }
}
