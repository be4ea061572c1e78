//! Duplex channel to the broadcast hub.
//!
//! The hub relays every message a participant sends to all other
//! participants. Delivery is fire-and-forget: no acknowledgements, no
//! retries, no reconnects.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod native;

#[cfg(target_arch = "wasm32")]
mod wasm;

pub use memory::{MemoryHub, MemoryTransport, OfflineTransport};

#[cfg(not(target_arch = "wasm32"))]
pub use native::NativeWebSocket;

#[cfg(target_arch = "wasm32")]
pub use wasm::WasmWebSocket;

use crate::error::SyncError;
use crate::protocol::{self, DrawEvent};
use thiserror::Error;

/// Platform-specific WebSocket transport type.
#[cfg(target_arch = "wasm32")]
pub type PlatformWebSocket = WasmWebSocket;

#[cfg(not(target_arch = "wasm32"))]
pub type PlatformWebSocket = NativeWebSocket;

/// Connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

/// Something that happened on a transport since the last poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Opened,
    Message(String),
    Closed,
    Error(String),
}

/// Transport-level failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Not connected")]
    NotConnected,
    #[error("Already connected")]
    AlreadyConnected,
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Send failed: {0}")]
    Send(String),
}

/// A text-message pipe to the hub.
///
/// Implementations never block: `send` queues or writes immediately and
/// `poll` drains whatever has arrived.
pub trait Transport {
    /// Transmit one text message.
    fn send(&mut self, text: &str) -> Result<(), TransportError>;

    /// Drain pending events (non-blocking).
    fn poll(&mut self) -> Vec<TransportEvent>;

    /// Close the connection. Later sends fail.
    fn close(&mut self);
}

/// Encodes outbound events and decodes inbound ones over a [`Transport`].
pub struct SyncChannel<T: Transport> {
    transport: T,
    state: ConnectionState,
    dropped: u64,
}

impl<T: Transport> SyncChannel<T> {
    /// Wrap a transport whose connection is being established.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: ConnectionState::Connecting,
            dropped: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// Number of outbound events dropped because the channel was not open.
    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Send an event now. While the channel is not open the event is
    /// dropped and [`SyncError::ConnectionUnavailable`] returned.
    pub fn send(&mut self, event: &DrawEvent) -> Result<(), SyncError> {
        if self.state != ConnectionState::Open {
            self.dropped += 1;
            log::debug!("Channel {:?}, dropping {:?}", self.state, event);
            return Err(SyncError::ConnectionUnavailable);
        }

        let text = match protocol::encode(event) {
            Ok(text) => text,
            Err(e) => {
                log::error!("Failed to encode {:?}: {}", event, e);
                return Err(SyncError::MalformedMessage(e.to_string()));
            }
        };

        if let Err(e) = self.transport.send(&text) {
            log::warn!("Send failed, closing channel: {}", e);
            self.state = ConnectionState::Closed;
            self.dropped += 1;
            return Err(SyncError::ConnectionUnavailable);
        }
        Ok(())
    }

    /// Drain the transport and return decoded events in receipt order.
    ///
    /// Malformed and unrecognized messages are discarded.
    pub fn poll(&mut self) -> Vec<DrawEvent> {
        let mut events = Vec::new();
        for event in self.transport.poll() {
            match event {
                TransportEvent::Opened => {
                    log::info!("Sync channel open");
                    self.state = ConnectionState::Open;
                }
                TransportEvent::Closed => {
                    log::info!("Sync channel closed");
                    self.state = ConnectionState::Closed;
                }
                TransportEvent::Error(message) => {
                    log::warn!("Sync channel error: {}", message);
                    self.state = ConnectionState::Closed;
                }
                TransportEvent::Message(text) => match protocol::decode(&text) {
                    Ok(event) => events.push(event),
                    Err(e) => {
                        let preview: String = text.chars().take(100).collect();
                        log::warn!("Discarding message: {} ({})", preview, e);
                    }
                },
            }
        }
        events
    }

    /// Close the connection; subsequent sends are dropped.
    pub fn close(&mut self) {
        self.transport.close();
        self.state = ConnectionState::Closed;
    }
}
