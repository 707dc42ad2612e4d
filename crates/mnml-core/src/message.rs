//! Client-side message representation.

use std::time::Instant;

use mnml_proto::{ClientId, SessionId};

/// How a locally authored message was handed to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Handed over while the connection was live.
    Sent,
    /// Handed over while connecting or offline; the transport buffers it.
    Queued,
}

/// Where a message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Typed by the local user.
    Local(Delivery),
    /// Relayed by the server.
    Remote,
}

/// A chat message in the client log.
///
/// Messages are immutable once created. The log only ever appends them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message text.
    pub body: String,
    /// Author.
    pub sender_id: ClientId,
    /// Session the author was connected under.
    pub session_id: SessionId,
    /// Local creation or receipt time.
    pub timestamp: Instant,
    /// Local or relayed.
    pub origin: Origin,
}

impl Message {
    /// True if the local user authored this message.
    pub fn is_local(&self) -> bool {
        matches!(self.origin, Origin::Local(_))
    }
}
