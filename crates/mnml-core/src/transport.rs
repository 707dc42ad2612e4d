//! Events delivered by the relay transport.
//!
//! The transport is a reconnecting bidirectional channel of named events with
//! at-least-once delivery. Its lifecycle callbacks and named events arrive
//! here as one enum so the runtime can feed them to the state machines in
//! order.

use std::str::FromStr;

/// Something the transport reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Connection established (first or resumed)
    Connect,
    /// Connection dropped
    Disconnect,
    /// About to make reconnect attempt number N, counted from 1
    ReconnectAttempt(u32),
    /// Reconnect succeeded
    Reconnect,
    /// Named application event from the server
    Inbound {
        /// Event name as sent by the server
        name: String,
        /// Serialized payload
        payload: String,
    },
}

impl TransportEvent {
    /// Classify a raw `(name, payload)` pair from a transport callback.
    ///
    /// Lifecycle names (`connect`, `disconnect`, `reconnect_attempt`,
    /// `reconnect`) map to their variants; everything else is
    /// [`TransportEvent::Inbound`]. A `reconnect_attempt` whose payload is not
    /// a number is treated as inbound noise.
    pub fn from_raw(name: &str, payload: &str) -> Self {
        match name {
            "connect" => Self::Connect,
            "disconnect" => Self::Disconnect,
            "reconnect" => Self::Reconnect,
            "reconnect_attempt" => match u32::from_str(payload.trim()) {
                Ok(attempt) => Self::ReconnectAttempt(attempt),
                Err(_) => Self::inbound(name, payload),
            },
            _ => Self::inbound(name, payload),
        }
    }

    /// Named application event.
    pub fn inbound(name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::Inbound { name: name.into(), payload: payload.into() }
    }
}
