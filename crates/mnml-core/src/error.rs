//! Error types for the core state machines.

use mnml_proto::ProtocolError;
use thiserror::Error;

use crate::connection::ConnectionState;

/// Errors from building or parsing messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Outbound payload requested before the server assigned a session.
    #[error("no active session")]
    NoActiveSession,

    /// Inbound payload could not be parsed. The event is discarded.
    #[error(transparent)]
    MalformedPayload(ProtocolError),

    /// Outbound payload could not be serialized.
    #[error(transparent)]
    Encode(ProtocolError),
}

/// Errors from the connection state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    /// Lifecycle event does not apply to the current state.
    #[error("unexpected {event} while {state:?}")]
    UnexpectedEvent {
        /// State when the event arrived
        state: ConnectionState,
        /// Lifecycle event name
        event: &'static str,
    },

    /// Reconnect activity after the attempt ceiling was reached.
    #[error("reconnection exhausted: attempt {attempt} of {ceiling}")]
    ReconnectionExhausted {
        /// Attempt number reported by the transport
        attempt: u32,
        /// Configured ceiling
        ceiling: u32,
    },
}
