//! Protocol error types.

use thiserror::Error;

/// Result alias for wire operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while encoding or decoding wire payloads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Inbound payload did not parse as the structure expected for its event.
    #[error("malformed {event} payload: {reason}")]
    MalformedPayload {
        /// Event the payload arrived on.
        event: &'static str,
        /// Parser diagnostic.
        reason: String,
    },

    /// Event name is not part of the protocol vocabulary.
    #[error("unknown event name: {name}")]
    UnknownEvent {
        /// The name as received.
        name: String,
    },

    /// Outbound value could not be serialized.
    #[error("failed to encode {event} payload: {reason}")]
    Encode {
        /// Event the payload was destined for.
        event: &'static str,
        /// Serializer diagnostic.
        reason: String,
    },
}

impl ProtocolError {
    pub(crate) fn malformed(event: &'static str, err: &serde_json::Error) -> Self {
        Self::MalformedPayload { event, reason: err.to_string() }
    }

    pub(crate) fn encode(event: &'static str, err: &serde_json::Error) -> Self {
        Self::Encode { event, reason: err.to_string() }
    }
}
