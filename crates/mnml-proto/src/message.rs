//! Chat and presence payloads.

use serde::{Deserialize, Serialize};

use crate::{
    errors::{ProtocolError, Result},
    events::EventName,
    ids::{ClientId, SessionId},
};

/// Message as it travels over the relay.
///
/// Presence payloads (`client:typing`, `client:idle`) reuse this shape with
/// `body` left out entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMessage {
    /// Message text; absent for presence signals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Author of the message.
    pub sender_id: ClientId,
    /// Session the author was connected under.
    pub session_id: SessionId,
}

impl WireMessage {
    /// Serialize for the given outbound event.
    pub fn encode(&self, event: EventName) -> Result<String> {
        serde_json::to_string(self).map_err(|err| ProtocolError::encode(event.as_str(), &err))
    }

    /// Parse a payload received on the given event.
    pub fn decode(event: EventName, payload: &str) -> Result<Self> {
        serde_json::from_str(payload).map_err(|err| ProtocolError::malformed(event.as_str(), &err))
    }
}
