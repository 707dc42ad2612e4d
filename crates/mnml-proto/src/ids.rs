//! Identity types assigned by the relay server.
//!
//! Both identifiers are opaque to the widget. They are compared for equality
//! and echoed back on every outbound payload, nothing more.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    errors::{ProtocolError, Result},
    events::EventName,
};

/// Identifies one connection lifetime on the relay.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap a raw session identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies a participant (the local widget or a remote peer).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    /// Wrap a raw client identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Nested client object inside a session payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRef {
    /// Local client identifier.
    pub id: ClientId,
}

/// Session identity pushed by the server on `server:session`.
///
/// Wire shape: `{"id": "...", "client": {"id": "..."}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Session identifier.
    pub id: SessionId,
    /// The local client as seen by the server.
    pub client: ClientRef,
}

impl Session {
    /// Build a session from its two identifiers.
    pub fn new(id: SessionId, client_id: ClientId) -> Self {
        Self { id, client: ClientRef { id: client_id } }
    }

    /// Local client identifier.
    pub fn client_id(&self) -> &ClientId {
        &self.client.id
    }

    /// Parse a `server:session` payload.
    pub fn decode(payload: &str) -> Result<Self> {
        serde_json::from_str(payload)
            .map_err(|err| ProtocolError::malformed(EventName::ServerSession.as_str(), &err))
    }

    /// Serialize to the `server:session` wire shape.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|err| ProtocolError::encode(EventName::ServerSession.as_str(), &err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_session() {
        let session = Session::decode(r#"{"id":"s-1","client":{"id":"c-9"}}"#).unwrap();
        assert_eq!(session.id, SessionId::new("s-1"));
        assert_eq!(session.client_id(), &ClientId::new("c-9"));
    }

    #[test]
    fn decode_ignores_unknown_fields() {
        let session =
            Session::decode(r#"{"id":"s-1","client":{"id":"c-9","name":"x"},"room":3}"#).unwrap();
        assert_eq!(session.id.as_str(), "s-1");
    }

    #[test]
    fn decode_rejects_missing_client() {
        let err = Session::decode(r#"{"id":"s-1"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedPayload { event: "server:session", .. }));
    }

    #[test]
    fn decode_rejects_non_json() {
        assert!(Session::decode("not json").is_err());
    }

    #[test]
    fn encode_snapshot() {
        let session = Session::new(SessionId::new("s-1"), ClientId::new("c-9"));
        insta::assert_snapshot!(session.encode().unwrap(), @r#"{"id":"s-1","client":{"id":"c-9"}}"#);
    }
}
