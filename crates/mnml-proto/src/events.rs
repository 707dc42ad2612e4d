//! Named events carried by the relay transport.

use std::{fmt, str::FromStr};

use crate::errors::ProtocolError;

/// Which side of the connection originates an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Server to widget.
    Inbound,
    /// Widget to server.
    Outbound,
}

/// Application-level event names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    /// Server assigns the session identity right after connect.
    ServerSession,
    /// Chat message authored locally.
    ClientMessage,
    /// Chat message relayed from another participant.
    ServerMessage,
    /// Local user started typing.
    ClientTyping,
    /// Local user stopped typing.
    ClientIdle,
}

impl EventName {
    /// All protocol events, inbound first.
    pub const ALL: [Self; 5] = [
        Self::ServerSession,
        Self::ServerMessage,
        Self::ClientMessage,
        Self::ClientTyping,
        Self::ClientIdle,
    ];

    /// Name as it appears on the transport.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ServerSession => "server:session",
            Self::ClientMessage => "client:message",
            Self::ServerMessage => "server:message",
            Self::ClientTyping => "client:typing",
            Self::ClientIdle => "client:idle",
        }
    }

    /// Direction of travel for this event.
    pub const fn direction(self) -> Direction {
        match self {
            Self::ServerSession | Self::ServerMessage => Direction::Inbound,
            Self::ClientMessage | Self::ClientTyping | Self::ClientIdle => Direction::Outbound,
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventName {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| ProtocolError::UnknownEvent { name: s.to_string() })
    }
}

/// A serialized event ready to hand to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEvent {
    /// Event name.
    pub name: EventName,
    /// JSON payload.
    pub payload: String,
}

impl OutboundEvent {
    /// Pair an event name with its serialized payload.
    pub fn new(name: EventName, payload: impl Into<String>) -> Self {
        Self { name, payload: payload.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for event in EventName::ALL {
            assert_eq!(event.as_str().parse::<EventName>().unwrap(), event);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "server:bogus".parse::<EventName>().unwrap_err();
        assert_eq!(err, ProtocolError::UnknownEvent { name: "server:bogus".into() });
    }

    #[test]
    fn directions() {
        assert_eq!(EventName::ServerSession.direction(), Direction::Inbound);
        assert_eq!(EventName::ServerMessage.direction(), Direction::Inbound);
        assert_eq!(EventName::ClientMessage.direction(), Direction::Outbound);
        assert_eq!(EventName::ClientTyping.direction(), Direction::Outbound);
        assert_eq!(EventName::ClientIdle.direction(), Direction::Outbound);
    }
}
