//! Message codec.
//!
//! Converts between the client-side [`Message`] and the relay's
//! [`WireMessage`], stamping sender and session identity on the way out.

use std::time::Instant;

use mnml_proto::{ClientId, EventName, OutboundEvent, ProtocolError, Session, SessionId, WireMessage};

use crate::{
    error::CodecError,
    message::{Message, Origin},
    typing::PresenceSignal,
};

/// Build the wire form of a message or presence signal.
///
/// `body` of `None` builds a presence payload: identity stamps only.
///
/// # Errors
///
/// [`CodecError::NoActiveSession`] if `session_id` is absent.
pub fn to_wire(
    body: Option<&str>,
    client_id: &ClientId,
    session_id: Option<&SessionId>,
) -> Result<WireMessage, CodecError> {
    let session_id = session_id.ok_or(CodecError::NoActiveSession)?;
    Ok(WireMessage {
        body: body.map(str::to_string),
        sender_id: client_id.clone(),
        session_id: session_id.clone(),
    })
}

/// Parse a `server:message` payload into a remote [`Message`].
///
/// `received_at` becomes the message timestamp.
///
/// # Errors
///
/// [`CodecError::MalformedPayload`] if the payload is not a JSON chat message
/// or carries no body.
pub fn from_wire(payload: &str, received_at: Instant) -> Result<Message, CodecError> {
    let wire =
        WireMessage::decode(EventName::ServerMessage, payload).map_err(CodecError::MalformedPayload)?;

    let Some(body) = wire.body else {
        return Err(CodecError::MalformedPayload(ProtocolError::MalformedPayload {
            event: EventName::ServerMessage.as_str(),
            reason: "missing body".to_string(),
        }));
    };

    Ok(Message {
        body,
        sender_id: wire.sender_id,
        session_id: wire.session_id,
        timestamp: received_at,
        origin: Origin::Remote,
    })
}

/// Encode a locally authored message as a `client:message` event.
pub fn encode_message(message: &Message) -> Result<OutboundEvent, CodecError> {
    let wire = to_wire(Some(&message.body), &message.sender_id, Some(&message.session_id))?;
    let payload = wire.encode(EventName::ClientMessage).map_err(CodecError::Encode)?;
    Ok(OutboundEvent::new(EventName::ClientMessage, payload))
}

/// Encode a presence signal for the current session.
pub fn encode_presence(
    signal: PresenceSignal,
    session: Option<&Session>,
) -> Result<OutboundEvent, CodecError> {
    let session = session.ok_or(CodecError::NoActiveSession)?;
    let event = signal.event_name();
    let wire = to_wire(None, session.client_id(), Some(&session.id))?;
    let payload = wire.encode(event).map_err(CodecError::Encode)?;
    Ok(OutboundEvent::new(event, payload))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::message::Delivery;

    fn ids() -> (ClientId, SessionId) {
        (ClientId::new("c-1"), SessionId::new("s-1"))
    }

    #[test]
    fn to_wire_requires_session() {
        let (client, _) = ids();
        assert_eq!(to_wire(Some("hi"), &client, None), Err(CodecError::NoActiveSession));
    }

    #[test]
    fn presence_payload_has_no_body() {
        let (client, session) = ids();
        let wire = to_wire(None, &client, Some(&session)).unwrap();
        assert_eq!(wire.body, None);
        assert_eq!(wire.sender_id, client);
        assert_eq!(wire.session_id, session);
    }

    #[test]
    fn from_wire_rejects_garbage() {
        let err = from_wire("{not json", Instant::now()).unwrap_err();
        assert!(matches!(err, CodecError::MalformedPayload(_)));
    }

    #[test]
    fn from_wire_rejects_bodyless_payload() {
        let err = from_wire(r#"{"senderId":"a","sessionId":"b"}"#, Instant::now()).unwrap_err();
        assert!(matches!(err, CodecError::MalformedPayload(_)));
    }

    #[test]
    fn from_wire_stamps_receipt_time() {
        let t0 = Instant::now();
        let msg = from_wire(r#"{"body":"yo","senderId":"a","sessionId":"b"}"#, t0).unwrap();
        assert_eq!(msg.timestamp, t0);
        assert_eq!(msg.origin, Origin::Remote);
        assert_eq!(msg.body, "yo");
    }

    #[test]
    fn encode_message_uses_client_message_event() {
        let (client, session) = ids();
        let msg = Message {
            body: "hello".into(),
            sender_id: client,
            session_id: session,
            timestamp: Instant::now(),
            origin: Origin::Local(Delivery::Sent),
        };
        let event = encode_message(&msg).unwrap();
        assert_eq!(event.name, EventName::ClientMessage);
        assert_eq!(event.payload, r#"{"body":"hello","senderId":"c-1","sessionId":"s-1"}"#);
    }

    #[test]
    fn encode_presence_requires_session() {
        assert_eq!(encode_presence(PresenceSignal::Typing, None), Err(CodecError::NoActiveSession));
    }

    #[test]
    fn encode_presence_picks_event_name() {
        let (client, session) = ids();
        let session = Session::new(session, client);
        let typing = encode_presence(PresenceSignal::Typing, Some(&session)).unwrap();
        let idle = encode_presence(PresenceSignal::Idle, Some(&session)).unwrap();
        assert_eq!(typing.name, EventName::ClientTyping);
        assert_eq!(idle.name, EventName::ClientIdle);
        assert_eq!(typing.payload, r#"{"senderId":"c-1","sessionId":"s-1"}"#);
    }

    proptest! {
        #[test]
        fn round_trip(body in ".*", client in "[a-z0-9-]{1,12}", session in "[a-z0-9-]{1,12}") {
            let client = ClientId::new(client);
            let session = SessionId::new(session);
            let payload = to_wire(Some(&body), &client, Some(&session))
                .unwrap()
                .encode(EventName::ClientMessage)
                .unwrap();

            let msg = from_wire(&payload, Instant::now()).unwrap();
            prop_assert_eq!(msg.body, body);
            prop_assert_eq!(msg.sender_id, client);
            prop_assert_eq!(msg.session_id, session);
        }
    }
}
