#![no_main]

use std::time::Instant;

use libfuzzer_sys::fuzz_target;
use mnml_proto::{EventName, Session, WireMessage};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else { return };

    let _ = Session::decode(text);
    let _ = WireMessage::decode(EventName::ServerMessage, text);

    // Anything that decodes must re-encode and decode to the same message.
    if let Ok(message) = mnml_core::codec::from_wire(text, Instant::now()) {
        let wire = WireMessage {
            body: Some(message.body.clone()),
            sender_id: message.sender_id.clone(),
            session_id: message.session_id.clone(),
        };
        let encoded = wire.encode(EventName::ClientMessage).unwrap();
        let again = mnml_core::codec::from_wire(&encoded, message.timestamp).unwrap();
        assert_eq!(again, message);
    }
});
