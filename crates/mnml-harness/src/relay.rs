//! In-memory relay server.
//!
//! Plays the server side for several [`App`]s without any runtime: assigns
//! sessions on join, fans `client:message` out to every other member as
//! `server:message`, and tracks who is typing from presence events.

use std::{collections::BTreeSet, time::Instant};

use mnml_app::{App, AppAction, AppEvent};
use mnml_core::TransportEvent;
use mnml_proto::{ClientId, EventName, OutboundEvent, Session, SessionId, WireMessage};
use tracing::{debug, warn};

/// Simulated relay server.
#[derive(Debug, Default)]
pub struct Relay {
    members: Vec<Session>,
    typing: BTreeSet<ClientId>,
    relayed: usize,
}

impl Relay {
    /// Create an empty relay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect `app` and push its session. Returns the member index.
    ///
    /// Presence the app announces on receiving its session is recorded.
    pub fn join(&mut self, app: &mut App, now: Instant) -> usize {
        let index = self.members.len();
        let session =
            Session::new(SessionId::new(format!("s-{index}")), ClientId::new(format!("c-{index}")));

        app.handle(AppEvent::Transport(TransportEvent::Connect), now);
        let actions = match session.encode() {
            Ok(payload) => app.handle(
                AppEvent::Transport(TransportEvent::inbound(EventName::ServerSession.as_str(), payload)),
                now,
            ),
            Err(err) => {
                warn!(%err, "failed to encode session");
                Vec::new()
            },
        };

        self.members.push(session);
        for action in &actions {
            if let AppAction::Emit(event) = action {
                self.accept(index, event);
            }
        }
        index
    }

    /// Client id assigned to member `index`.
    pub fn client_id(&self, index: usize) -> Option<&ClientId> {
        self.members.get(index).map(Session::client_id)
    }

    /// Clients currently shown as typing.
    pub fn typing(&self) -> &BTreeSet<ClientId> {
        &self.typing
    }

    /// Number of chat messages relayed so far.
    pub fn relayed(&self) -> usize {
        self.relayed
    }

    /// Route everything member `from` emitted and deliver fan-out to `apps`.
    ///
    /// `apps[i]` must be member `i`.
    pub fn route(&mut self, apps: &mut [App], from: usize, actions: &[AppAction], now: Instant) {
        for action in actions {
            let AppAction::Emit(event) = action else { continue };
            for (to, delivery) in self.accept(from, event) {
                if let Some(app) = apps.get_mut(to) {
                    app.handle(AppEvent::Transport(delivery), now);
                }
            }
        }
    }

    fn accept(&mut self, from: usize, event: &OutboundEvent) -> Vec<(usize, TransportEvent)> {
        let Ok(wire) = WireMessage::decode(event.name, &event.payload) else {
            warn!(from, event = %event.name, "relay dropped malformed payload");
            return Vec::new();
        };

        match event.name {
            EventName::ClientTyping => {
                self.typing.insert(wire.sender_id);
                Vec::new()
            },
            EventName::ClientIdle => {
                self.typing.remove(&wire.sender_id);
                Vec::new()
            },
            EventName::ClientMessage => {
                self.relayed += 1;
                debug!(from, "relaying message");
                (0..self.members.len())
                    .filter(|to| *to != from)
                    .map(|to| {
                        (to, TransportEvent::inbound(EventName::ServerMessage.as_str(), &event.payload))
                    })
                    .collect()
            },
            EventName::ServerSession | EventName::ServerMessage => {
                warn!(from, event = %event.name, "client sent a server event");
                Vec::new()
            },
        }
    }
}
