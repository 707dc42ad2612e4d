//! Channel-backed driver for scenario tests.
//!
//! The test holds a [`SimHandle`] and plays both the UI and the transport:
//! every intent or transport callback becomes an [`AppEvent`] on an unbounded
//! channel. The [`SimDriver`] side records what the runtime emitted and how
//! the connection state evolved, and is handed back when the runtime exits.

use mnml_app::{App, AppEvent, Driver, Key, NetworkStatus};
use mnml_core::{ConnectionState, TransportEvent};
use mnml_proto::{ClientId, EventName, OutboundEvent, Session, SessionId, WireMessage};
use thiserror::Error;
use tokio::{sync::mpsc, time::Instant};
use tracing::warn;

/// Simulated driver failures.
#[derive(Debug, Error)]
pub enum SimError {
    /// Payload for a scripted event could not be built.
    #[error("failed to build scripted payload: {0}")]
    Script(#[from] mnml_proto::ProtocolError),
}

/// An event handed to the simulated transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEvent {
    /// Virtual time of the send.
    pub at: Instant,
    /// The event.
    pub event: OutboundEvent,
}

/// Test-side handle feeding the runtime.
#[derive(Debug, Clone)]
pub struct SimHandle {
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl SimHandle {
    /// Push a raw event. Logs if the runtime already exited.
    pub fn send(&self, event: AppEvent) {
        if self.tx.send(event).is_err() {
            warn!("runtime gone; scripted event dropped");
        }
    }

    /// Transport connected.
    pub fn connect(&self) {
        self.send(AppEvent::Transport(TransportEvent::Connect));
    }

    /// Transport dropped.
    pub fn disconnect(&self) {
        self.send(AppEvent::Transport(TransportEvent::Disconnect));
    }

    /// Transport is making reconnect attempt `attempt`.
    pub fn reconnect_attempt(&self, attempt: u32) {
        self.send(AppEvent::Transport(TransportEvent::ReconnectAttempt(attempt)));
    }

    /// Transport reconnected.
    pub fn reconnected(&self) {
        self.send(AppEvent::Transport(TransportEvent::Reconnect));
    }

    /// Server assigns a session.
    pub fn assign_session(&self, session_id: &str, client_id: &str) -> Result<(), SimError> {
        let session = Session::new(SessionId::new(session_id), ClientId::new(client_id));
        self.inbound(EventName::ServerSession, session.encode()?);
        Ok(())
    }

    /// Server relays a chat message.
    pub fn server_message(&self, sender: &str, body: &str) -> Result<(), SimError> {
        let wire = WireMessage {
            body: Some(body.to_string()),
            sender_id: ClientId::new(sender),
            session_id: SessionId::new("remote"),
        };
        self.inbound(EventName::ServerMessage, wire.encode(EventName::ServerMessage)?);
        Ok(())
    }

    /// Named event with an arbitrary payload.
    pub fn inbound(&self, name: EventName, payload: impl Into<String>) {
        self.send(AppEvent::Transport(TransportEvent::inbound(name.as_str(), payload)));
    }

    /// User types `text`: one key press per character, then the draft update.
    pub fn type_text(&self, text: &str) {
        for c in text.chars() {
            self.send(AppEvent::KeyPress(Key::Char(c)));
        }
        self.send(AppEvent::DraftChanged(text.to_string()));
    }

    /// User presses Enter and sends the draft.
    pub fn submit(&self) {
        self.send(AppEvent::KeyPress(Key::Enter));
        self.send(AppEvent::SendMessage);
    }
}

/// Recording driver.
#[derive(Debug)]
pub struct SimDriver {
    events: mpsc::UnboundedReceiver<AppEvent>,
    sent: Vec<SentEvent>,
    transitions: Vec<ConnectionState>,
    indicators: Vec<Option<&'static str>>,
    theme: Option<&'static str>,
    renders: usize,
    reconnecting_stopped: bool,
    stopped: bool,
}

/// Create a connected handle/driver pair.
pub fn sim_driver() -> (SimHandle, SimDriver) {
    let (tx, events) = mpsc::unbounded_channel();
    let driver = SimDriver {
        events,
        sent: Vec::new(),
        transitions: Vec::new(),
        indicators: Vec::new(),
        theme: None,
        renders: 0,
        reconnecting_stopped: false,
        stopped: false,
    };
    (SimHandle { tx }, driver)
}

impl SimDriver {
    /// Everything emitted, in order.
    pub fn sent(&self) -> &[SentEvent] {
        &self.sent
    }

    /// Names of emitted events, in order.
    pub fn sent_names(&self) -> Vec<EventName> {
        self.sent.iter().map(|s| s.event.name).collect()
    }

    /// Distinct connection states seen at render time, in order.
    pub fn transitions(&self) -> &[ConnectionState] {
        &self.transitions
    }

    /// Distinct network indicator labels seen at render time, in order.
    /// `None` means no indicator was shown.
    pub fn indicators(&self) -> &[Option<&'static str>] {
        &self.indicators
    }

    /// Theme name used by the most recent render.
    pub fn theme(&self) -> Option<&'static str> {
        self.theme
    }

    /// Number of renders.
    pub fn renders(&self) -> usize {
        self.renders
    }

    /// True if the runtime asked the transport to stop retrying.
    pub fn reconnecting_stopped(&self) -> bool {
        self.reconnecting_stopped
    }

    /// True once the runtime shut the driver down.
    pub fn stopped(&self) -> bool {
        self.stopped
    }
}

impl Driver for SimDriver {
    type Error = SimError;

    async fn next_event(&mut self) -> Option<AppEvent> {
        self.events.recv().await
    }

    async fn emit(&mut self, event: OutboundEvent) -> Result<(), Self::Error> {
        self.sent.push(SentEvent { at: Instant::now(), event });
        Ok(())
    }

    fn stop_reconnecting(&mut self) {
        self.reconnecting_stopped = true;
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.renders += 1;
        let state = app.connection_state();
        if self.transitions.last() != Some(&state) {
            self.transitions.push(state);
        }
        let indicator = app.network_status().map(NetworkStatus::label);
        if self.indicators.last() != Some(&indicator) {
            self.indicators.push(indicator);
        }
        self.theme = Some(app.theme().as_str());
        Ok(())
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}
