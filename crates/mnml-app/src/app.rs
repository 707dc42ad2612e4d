//! Session controller.
//!
//! [`App`] owns the session identity, the flat message log and the composer,
//! and routes every input to the codec, aggregator, debouncer and connection
//! manager. It never performs I/O: each call returns [`AppAction`]s.

use std::time::Instant;

use mnml_core::{
    CodecError, ConnectionAction, ConnectionManager, ConnectionState, Delivery, GroupingPolicy, Message,
    MessageGroup, Origin, PresenceSignal, TransportEvent, TypingDebouncer, TypingState, aggregate,
    codec,
};
use mnml_proto::{Direction, EventName, OutboundEvent, Session};
use tracing::{debug, info, warn};

use crate::{
    action::AppAction,
    config::{Theme, WidgetConfig},
    event::{AppEvent, Key},
    state::{Composition, NetworkStatus},
};

/// Chat widget state machine.
#[derive(Debug, Clone)]
pub struct App {
    session: Option<Session>,
    messages: Vec<Message>,
    composition: Composition,
    theme: Theme,
    grouping: GroupingPolicy,
    connection: ConnectionManager,
    typing: TypingDebouncer,
}

impl App {
    /// Create an app with no session, waiting for the first connect.
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            session: None,
            messages: Vec::new(),
            composition: Composition { open: config.start_open, draft: String::new() },
            theme: config.theme,
            grouping: config.grouping(),
            connection: ConnectionManager::new(config.connection()),
            typing: TypingDebouncer::new(config.typing()),
        }
    }

    /// Process one event to completion.
    pub fn handle(&mut self, event: AppEvent, now: Instant) -> Vec<AppAction> {
        match event {
            AppEvent::ToggleOpen(open) => self.toggle_open(open),
            AppEvent::DraftChanged(text) => self.on_draft_change(text),
            AppEvent::KeyPress(key) => self.on_key_press(key, now),
            AppEvent::Keystroke => self.on_keystroke(now),
            AppEvent::Submit => self.on_submit(),
            AppEvent::SendMessage => self.send_message(now),
            AppEvent::SetTheme(theme) => self.set_theme(theme),
            AppEvent::Transport(event) => self.on_transport(event, now),
            AppEvent::Tick => self.tick(now),
        }
    }

    /// Open or close the widget. No transport traffic.
    pub fn toggle_open(&mut self, open: bool) -> Vec<AppAction> {
        self.composition.open = open;
        vec![AppAction::Render]
    }

    /// Replace the composer text.
    pub fn on_draft_change(&mut self, text: String) -> Vec<AppAction> {
        self.composition.draft = text;
        vec![AppAction::Render]
    }

    /// Switch the visual theme.
    pub fn set_theme(&mut self, theme: Theme) -> Vec<AppAction> {
        self.theme = theme;
        vec![AppAction::Render]
    }

    /// Key pressed in the composer.
    ///
    /// Every key counts as a keystroke. Enter additionally submits, which
    /// ends the typing indicator; it does not send the draft.
    pub fn on_key_press(&mut self, key: Key, now: Instant) -> Vec<AppAction> {
        let mut actions = self.on_keystroke(now);
        if key == Key::Enter {
            actions.extend(self.on_submit());
        }
        actions
    }

    /// User activity in the composer.
    pub fn on_keystroke(&mut self, now: Instant) -> Vec<AppAction> {
        let signals = self.typing.on_keystroke(now);
        self.presence(signals)
    }

    /// Composer submitted; typing is over.
    pub fn on_submit(&mut self) -> Vec<AppAction> {
        let signals = self.typing.on_submit();
        self.presence(signals)
    }

    /// Fire any timer whose deadline has passed.
    pub fn tick(&mut self, now: Instant) -> Vec<AppAction> {
        let signals = self.typing.tick(now);
        self.presence(signals)
    }

    /// Send the draft as a chat message.
    ///
    /// No-op when the draft is empty or no session exists. Otherwise the
    /// message is appended locally before the transport sees it, the draft
    /// is cleared and `client:message` is emitted. There is no rollback if
    /// the send later fails; [`Delivery::Queued`] marks messages handed over
    /// while the connection was not live.
    pub fn send_message(&mut self, now: Instant) -> Vec<AppAction> {
        if self.composition.draft.is_empty() {
            debug!("ignoring send of empty draft");
            return Vec::new();
        }
        let Some(session) = &self.session else {
            warn!(error = %CodecError::NoActiveSession, "message not sent");
            return Vec::new();
        };

        let delivery =
            if self.connection.state().is_live() { Delivery::Sent } else { Delivery::Queued };
        let message = Message {
            body: self.composition.draft.clone(),
            sender_id: session.client_id().clone(),
            session_id: session.id.clone(),
            timestamp: now,
            origin: Origin::Local(delivery),
        };

        let event = match codec::encode_message(&message) {
            Ok(event) => event,
            Err(err) => {
                warn!(%err, "message not sent");
                return Vec::new();
            },
        };

        debug!(?delivery, "sending message");
        self.messages.push(message);
        self.composition.draft.clear();

        vec![self.emit(event), AppAction::Render]
    }

    /// Store a newly assigned session, replacing any previous one.
    ///
    /// If the user is already typing, the new session is told so right away;
    /// the matching `idle` follows from the running timeout. Malformed
    /// payloads leave the current session untouched.
    pub fn on_session_assigned(&mut self, payload: &str) -> Vec<AppAction> {
        match Session::decode(payload) {
            Ok(session) => {
                info!(session = %session.id, client = %session.client_id(), "session assigned");
                self.session = Some(session);
                let mut actions = match self.typing.state() {
                    TypingState::Typing => self.presence(vec![PresenceSignal::Typing]),
                    TypingState::Idle => Vec::new(),
                };
                actions.push(AppAction::Render);
                actions
            },
            Err(err) => {
                warn!(%err, "discarding session payload");
                Vec::new()
            },
        }
    }

    /// Append a relayed message. Malformed payloads are discarded.
    pub fn on_inbound_message(&mut self, payload: &str, now: Instant) -> Vec<AppAction> {
        match codec::from_wire(payload, now) {
            Ok(message) => {
                debug!(sender = %message.sender_id, "message received");
                self.messages.push(message);
                vec![AppAction::Render]
            },
            Err(err) => {
                warn!(%err, "discarding inbound message");
                Vec::new()
            },
        }
    }

    /// Feed a transport event to the connection manager or the inbound
    /// handlers.
    pub fn on_transport(&mut self, event: TransportEvent, now: Instant) -> Vec<AppAction> {
        let (name, payload) = match event {
            TransportEvent::Inbound { name, payload } => (name, payload),
            lifecycle => {
                return match self.connection.handle(&lifecycle) {
                    Ok(actions) => self.connection_actions(actions),
                    Err(err) => {
                        warn!(%err, "ignoring lifecycle event");
                        Vec::new()
                    },
                };
            },
        };

        let event = match name.parse::<EventName>() {
            Ok(event) => event,
            Err(err) => {
                debug!(%err, "ignoring event");
                return Vec::new();
            },
        };
        if event.direction() == Direction::Outbound {
            warn!(%event, "ignoring outbound event received from server");
            return Vec::new();
        }

        match event {
            EventName::ServerSession => self.on_session_assigned(&payload),
            EventName::ServerMessage => self.on_inbound_message(&payload, now),
            EventName::ClientMessage | EventName::ClientTyping | EventName::ClientIdle => Vec::new(),
        }
    }

    /// Cancel the pending typing timeout without emitting anything.
    ///
    /// Must be called when the widget goes away.
    pub fn teardown(&mut self) {
        self.typing.reset();
        debug!("torn down");
    }

    /// Earliest instant at which [`App::tick`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.typing.deadline()
    }

    /// Current session, if assigned.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Flat message log in arrival order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Message log grouped for rendering. Recomputed on every call.
    pub fn groups(&self) -> Vec<MessageGroup> {
        aggregate::group(self.messages.iter().cloned(), self.grouping)
    }

    /// Whether the widget is open.
    pub fn is_open(&self) -> bool {
        self.composition.open
    }

    /// Composer text.
    pub fn draft(&self) -> &str {
        &self.composition.draft
    }

    /// Visual theme.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Connection state (read-only).
    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// True once reconnection has been given up.
    pub fn reconnection_exhausted(&self) -> bool {
        self.connection.exhausted()
    }

    /// Network indicator to display, if any.
    pub fn network_status(&self) -> Option<NetworkStatus> {
        NetworkStatus::from_state(self.connection.state())
    }

    /// Local typing state.
    pub fn typing_state(&self) -> TypingState {
        self.typing.state()
    }

    fn presence(&self, signals: Vec<PresenceSignal>) -> Vec<AppAction> {
        signals
            .into_iter()
            .filter_map(|signal| match codec::encode_presence(signal, self.session.as_ref()) {
                Ok(event) => Some(self.emit(event)),
                Err(err) => {
                    debug!(?signal, %err, "presence not sent");
                    None
                },
            })
            .collect()
    }

    fn emit(&self, event: OutboundEvent) -> AppAction {
        AppAction::Emit(self.connection.send(event))
    }

    fn connection_actions(&self, actions: Vec<ConnectionAction>) -> Vec<AppAction> {
        actions
            .into_iter()
            .map(|action| match action {
                ConnectionAction::StateChanged { .. } => AppAction::Render,
                ConnectionAction::StopReconnecting => AppAction::StopReconnecting,
            })
            .collect()
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(&WidgetConfig::default())
    }
}
