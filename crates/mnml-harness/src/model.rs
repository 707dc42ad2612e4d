//! Reference model for model-based testing.
//!
//! [`ModelWidget`] is a deliberately naive re-statement of the widget's
//! observable behaviour. Tests apply the same [`Operation`] sequence to the
//! model and to a real [`mnml_app::App`] and compare after every step.

use std::time::Duration;

use arbitrary::Arbitrary;
use mnml_core::ConnectionState;
use mnml_proto::EventName;

/// Drafts the model can type. Includes the empty draft.
pub const WORDS: [&str; 5] = ["", "hi", "hello there", "ok", "👋"];

/// Remote senders the model can receive from.
pub const SENDERS: [&str; 3] = ["alice", "bob", "carol"];

/// One step of a generated scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum Operation {
    /// Transport connected.
    Connect,
    /// Transport dropped.
    Disconnect,
    /// Reconnect attempt number (1-based, small).
    ReconnectAttempt(u8),
    /// Transport reconnected.
    Reconnected,
    /// Server assigns session `n`.
    AssignSession(u8),
    /// Composer text set to `WORDS[n]`.
    Draft(u8),
    /// Send the draft.
    Send,
    /// Remote message from `SENDERS[sender]` with body `WORDS[word]`.
    Receive {
        /// Index into `SENDERS`.
        sender: u8,
        /// Index into `WORDS`.
        word: u8,
    },
    /// Unparseable `server:message`.
    Garbage,
    /// Printable key press.
    Keystroke,
    /// Enter key press.
    Enter,
    /// Advance the clock by this many milliseconds and tick.
    Advance(u16),
}

impl Operation {
    /// Word selected by an index.
    pub fn word(index: u8) -> &'static str {
        WORDS[usize::from(index) % WORDS.len()]
    }

    /// Sender selected by an index.
    pub fn sender(index: u8) -> &'static str {
        SENDERS[usize::from(index) % SENDERS.len()]
    }

    /// Attempt number for a raw attempt byte, kept within `1..=8`.
    pub fn attempt(raw: u8) -> u32 {
        u32::from(raw % 8) + 1
    }
}

/// Naive reference model of the widget.
#[derive(Debug, Clone)]
pub struct ModelWidget {
    /// Connection state.
    pub state: ConnectionState,
    /// Retries given up.
    pub exhausted: bool,
    /// `(session, client)` ids.
    pub session: Option<(String, String)>,
    /// `(sender, body)` in arrival order.
    pub log: Vec<(String, String)>,
    /// Composer text.
    pub draft: String,
    /// Typing indicator on.
    pub typing: bool,
    /// Idle deadline, milliseconds since start.
    pub deadline_ms: Option<u64>,
    /// Virtual clock, milliseconds since start.
    pub now_ms: u64,
    ceiling: u32,
    timeout_ms: u64,
}

impl ModelWidget {
    /// Fresh model.
    pub fn new(ceiling: u32, timeout: Duration) -> Self {
        Self {
            state: ConnectionState::Connecting,
            exhausted: false,
            session: None,
            log: Vec::new(),
            draft: String::new(),
            typing: false,
            deadline_ms: None,
            now_ms: 0,
            ceiling,
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Apply an operation; returns the event names the widget should emit.
    pub fn apply(&mut self, op: Operation) -> Vec<EventName> {
        match op {
            Operation::Connect => {
                self.state = match self.state {
                    ConnectionState::Connecting => ConnectionState::Connected,
                    ConnectionState::Reconnecting => ConnectionState::Reconnected,
                    ConnectionState::Disconnected if self.exhausted => ConnectionState::Connected,
                    ConnectionState::Disconnected => ConnectionState::Reconnected,
                    live => live,
                };
                self.exhausted = false;
                Vec::new()
            },
            Operation::Disconnect => {
                self.state = ConnectionState::Disconnected;
                Vec::new()
            },
            Operation::ReconnectAttempt(raw) => {
                if !self.exhausted {
                    if Operation::attempt(raw) < self.ceiling {
                        self.state = ConnectionState::Reconnecting;
                    } else {
                        self.state = ConnectionState::Disconnected;
                        self.exhausted = true;
                    }
                }
                Vec::new()
            },
            Operation::Reconnected => {
                if !self.exhausted
                    && matches!(
                        self.state,
                        ConnectionState::Reconnecting | ConnectionState::Disconnected
                    )
                {
                    self.state = ConnectionState::Reconnected;
                }
                Vec::new()
            },
            Operation::AssignSession(n) => {
                self.session = Some((format!("s-{n}"), format!("c-{n}")));
                if self.typing { vec![EventName::ClientTyping] } else { Vec::new() }
            },
            Operation::Draft(word) => {
                self.draft = Operation::word(word).to_string();
                Vec::new()
            },
            Operation::Send => match &self.session {
                Some((_, client)) if !self.draft.is_empty() => {
                    self.log.push((client.clone(), std::mem::take(&mut self.draft)));
                    vec![EventName::ClientMessage]
                },
                _ => Vec::new(),
            },
            Operation::Receive { sender, word } => {
                self.log.push((Operation::sender(sender).to_string(), Operation::word(word).to_string()));
                Vec::new()
            },
            Operation::Garbage => Vec::new(),
            Operation::Keystroke => self.keystroke(),
            Operation::Enter => {
                let mut emitted = self.keystroke();
                self.typing = false;
                self.deadline_ms = None;
                emitted.extend(self.presence(EventName::ClientIdle));
                emitted
            },
            Operation::Advance(ms) => {
                self.now_ms += u64::from(ms);
                match self.deadline_ms {
                    Some(deadline) if self.now_ms >= deadline => {
                        self.typing = false;
                        self.deadline_ms = None;
                        self.presence(EventName::ClientIdle)
                    },
                    _ => Vec::new(),
                }
            },
        }
    }

    fn keystroke(&mut self) -> Vec<EventName> {
        let emitted =
            if self.typing { Vec::new() } else { self.presence(EventName::ClientTyping) };
        self.typing = true;
        self.deadline_ms = Some(self.now_ms + self.timeout_ms);
        emitted
    }

    fn presence(&self, name: EventName) -> Vec<EventName> {
        if self.session.is_some() { vec![name] } else { Vec::new() }
    }
}
