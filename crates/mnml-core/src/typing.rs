//! Typing indicator debounce.
//!
//! # State Machine
//!
//! ```text
//!            keystroke (emit Typing, arm deadline)
//!  ┌──────┐ ─────────────────────────────────────> ┌────────┐
//!  │ Idle │                                        │ Typing │ ── keystroke: re-arm deadline
//!  └──────┘ <───────────────────────────────────── └────────┘
//!            deadline passed / submit (emit Idle)
//! ```
//!
//! The pending idle timeout is a single `Option<Instant>`. Arming a new
//! deadline overwrites the previous one in the same call, so a superseded
//! timeout can never fire. The runtime polls [`TypingDebouncer::deadline`]
//! and calls [`TypingDebouncer::tick`] once it has passed.

use std::time::{Duration, Instant};

use mnml_proto::EventName;
use tracing::debug;

/// Default delay after the last keystroke before the user counts as idle.
pub const TYPING_TIMEOUT_DELAY: Duration = Duration::from_millis(1000);

/// Debouncer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingConfig {
    /// Inactivity before emitting idle
    pub timeout: Duration,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self { timeout: TYPING_TIMEOUT_DELAY }
    }
}

/// Whether the local user is currently typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingState {
    /// Not typing
    Idle,
    /// Keystrokes seen within the timeout
    Typing,
}

/// Presence signal to send to the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceSignal {
    /// User started typing
    Typing,
    /// User stopped typing
    Idle,
}

impl PresenceSignal {
    /// Transport event carrying this signal.
    pub const fn event_name(self) -> EventName {
        match self {
            Self::Typing => EventName::ClientTyping,
            Self::Idle => EventName::ClientIdle,
        }
    }
}

/// Typing debounce state machine.
#[derive(Debug, Clone)]
pub struct TypingDebouncer {
    state: TypingState,
    config: TypingConfig,
    idle_deadline: Option<Instant>,
}

impl TypingDebouncer {
    /// Create an idle debouncer with no pending timeout.
    pub fn new(config: TypingConfig) -> Self {
        Self { state: TypingState::Idle, config, idle_deadline: None }
    }

    /// Current state.
    pub fn state(&self) -> TypingState {
        self.state
    }

    /// When the pending idle timeout fires, if one is armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.idle_deadline
    }

    /// Record a keystroke.
    ///
    /// Emits [`PresenceSignal::Typing`] on the idle to typing edge only.
    /// Always re-arms the idle timeout, replacing any pending one.
    pub fn on_keystroke(&mut self, now: Instant) -> Vec<PresenceSignal> {
        let mut signals = Vec::new();

        if self.state == TypingState::Idle {
            self.state = TypingState::Typing;
            signals.push(PresenceSignal::Typing);
            debug!("typing started");
        }

        self.idle_deadline = Some(now + self.config.timeout);
        signals
    }

    /// Record a submit. Always ends typing and emits
    /// [`PresenceSignal::Idle`], whatever the prior state.
    pub fn on_submit(&mut self) -> Vec<PresenceSignal> {
        self.idle_deadline = None;
        self.state = TypingState::Idle;
        debug!("typing ended by submit");
        vec![PresenceSignal::Idle]
    }

    /// Fire the idle timeout if it has passed.
    pub fn tick(&mut self, now: Instant) -> Vec<PresenceSignal> {
        match self.idle_deadline {
            Some(deadline) if now >= deadline => {
                self.idle_deadline = None;
                self.state = TypingState::Idle;
                debug!("typing timed out");
                vec![PresenceSignal::Idle]
            },
            _ => Vec::new(),
        }
    }

    /// Drop any pending timeout and return to idle without emitting.
    ///
    /// Call on teardown so no signal fires against a finished session.
    pub fn reset(&mut self) {
        self.idle_deadline = None;
        self.state = TypingState::Idle;
    }
}

impl Default for TypingDebouncer {
    fn default() -> Self {
        Self::new(TypingConfig::default())
    }
}
