//! Connection lifecycle state machine.
//!
//! Tracks the relay connection from transport lifecycle callbacks and bounds
//! automatic reconnection with a configured attempt ceiling.
//!
//! # State Machine
//!
//! ```text
//! ┌────────────┐  connect   ┌───────────┐  disconnect  ┌──────────────┐
//! │ Connecting │──────────> │ Connected │────────────> │ Disconnected │
//! └────────────┘            └───────────┘              └──────────────┘
//!                                                        │        ↑
//!                              attempt n < ceiling       │        │ attempt n >= ceiling
//!                                                        ↓        │ (exhausted)
//! ┌─────────────┐  connect / reconnect  ┌──────────────┐ │        │
//! │ Reconnected │ <──────────────────── │ Reconnecting │─┴────────┘
//! └─────────────┘                       └──────────────┘
//! ```
//!
//! Once exhausted, further reconnect attempts are refused with
//! [`ConnectionError::ReconnectionExhausted`]. A subsequent `connect` from the
//! transport is a brand new connection and clears the exhaustion.
//!
//! Like the other core machines, methods return actions for the runtime to
//! execute instead of touching the transport.

use mnml_proto::OutboundEvent;
use tracing::{debug, info, warn};

use crate::{error::ConnectionError, transport::TransportEvent};

/// Actions returned by the connection state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionAction {
    /// The state changed; the UI should refresh its network indicator.
    StateChanged {
        /// Previous state
        from: ConnectionState,
        /// New state
        to: ConnectionState,
    },

    /// Tell the transport to stop its own retry loop.
    StopReconnecting,
}

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// First connection in progress
    Connecting,
    /// First connection established
    Connected,
    /// Transport is retrying after a drop
    Reconnecting,
    /// Connection resumed after a drop
    Reconnected,
    /// Connection lost, or retries exhausted
    Disconnected,
}

impl ConnectionState {
    /// True when events sent now go straight out on the wire.
    pub fn is_live(self) -> bool {
        matches!(self, Self::Connected | Self::Reconnected)
    }
}

/// Connection configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Reconnect attempt number at which the manager gives up
    pub attempt_ceiling: u32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self { attempt_ceiling: 5 }
    }
}

/// Connection state machine
///
/// Sole owner of [`ConnectionState`]. Other components read it through
/// [`ConnectionManager::state`] and send through [`ConnectionManager::send`].
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    state: ConnectionState,
    config: ConnectionConfig,
    /// Set when the attempt ceiling was reached
    exhausted: bool,
    /// Last attempt number reported by the transport
    last_attempt: Option<u32>,
}

impl ConnectionManager {
    /// Create a manager in `Connecting` state.
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            state: ConnectionState::Connecting,
            config,
            exhausted: false,
            last_attempt: None,
        }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// True after the attempt ceiling has been reached.
    pub fn exhausted(&self) -> bool {
        self.exhausted
    }

    /// Last reconnect attempt number seen, if any.
    pub fn last_attempt(&self) -> Option<u32> {
        self.last_attempt
    }

    /// Dispatch a lifecycle event.
    ///
    /// Named application events are not lifecycle events and yield no
    /// actions.
    pub fn handle(
        &mut self,
        event: &TransportEvent,
    ) -> Result<Vec<ConnectionAction>, ConnectionError> {
        match event {
            TransportEvent::Connect => self.on_connect(),
            TransportEvent::Disconnect => Ok(self.on_disconnect()),
            TransportEvent::ReconnectAttempt(attempt) => self.on_reconnect_attempt(*attempt),
            TransportEvent::Reconnect => self.on_reconnected(),
            TransportEvent::Inbound { .. } => Ok(Vec::new()),
        }
    }

    /// Transport reports the connection is up.
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedEvent` if already connected.
    pub fn on_connect(&mut self) -> Result<Vec<ConnectionAction>, ConnectionError> {
        let next = match self.state {
            ConnectionState::Connecting => ConnectionState::Connected,
            ConnectionState::Reconnecting => ConnectionState::Reconnected,
            ConnectionState::Disconnected if self.exhausted => {
                info!("fresh connection after exhausted retries");
                self.exhausted = false;
                ConnectionState::Connected
            },
            ConnectionState::Disconnected => ConnectionState::Reconnected,
            state @ (ConnectionState::Connected | ConnectionState::Reconnected) => {
                return Err(ConnectionError::UnexpectedEvent { state, event: "connect" });
            },
        };

        self.last_attempt = None;
        Ok(self.transition(next).into_iter().collect())
    }

    /// Transport reports the connection dropped.
    ///
    /// Goes straight to `Disconnected`; attempts are not counted here.
    pub fn on_disconnect(&mut self) -> Vec<ConnectionAction> {
        self.transition(ConnectionState::Disconnected).into_iter().collect()
    }

    /// Transport is about to make reconnect attempt number `attempt`.
    ///
    /// # Errors
    ///
    /// Returns `ReconnectionExhausted` if the ceiling was already reached.
    pub fn on_reconnect_attempt(
        &mut self,
        attempt: u32,
    ) -> Result<Vec<ConnectionAction>, ConnectionError> {
        let ceiling = self.config.attempt_ceiling;
        if self.exhausted {
            return Err(ConnectionError::ReconnectionExhausted { attempt, ceiling });
        }

        self.last_attempt = Some(attempt);

        if attempt < ceiling {
            debug!(attempt, ceiling, "reconnect attempt");
            return Ok(self.transition(ConnectionState::Reconnecting).into_iter().collect());
        }

        warn!(attempt, ceiling, "reconnect attempts exhausted");
        self.exhausted = true;
        let mut actions: Vec<_> = self.transition(ConnectionState::Disconnected).into_iter().collect();
        actions.push(ConnectionAction::StopReconnecting);
        Ok(actions)
    }

    /// Transport reports a successful reconnect.
    ///
    /// # Errors
    ///
    /// Returns `ReconnectionExhausted` after giving up, or `UnexpectedEvent`
    /// if no reconnect was in progress.
    pub fn on_reconnected(&mut self) -> Result<Vec<ConnectionAction>, ConnectionError> {
        if self.exhausted {
            return Err(ConnectionError::ReconnectionExhausted {
                attempt: self.last_attempt.unwrap_or(self.config.attempt_ceiling),
                ceiling: self.config.attempt_ceiling,
            });
        }

        match self.state {
            ConnectionState::Reconnecting | ConnectionState::Disconnected => {
                self.last_attempt = None;
                Ok(self.transition(ConnectionState::Reconnected).into_iter().collect())
            },
            // A transport may report both connect and reconnect for one resume.
            ConnectionState::Reconnected => Ok(Vec::new()),
            state @ (ConnectionState::Connecting | ConnectionState::Connected) => {
                Err(ConnectionError::UnexpectedEvent { state, event: "reconnect" })
            },
        }
    }

    /// Pass an outbound event through to the transport.
    ///
    /// Sends are fire-and-forget. While not live the transport is expected to
    /// buffer; the event is still handed over.
    pub fn send(&self, event: OutboundEvent) -> OutboundEvent {
        if !self.state.is_live() {
            debug!(state = ?self.state, event = %event.name, "sending while offline");
        }
        event
    }

    fn transition(&mut self, to: ConnectionState) -> Option<ConnectionAction> {
        let from = self.state;
        if from == to {
            return None;
        }
        self.state = to;
        info!(?from, ?to, "connection state changed");
        Some(ConnectionAction::StateChanged { from, to })
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new(ConnectionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use mnml_proto::EventName;

    use super::*;

    fn connected() -> ConnectionManager {
        let mut conn = ConnectionManager::default();
        conn.on_connect().unwrap();
        conn
    }

    #[test]
    fn first_connect() {
        let mut conn = ConnectionManager::default();
        assert_eq!(conn.state(), ConnectionState::Connecting);

        let actions = conn.on_connect().unwrap();
        assert_eq!(conn.state(), ConnectionState::Connected);
        assert_eq!(actions, vec![ConnectionAction::StateChanged {
            from: ConnectionState::Connecting,
            to: ConnectionState::Connected,
        }]);
    }

    #[test]
    fn disconnect_is_direct() {
        let mut conn = connected();
        conn.on_disconnect();
        assert_eq!(conn.state(), ConnectionState::Disconnected);
        assert_eq!(conn.last_attempt(), None);
    }

    #[test]
    fn reconnect_cycle() {
        let mut conn = connected();
        conn.on_disconnect();

        conn.on_reconnect_attempt(1).unwrap();
        assert_eq!(conn.state(), ConnectionState::Reconnecting);

        conn.on_reconnected().unwrap();
        assert_eq!(conn.state(), ConnectionState::Reconnected);
    }

    #[test]
    fn connect_after_reconnecting_is_reconnected() {
        let mut conn = connected();
        conn.on_disconnect();
        conn.on_reconnect_attempt(2).unwrap();

        conn.on_connect().unwrap();
        assert_eq!(conn.state(), ConnectionState::Reconnected);

        // Trailing reconnect callback for the same resume is harmless.
        assert!(conn.on_reconnected().unwrap().is_empty());
    }

    #[test]
    fn ceiling_of_five() {
        let mut conn = connected();
        conn.on_disconnect();

        let observed: Vec<_> = (1..=5)
            .map(|attempt| {
                conn.on_reconnect_attempt(attempt).unwrap();
                conn.state()
            })
            .collect();

        assert_eq!(observed, vec![
            ConnectionState::Reconnecting,
            ConnectionState::Reconnecting,
            ConnectionState::Reconnecting,
            ConnectionState::Reconnecting,
            ConnectionState::Disconnected,
        ]);
        assert!(conn.exhausted());
    }

    #[test]
    fn exhaustion_stops_transport_and_refuses_attempts() {
        let mut conn = ConnectionManager::new(ConnectionConfig { attempt_ceiling: 2 });
        conn.on_connect().unwrap();
        conn.on_disconnect();
        conn.on_reconnect_attempt(1).unwrap();

        let actions = conn.on_reconnect_attempt(2).unwrap();
        assert!(actions.contains(&ConnectionAction::StopReconnecting));

        let err = conn.on_reconnect_attempt(3).unwrap_err();
        assert_eq!(err, ConnectionError::ReconnectionExhausted { attempt: 3, ceiling: 2 });
        assert!(matches!(
            conn.on_reconnected(),
            Err(ConnectionError::ReconnectionExhausted { .. })
        ));
        assert_eq!(conn.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn fresh_connect_clears_exhaustion() {
        let mut conn = ConnectionManager::new(ConnectionConfig { attempt_ceiling: 1 });
        conn.on_connect().unwrap();
        conn.on_disconnect();
        conn.on_reconnect_attempt(1).unwrap();
        assert!(conn.exhausted());

        conn.on_connect().unwrap();
        assert_eq!(conn.state(), ConnectionState::Connected);
        assert!(!conn.exhausted());
    }

    #[test]
    fn double_connect_is_unexpected() {
        let mut conn = connected();
        assert!(matches!(conn.on_connect(), Err(ConnectionError::UnexpectedEvent { .. })));
    }

    #[test]
    fn reconnected_without_drop_is_unexpected() {
        let mut conn = connected();
        assert!(matches!(conn.on_reconnected(), Err(ConnectionError::UnexpectedEvent { .. })));
    }

    #[test]
    fn send_passes_event_through_in_any_state() {
        let mut conn = ConnectionManager::default();
        let event = OutboundEvent::new(EventName::ClientIdle, "{}");
        assert_eq!(conn.send(event.clone()), event);

        conn.on_disconnect();
        assert_eq!(conn.send(event.clone()), event);
    }

    #[test]
    fn handle_dispatches_lifecycle_events() {
        let mut conn = ConnectionManager::default();
        conn.handle(&TransportEvent::Connect).unwrap();
        conn.handle(&TransportEvent::Disconnect).unwrap();
        conn.handle(&TransportEvent::ReconnectAttempt(1)).unwrap();
        conn.handle(&TransportEvent::Reconnect).unwrap();
        assert_eq!(conn.state(), ConnectionState::Reconnected);

        let inbound = TransportEvent::Inbound { name: "server:message".into(), payload: "{}".into() };
        assert!(conn.handle(&inbound).unwrap().is_empty());
    }
}
