//! Model-based property tests.
//!
//! These tests generate random operation sequences and verify that the real
//! widget behaves identically to the reference model.
//!
//! # Architecture
//!
//! ```text
//! proptest generates: bytes -> Vec<Operation>
//!                          │
//!           ┌──────────────┼──────────────┐
//!           ▼              ▼              ▼
//!      ModelWidget     RealWidget      Compare
//!      (reference)     (mnml-app)      after each step
//! ```

use std::time::{Duration, Instant};

use arbitrary::{Arbitrary, Unstructured};
use mnml_app::{App, AppAction, AppEvent, Key, WidgetConfig};
use mnml_core::{TransportEvent, TypingState};
use mnml_harness::{ModelWidget, Operation};
use mnml_proto::{ClientId, EventName, Session, SessionId, WireMessage};
use proptest::prelude::*;

const CEILING: u32 = 4;
const TIMEOUT: Duration = Duration::from_millis(1000);

/// Real system wrapper that mirrors ModelWidget's interface.
struct RealWidget {
    app: App,
    t0: Instant,
    now_ms: u64,
}

impl RealWidget {
    fn with_ceiling(attempt_ceiling: u32) -> Self {
        let config = WidgetConfig {
            attempt_ceiling,
            typing_timeout_ms: 1000,
            ..WidgetConfig::default()
        };
        Self { app: App::new(&config), t0: Instant::now(), now_ms: 0 }
    }

    fn now(&self) -> Instant {
        self.t0 + Duration::from_millis(self.now_ms)
    }

    fn inbound(name: EventName, payload: String) -> AppEvent {
        AppEvent::Transport(TransportEvent::inbound(name.as_str(), payload))
    }

    fn apply(&mut self, op: Operation) -> Vec<EventName> {
        let event = match op {
            Operation::Connect => AppEvent::Transport(TransportEvent::Connect),
            Operation::Disconnect => AppEvent::Transport(TransportEvent::Disconnect),
            Operation::ReconnectAttempt(raw) => {
                AppEvent::Transport(TransportEvent::ReconnectAttempt(Operation::attempt(raw)))
            },
            Operation::Reconnected => AppEvent::Transport(TransportEvent::Reconnect),
            Operation::AssignSession(n) => {
                let session =
                    Session::new(SessionId::new(format!("s-{n}")), ClientId::new(format!("c-{n}")));
                Self::inbound(EventName::ServerSession, session.encode().unwrap())
            },
            Operation::Draft(word) => AppEvent::DraftChanged(Operation::word(word).to_string()),
            Operation::Send => AppEvent::SendMessage,
            Operation::Receive { sender, word } => {
                let wire = WireMessage {
                    body: Some(Operation::word(word).to_string()),
                    sender_id: ClientId::new(Operation::sender(sender)),
                    session_id: SessionId::new("remote"),
                };
                Self::inbound(EventName::ServerMessage, wire.encode(EventName::ServerMessage).unwrap())
            },
            Operation::Garbage => Self::inbound(EventName::ServerMessage, "{oops".to_string()),
            Operation::Keystroke => AppEvent::KeyPress(Key::Char('x')),
            Operation::Enter => AppEvent::KeyPress(Key::Enter),
            Operation::Advance(ms) => {
                self.now_ms += u64::from(ms);
                AppEvent::Tick
            },
        };

        let now = self.now();
        self.app
            .handle(event, now)
            .into_iter()
            .filter_map(|action| match action {
                AppAction::Emit(e) => Some(e.name),
                _ => None,
            })
            .collect()
    }
}

fn assert_matches(model: &ModelWidget, real: &RealWidget, op: Operation) {
    let app = &real.app;
    assert_eq!(app.connection_state(), model.state, "connection state after {op:?}");
    assert_eq!(app.reconnection_exhausted(), model.exhausted, "exhaustion after {op:?}");
    assert_eq!(
        app.session().map(|s| (s.id.to_string(), s.client_id().to_string())),
        model.session,
        "session after {op:?}"
    );
    let log: Vec<_> =
        app.messages().iter().map(|m| (m.sender_id.to_string(), m.body.clone())).collect();
    assert_eq!(log, model.log, "log after {op:?}");
    assert_eq!(app.draft(), model.draft, "draft after {op:?}");
    let typing = app.typing_state() == TypingState::Typing;
    assert_eq!(typing, model.typing, "typing after {op:?}");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn widget_matches_model(bytes in prop::collection::vec(any::<u8>(), 0..1024)) {
        let mut unstructured = Unstructured::new(&bytes);
        let ops = Vec::<Operation>::arbitrary(&mut unstructured).unwrap_or_default();

        let mut model = ModelWidget::new(CEILING, TIMEOUT);
        let mut real = RealWidget::with_ceiling(CEILING);

        for op in ops {
            let expected = model.apply(op);
            let actual = real.apply(op);
            prop_assert_eq!(&actual, &expected, "emitted events after {:?}", op);
            assert_matches(&model, &real, op);
        }
    }
}

#[test]
fn ceiling_example_sequence() {
    let mut model = ModelWidget::new(5, TIMEOUT);
    let mut real = RealWidget::with_ceiling(5);

    for op in [Operation::Connect, Operation::Disconnect] {
        model.apply(op);
        real.apply(op);
    }

    // Raw attempt bytes 0..=4 map to attempt numbers 1..=5.
    let observed: Vec<_> = (0u8..5)
        .map(|raw| {
            model.apply(Operation::ReconnectAttempt(raw));
            real.apply(Operation::ReconnectAttempt(raw));
            assert_eq!(real.app.connection_state(), model.state);
            real.app.connection_state()
        })
        .collect();

    use mnml_core::ConnectionState::{Disconnected, Reconnecting};
    assert_eq!(observed, vec![Reconnecting, Reconnecting, Reconnecting, Reconnecting, Disconnected]);
}

#[test]
fn typing_before_session_pairs_with_idle() {
    let mut model = ModelWidget::new(5, TIMEOUT);
    let mut real = RealWidget::with_ceiling(5);

    let script = [
        Operation::Connect,
        Operation::Keystroke,
        Operation::AssignSession(1),
        Operation::Keystroke,
        Operation::Advance(500),
        Operation::Keystroke,
        Operation::Advance(2000),
    ];
    let mut emitted = Vec::new();
    for op in script {
        let expected = model.apply(op);
        let actual = real.apply(op);
        assert_eq!(actual, expected, "emitted events after {op:?}");
        assert_matches(&model, &real, op);
        emitted.extend(actual);
    }

    assert_eq!(emitted, vec![EventName::ClientTyping, EventName::ClientIdle]);
}
