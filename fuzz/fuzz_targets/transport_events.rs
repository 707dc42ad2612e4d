#![no_main]

use std::time::{Duration, Instant};

use libfuzzer_sys::fuzz_target;
use mnml_app::{App, AppEvent, WidgetConfig};
use mnml_core::TransportEvent;

// Arbitrary transport traffic must never panic the widget, and the message
// log may only grow.
fuzz_target!(|input: Vec<(u8, String)>| {
    let t0 = Instant::now();
    let mut app = App::new(&WidgetConfig::default());
    let mut logged = 0;

    for (step, (kind, payload)) in input.into_iter().enumerate() {
        let name = match kind % 7 {
            0 => "connect",
            1 => "disconnect",
            2 => "reconnect_attempt",
            3 => "reconnect",
            4 => "server:session",
            5 => "server:message",
            _ => "client:typing",
        };
        let now = t0 + Duration::from_millis(step as u64 * 100);
        app.handle(AppEvent::Transport(TransportEvent::from_raw(name, &payload)), now);
        app.handle(AppEvent::Tick, now);

        assert!(app.messages().len() >= logged);
        logged = app.messages().len();
    }
});
