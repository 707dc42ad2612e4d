//! App actions
//!
//! Effects produced by the [`crate::App`] state machine for the runtime to
//! execute.

use mnml_proto::OutboundEvent;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Hand an event to the transport.
    Emit(OutboundEvent),

    /// Stop the transport's automatic reconnection.
    StopReconnecting,

    /// Visible state changed; re-render.
    Render,
}
