//! View-facing state projections.

use mnml_core::ConnectionState;

/// Composer state, mutated only by UI intents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Composition {
    /// Widget is open.
    pub open: bool,
    /// Text in the composer.
    pub draft: String,
}

/// Network indicator shown in the open widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStatus {
    /// Retrying.
    Reconnecting,
    /// Back online after a drop.
    Reconnected,
    /// Offline, possibly for good.
    Disconnected,
}

impl NetworkStatus {
    /// Project a connection state. Healthy states show no indicator.
    pub fn from_state(state: ConnectionState) -> Option<Self> {
        match state {
            ConnectionState::Connecting | ConnectionState::Connected => None,
            ConnectionState::Reconnecting => Some(Self::Reconnecting),
            ConnectionState::Reconnected => Some(Self::Reconnected),
            ConnectionState::Disconnected => Some(Self::Disconnected),
        }
    }

    /// Indicator label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Reconnecting => "reconnecting",
            Self::Reconnected => "reconnected",
            Self::Disconnected => "disconnected",
        }
    }
}
