//! App events
//!
//! Inputs to the [`crate::App`] state machine: UI intents, transport events
//! and timer ticks.

use mnml_core::TransportEvent;

use crate::config::Theme;

/// Key pressed in the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Return key; ends the typing indicator.
    Enter,
    /// Printable character.
    Char(char),
    /// Anything else (arrows, backspace, ...).
    Other,
}

/// Events consumed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Open or close the widget.
    ToggleOpen(bool),

    /// Composer text changed.
    DraftChanged(String),

    /// Key pressed in the composer.
    KeyPress(Key),

    /// User is typing, without a key shape attached.
    Keystroke,

    /// User submitted the composer; ends the typing indicator only.
    Submit,

    /// Send the current draft as a chat message.
    SendMessage,

    /// Switch the visual theme.
    SetTheme(Theme),

    /// Something arrived from the transport.
    Transport(TransportEvent),

    /// Timer deadline reached.
    Tick,
}
