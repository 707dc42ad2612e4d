//! Widget configuration.
//!
//! The embedding page passes a JSON object; every field is optional.
//!
//! ```json
//! { "attemptCeiling": 5, "typingTimeoutMs": 1000, "startOpen": false, "theme": "messenger" }
//! ```

use std::time::Duration;

use mnml_core::{ConnectionConfig, GroupingPolicy, TypingConfig};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Visual theme. Carried through to the renderer untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Messenger-style panel.
    #[default]
    Messenger,
    /// Floating bubble.
    Float,
    /// Side panel.
    Side,
}

impl Theme {
    /// Theme name as used by the renderer.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Messenger => "messenger",
            Self::Float => "float",
            Self::Side => "side",
        }
    }
}

/// Configuration surface exposed to the embedding UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetConfig {
    /// Reconnect attempts before giving up.
    pub attempt_ceiling: u32,
    /// Inactivity after the last keystroke before sending idle.
    pub typing_timeout_ms: u64,
    /// Whether the widget starts open.
    pub start_open: bool,
    /// Visual theme.
    pub theme: Theme,
    /// Optional cutoff for merging same-sender messages.
    pub group_gap_ms: Option<u64>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        let connection = ConnectionConfig::default();
        let typing = TypingConfig::default();
        Self {
            attempt_ceiling: connection.attempt_ceiling,
            typing_timeout_ms: u64::try_from(typing.timeout.as_millis()).unwrap_or(u64::MAX),
            start_open: false,
            theme: Theme::default(),
            group_gap_ms: None,
        }
    }
}

impl WidgetConfig {
    /// Parse the embedder's JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Settings for the connection state machine.
    pub fn connection(&self) -> ConnectionConfig {
        ConnectionConfig { attempt_ceiling: self.attempt_ceiling }
    }

    /// Settings for the typing debouncer.
    pub fn typing(&self) -> TypingConfig {
        TypingConfig { timeout: Duration::from_millis(self.typing_timeout_ms) }
    }

    /// Settings for message grouping.
    pub fn grouping(&self) -> GroupingPolicy {
        GroupingPolicy { max_gap: self.group_gap_ms.map(Duration::from_millis) }
    }
}
