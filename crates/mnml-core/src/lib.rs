//! mnml session and messaging core
//!
//! Pure state machine logic for the chat widget, completely decoupled from the
//! transport, the UI and the clock.
//!
//! # Architecture
//!
//! Every component here is a deterministic function of its inputs. Time is
//! supplied by the caller as an [`std::time::Instant`]; nothing in this crate
//! sleeps, spawns or performs I/O.
//!
//! State transitions produce declarative actions or signals that describe the
//! intended effect. The application runtime decides how to execute them, which
//! lets the same logic run under a real transport and under the test harness.
//!
//! # Components
//!
//! - [`codec`]: Conversion between [`Message`] and the wire shape
//! - [`aggregate`]: Grouping of consecutive same-sender messages
//! - [`typing`]: Typing indicator debounce state machine
//! - [`connection`]: Connection lifecycle state machine with bounded reconnects
//! - [`transport`]: Events delivered by the transport
//! - [`error`]: Codec and connection error types

pub mod aggregate;
pub mod codec;
pub mod connection;
pub mod error;
pub mod message;
pub mod transport;
pub mod typing;

pub use aggregate::{GroupingPolicy, MessageGroup, combine, group};
pub use connection::{ConnectionAction, ConnectionConfig, ConnectionManager, ConnectionState};
pub use error::{CodecError, ConnectionError};
pub use message::{Delivery, Message, Origin};
pub use transport::TransportEvent;
pub use typing::{PresenceSignal, TYPING_TIMEOUT_DELAY, TypingConfig, TypingDebouncer, TypingState};
