//! Wire format for the mnml chat relay protocol.
//!
//! The relay transport carries discrete named events. Every payload is a JSON
//! document serialized to a string before it is handed to the transport, so
//! the transport itself never inspects message structure.
//!
//! | Event | Direction | Payload |
//! |---|---|---|
//! | `server:session` | inbound | [`Session`] |
//! | `client:message` | outbound | [`WireMessage`] with body |
//! | `server:message` | inbound | [`WireMessage`] with body |
//! | `client:typing` | outbound | [`WireMessage`] without body |
//! | `client:idle` | outbound | [`WireMessage`] without body |
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod errors;
pub mod events;
pub mod ids;
pub mod message;

pub use errors::{ProtocolError, Result};
pub use events::{Direction, EventName, OutboundEvent};
pub use ids::{ClientId, ClientRef, Session, SessionId};
pub use message::WireMessage;
