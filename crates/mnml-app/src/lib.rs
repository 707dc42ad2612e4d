//! Application layer for the mnml chat widget
//!
//! The session controller and a generic runtime, so the exact code that runs
//! behind a real transport also runs under the deterministic test harness.
//!
//! # Components
//!
//! - [`App`]: Session controller (session identity, message log, composition)
//! - [`WidgetConfig`]: Embedder-facing configuration
//! - [`Driver`]: Trait for transport and UI I/O
//! - [`Runtime`]: Event loop owning the typing timer

mod action;
mod app;
mod config;
mod driver;
mod error;
mod event;
mod runtime;
mod state;

pub use action::AppAction;
pub use app::App;
pub use config::{Theme, WidgetConfig};
pub use driver::Driver;
pub use error::AppError;
pub use event::{AppEvent, Key};
pub use runtime::Runtime;
pub use state::NetworkStatus;
