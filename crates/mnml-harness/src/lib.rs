//! Deterministic simulation harness for mnml widget testing.
//!
//! - [`SimDriver`]: channel-fed [`mnml_app::Driver`] that records everything
//!   the runtime does, for paused-clock scenario tests
//! - [`Relay`]: in-memory stand-in for the relay server, routing events
//!   between several [`mnml_app::App`]s
//! - [`model`]: reference model and operation alphabet for model-based tests

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod model;
pub mod relay;
pub mod sim_driver;

pub use model::{ModelWidget, Operation};
pub use relay::Relay;
pub use sim_driver::{SentEvent, SimDriver, SimError, SimHandle, sim_driver};

/// Install a `tracing` subscriber honouring `RUST_LOG`, once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
