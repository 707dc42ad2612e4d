//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the runtime from a specific transport and
//! renderer. A browser embedding, a terminal demo and the test harness each
//! implement it, while the generic [`crate::Runtime`] handles orchestration.

use std::future::Future;

use mnml_proto::OutboundEvent;

use crate::{App, AppEvent};

/// Abstracts transport and UI I/O for the runtime.
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Wait for the next UI intent or transport event.
    ///
    /// Returns `None` once the widget is shutting down. Must be cancel-safe:
    /// the runtime drops this future when a timer deadline wins the race.
    fn next_event(&mut self) -> impl Future<Output = Option<AppEvent>> + Send;

    /// Hand an event to the transport.
    ///
    /// Fire-and-forget from the app's point of view; the transport owns
    /// buffering and redelivery.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport rejected the event outright.
    fn emit(&mut self, event: OutboundEvent) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Stop the transport's automatic reconnection.
    fn stop_reconnecting(&mut self);

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Close the transport and release resources.
    fn stop(&mut self);
}
