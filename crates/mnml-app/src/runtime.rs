//! Generic runtime loop.
//!
//! Events are handled strictly one at a time: the loop waits for either the
//! next driver event or the app's earliest timer deadline, feeds exactly one
//! event to [`App::handle`] and executes the resulting actions before waiting
//! again. Time comes from `tokio::time`, so tests can run on a paused clock.

use std::time::Instant;

use tokio::time;
use tracing::{debug, warn};

use crate::{App, AppAction, AppError, AppEvent, Driver};

/// Drives an [`App`] with a [`Driver`].
pub struct Runtime<D: Driver> {
    app: App,
    driver: D,
}

impl<D: Driver> Runtime<D> {
    /// Create a runtime around an app and a driver.
    pub fn new(app: App, driver: D) -> Self {
        Self { app, driver }
    }

    /// Current app state.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// The driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Run until the driver reports shutdown.
    ///
    /// On exit the app is torn down (pending typing timeout cancelled) and the
    /// driver stopped. Returns the final app state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails. Transport send failures are
    /// logged and do not stop the loop.
    pub async fn run(mut self) -> Result<(App, D), AppError> {
        self.render()?;

        loop {
            let deadline = self.app.next_deadline();
            let event = tokio::select! {
                event = self.driver.next_event() => match event {
                    Some(event) => event,
                    None => break,
                },
                () = wait_until(deadline) => AppEvent::Tick,
            };

            let actions = self.app.handle(event, now());
            self.execute(actions).await?;
        }

        debug!("runtime shutting down");
        self.app.teardown();
        self.driver.stop();
        Ok((self.app, self.driver))
    }

    async fn execute(&mut self, actions: Vec<AppAction>) -> Result<(), AppError> {
        let mut render = false;
        for action in actions {
            match action {
                AppAction::Emit(event) => {
                    let name = event.name;
                    if let Err(err) = self.driver.emit(event).await {
                        warn!(event = %name, %err, "transport rejected event");
                    }
                },
                AppAction::StopReconnecting => self.driver.stop_reconnecting(),
                AppAction::Render => render = true,
            }
        }

        if render {
            self.render()?;
        }
        Ok(())
    }

    fn render(&mut self) -> Result<(), AppError> {
        self.driver.render(&self.app).map_err(|err| AppError::Driver(Box::new(err)))
    }
}

fn now() -> Instant {
    time::Instant::now().into_std()
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}
