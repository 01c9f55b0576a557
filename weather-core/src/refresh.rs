//! Repeating forecast fetch bound to one resolved location.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};

use crate::{
    error::WeatherError,
    gateway::WeatherGateway,
    model::{Coordinates, ForecastSnapshot},
};

/// Result of one forecast tick, tagged with the resolution it belongs to.
#[derive(Debug)]
pub struct ForecastOutcome {
    pub generation: u64,
    pub result: Result<ForecastSnapshot, WeatherError>,
}

/// Owned handle to a running refresh schedule.
///
/// The first tick fires immediately, then once per period. Dropping the
/// subscription (or calling [`RefreshSubscription::dispose`]) aborts the task,
/// including a fetch that is still in flight.
#[derive(Debug)]
pub struct RefreshSubscription {
    generation: u64,
    task: JoinHandle<()>,
}

impl RefreshSubscription {
    /// Must be called from within a tokio runtime.
    pub fn start(
        gateway: Arc<dyn WeatherGateway>,
        coordinates: Coordinates,
        period: Duration,
        generation: u64,
        outcomes: mpsc::UnboundedSender<ForecastOutcome>,
    ) -> Self {
        // tokio panics on a zero period
        let period = period.max(Duration::from_millis(1));

        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                tracing::debug!(generation, ?coordinates, "forecast tick");

                let result = gateway.fetch_forecast(coordinates).await;
                if outcomes.send(ForecastOutcome { generation, result }).is_err() {
                    // controller is gone
                    break;
                }
            }
        });

        Self { generation, task }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn dispose(self) {
        drop(self);
    }
}

impl Drop for RefreshSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
