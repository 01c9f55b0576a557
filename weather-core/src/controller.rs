//! Session state for one widget: input text, resolved location, latest
//! forecast, feedback, and the refresh schedule that keeps the forecast fresh.

use std::{sync::Arc, time::Duration};

use tokio::sync::mpsc;

use crate::{
    config::DEFAULT_REFRESH_INTERVAL,
    display::DisplayModel,
    error::FeedbackMessage,
    gateway::WeatherGateway,
    model::{ForecastSnapshot, LocationQuery, ResolvedLocation},
    refresh::{ForecastOutcome, RefreshSubscription},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoLocation,
    Resolved,
    ResolvedWithForecast,
}

/// What applying a forecast tick did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshEvent {
    Updated,
    Failed,
    /// Tick belonged to a location that has since been replaced; dropped.
    Stale,
}

#[derive(Debug)]
pub struct Controller {
    gateway: Arc<dyn WeatherGateway>,
    refresh_interval: Duration,

    query: String,
    location: Option<ResolvedLocation>,
    forecast: Option<ForecastSnapshot>,
    feedback: FeedbackMessage,

    subscription: Option<RefreshSubscription>,
    generation: u64,
    outcomes_tx: mpsc::UnboundedSender<ForecastOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<ForecastOutcome>,
}

impl Controller {
    pub fn new(gateway: Arc<dyn WeatherGateway>) -> Self {
        Self::with_refresh_interval(gateway, DEFAULT_REFRESH_INTERVAL)
    }

    pub fn with_refresh_interval(
        gateway: Arc<dyn WeatherGateway>,
        refresh_interval: Duration,
    ) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();

        Self {
            gateway,
            refresh_interval,
            query: String::new(),
            location: None,
            forecast: None,
            feedback: FeedbackMessage::None,
            subscription: None,
            generation: 0,
            outcomes_tx,
            outcomes_rx,
        }
    }

    /// Replace the input text verbatim.
    pub fn on_input_change(&mut self, text: impl Into<String>) {
        self.query = text.into();
    }

    /// Confirm the current input: validate, resolve, and on success restart the
    /// refresh schedule for the new coordinates.
    ///
    /// Errors never escape; they are turned into the returned feedback.
    pub async fn on_submit(&mut self) -> FeedbackMessage {
        let query = match LocationQuery::parse(&self.query) {
            Ok(query) => query,
            Err(err) => {
                self.feedback = FeedbackMessage::from(&err);
                return self.feedback;
            }
        };

        match self.gateway.resolve_location(&query).await {
            Ok(location) => {
                tracing::info!(name = %location.name, "location resolved");
                self.feedback = FeedbackMessage::None;
                self.start_session(location);
            }
            Err(err) => {
                tracing::error!(%query, error = %err, "error fetching coordinate data");
                self.feedback = FeedbackMessage::from(&err);
            }
        }

        self.feedback
    }

    fn start_session(&mut self, location: ResolvedLocation) {
        if let Some(previous) = self.subscription.take() {
            previous.dispose();
        }

        self.generation += 1;
        self.forecast = None;

        self.subscription = Some(RefreshSubscription::start(
            Arc::clone(&self.gateway),
            location.coordinates,
            self.refresh_interval,
            self.generation,
            self.outcomes_tx.clone(),
        ));
        self.location = Some(location);
    }

    /// Wait for the next forecast tick and apply it.
    ///
    /// Pending forever while no location has been resolved.
    pub async fn next_update(&mut self) -> RefreshEvent {
        match self.outcomes_rx.recv().await {
            Some(outcome) => self.apply_outcome(outcome),
            // the controller holds a sender, so the channel never closes
            None => std::future::pending().await,
        }
    }

    pub(crate) fn apply_outcome(&mut self, outcome: ForecastOutcome) -> RefreshEvent {
        if outcome.generation != self.generation {
            tracing::debug!(
                stale = outcome.generation,
                current = self.generation,
                "discarding forecast for superseded location"
            );
            return RefreshEvent::Stale;
        }

        match outcome.result {
            Ok(snapshot) => {
                tracing::debug!(entries = snapshot.len(), "forecast updated");
                self.forecast = Some(snapshot);
                RefreshEvent::Updated
            }
            Err(err) => {
                tracing::error!(error = %err, "error fetching weather data");
                // previous snapshot stays on screen
                self.feedback = FeedbackMessage::from(&err);
                RefreshEvent::Failed
            }
        }
    }

    /// Stop refreshing; called when the view is torn down.
    pub fn shutdown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            tracing::debug!(generation = subscription.generation(), "refresh stopped");
            subscription.dispose();
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn location(&self) -> Option<&ResolvedLocation> {
        self.location.as_ref()
    }

    pub fn forecast(&self) -> Option<&ForecastSnapshot> {
        self.forecast.as_ref()
    }

    pub fn feedback(&self) -> FeedbackMessage {
        self.feedback
    }

    pub fn is_refreshing(&self) -> bool {
        self.subscription
            .as_ref()
            .is_some_and(RefreshSubscription::is_active)
    }

    pub fn state(&self) -> SessionState {
        match (&self.location, &self.forecast) {
            (None, _) => SessionState::NoLocation,
            (Some(_), None) => SessionState::Resolved,
            (Some(_), Some(_)) => SessionState::ResolvedWithForecast,
        }
    }

    pub fn display(&self) -> DisplayModel {
        DisplayModel::derive(self.location.as_ref(), self.forecast.as_ref(), self.feedback)
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.shutdown();
    }
}
