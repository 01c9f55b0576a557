use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::WeatherError,
    model::{Coordinates, ForecastSnapshot, LocationQuery, ResolvedLocation},
};

pub mod openweather;

pub use openweather::OpenWeatherGateway;

/// Remote lookups the controller depends on.
///
/// Implementations perform a single request per call: no retries, no caching.
/// Failures are returned, not logged; the caller decides how to surface them.
#[async_trait]
pub trait WeatherGateway: Send + Sync + Debug {
    async fn resolve_location(
        &self,
        query: &LocationQuery,
    ) -> Result<ResolvedLocation, WeatherError>;

    async fn fetch_forecast(
        &self,
        coordinates: Coordinates,
    ) -> Result<ForecastSnapshot, WeatherError>;
}
