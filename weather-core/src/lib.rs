//! Core library for the `weather` widget.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The remote gateway for location lookup and forecasts
//! - The session controller with its periodic forecast refresh
//! - Display values derived from a forecast, and their labeled rendering
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod gateway;
pub mod model;
pub mod refresh;

pub use config::Config;
pub use controller::{Controller, RefreshEvent, SessionState};
pub use display::{DisplayModel, RenderedLine, render_lines};
pub use error::{FeedbackMessage, WeatherError};
pub use gateway::{OpenWeatherGateway, WeatherGateway};
pub use model::{Coordinates, ForecastEntry, ForecastSnapshot, LocationQuery, ResolvedLocation};
pub use refresh::RefreshSubscription;
