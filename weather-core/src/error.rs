use thiserror::Error;

/// Every failure the widget can surface to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    /// Blank or whitespace-only location; handled locally.
    #[error("location query is empty")]
    EmptyInput,

    #[error("failed to fetch coordinate data: {0}")]
    Resolution(String),

    #[error("failed to fetch weather data: {0}")]
    Forecast(String),
}

/// User-facing message shown under the input field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeedbackMessage {
    #[default]
    None,
    EmptyInput,
    InvalidLocation,
    ForecastFailed,
}

impl FeedbackMessage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackMessage::None => "",
            FeedbackMessage::EmptyInput => "Please enter a location",
            FeedbackMessage::InvalidLocation => "Please provide valid location name",
            FeedbackMessage::ForecastFailed => "Error fetching weather data",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, FeedbackMessage::None)
    }
}

impl std::fmt::Display for FeedbackMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&WeatherError> for FeedbackMessage {
    fn from(err: &WeatherError) -> Self {
        match err {
            WeatherError::EmptyInput => FeedbackMessage::EmptyInput,
            WeatherError::Resolution(_) => FeedbackMessage::InvalidLocation,
            WeatherError::Forecast(_) => FeedbackMessage::ForecastFailed,
        }
    }
}
