use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

/// A trimmed, non-empty location name entered by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery(String);

impl LocationQuery {
    /// Trim the raw input; blank input is rejected before any network call.
    pub fn parse(raw: &str) -> Result<Self, WeatherError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WeatherError::EmptyInput);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Canonical name and coordinates returned by a successful lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub name: String,
    pub coordinates: Coordinates,
}

/// One 3-hour step of the multi-day forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Provider timestamp text, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    /// Absent when the provider sent no condition for this step.
    pub condition_code: Option<u32>,
    pub condition_description: Option<String>,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub wind_speed: f64,
}

/// Chronologically ordered forecast entries, replaced wholesale on every refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastSnapshot {
    entries: Vec<ForecastEntry>,
}

impl ForecastSnapshot {
    pub fn new(entries: Vec<ForecastEntry>) -> Self {
        Self { entries }
    }

    /// Total accessor: out-of-range offsets yield `None`.
    pub fn entry(&self, index: usize) -> Option<&ForecastEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[ForecastEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_trimmed() {
        let q = LocationQuery::parse("  London \n").expect("non-empty query");
        assert_eq!(q.as_str(), "London");
    }

    #[test]
    fn blank_query_is_rejected() {
        for raw in ["", "   ", "\t\n"] {
            assert_eq!(LocationQuery::parse(raw), Err(WeatherError::EmptyInput));
        }
    }

    #[test]
    fn snapshot_entry_out_of_range_is_none() {
        let snapshot = ForecastSnapshot::default();
        assert!(snapshot.entry(0).is_none());
        assert!(snapshot.entry(38).is_none());
        assert!(snapshot.is_empty());
    }
}
