//! Values the view renders, derived from a forecast snapshot.
//!
//! Every accessor is total: a missing entry or field yields `None` and the
//! renderer skips the line instead of failing.

use chrono::{Datelike, NaiveDateTime};

use crate::{
    error::FeedbackMessage,
    model::{ForecastEntry, ForecastSnapshot, ResolvedLocation},
};

/// Entry offsets for the forecast strip: roughly +2, +3, +4 and +5 days at 3-hour steps.
pub const FORECAST_OFFSETS: [usize; 4] = [15, 23, 31, 38];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentConditions {
    pub icon_code: Option<u32>,
    pub description: Option<String>,
    pub temperature: Option<i64>,
    pub feels_like: Option<i64>,
    pub humidity: Option<i64>,
    pub wind_speed: Option<i64>,
}

impl CurrentConditions {
    pub fn from_snapshot(snapshot: &ForecastSnapshot) -> Self {
        let Some(entry) = snapshot.entry(0) else {
            return Self::default();
        };

        Self {
            icon_code: entry.condition_code,
            description: entry.condition_description.clone(),
            temperature: truncate(entry.temperature),
            feels_like: truncate(entry.feels_like),
            humidity: truncate(entry.humidity),
            wind_speed: truncate(entry.wind_speed),
        }
    }
}

/// One slot of the forecast strip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForecastDay {
    pub date_label: Option<String>,
    pub icon_code: Option<u32>,
    pub description: Option<String>,
    pub temperature: Option<i64>,
}

impl ForecastDay {
    fn from_entry(entry: Option<&ForecastEntry>) -> Self {
        let Some(entry) = entry else {
            return Self::default();
        };

        Self {
            date_label: month_day(&entry.timestamp),
            icon_code: entry.condition_code,
            description: entry.condition_description.clone(),
            temperature: truncate(entry.temperature),
        }
    }
}

pub fn forecast_strip(snapshot: &ForecastSnapshot) -> Vec<ForecastDay> {
    FORECAST_OFFSETS
        .iter()
        .map(|&offset| ForecastDay::from_entry(snapshot.entry(offset)))
        .collect()
}

/// Everything the view needs for one render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayModel {
    pub location_name: Option<String>,
    /// `None` until the first forecast arrives.
    pub current: Option<CurrentConditions>,
    pub forecast: Vec<ForecastDay>,
    pub feedback: FeedbackMessage,
}

impl DisplayModel {
    pub fn derive(
        location: Option<&ResolvedLocation>,
        snapshot: Option<&ForecastSnapshot>,
        feedback: FeedbackMessage,
    ) -> Self {
        Self {
            location_name: location.map(|l| l.name.clone()),
            current: snapshot.map(CurrentConditions::from_snapshot),
            forecast: snapshot.map(forecast_strip).unwrap_or_default(),
            feedback,
        }
    }
}

/// Discard the fractional part; never rounds.
pub fn truncate(value: f64) -> Option<i64> {
    value.is_finite().then(|| value.trunc() as i64)
}

/// `"2024-05-03 12:00:00"` -> `"5/3"`.
pub fn month_day(timestamp: &str) -> Option<String> {
    let parsed = NaiveDateTime::parse_from_str(timestamp.trim(), TIMESTAMP_FORMAT).ok()?;
    Some(format!("{}/{}", parsed.month(), parsed.day()))
}

/// Weather-icons class for an OpenWeather condition code.
pub fn icon_class(code: u32) -> String {
    format!("wi-owm-{code}")
}

/// A rendered line, tagged so callers can look values up by label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub label: &'static str,
    pub text: String,
}

impl RenderedLine {
    fn new(label: &'static str, text: String) -> Self {
        Self { label, text }
    }
}

pub fn render_lines(model: &DisplayModel) -> Vec<RenderedLine> {
    let mut lines = Vec::new();

    if let Some(current) = &model.current {
        if let Some(code) = current.icon_code {
            lines.push(RenderedLine::new("iconLabel", icon_class(code)));
        }
        if let Some(temp) = current.temperature {
            lines.push(RenderedLine::new("tempLabel", format!("{temp}°F")));
        }
        if let Some(description) = &current.description {
            lines.push(RenderedLine::new("descriptionLabel", description.clone()));
        }
        if let Some(name) = &model.location_name {
            lines.push(RenderedLine::new("locationLabel", name.clone()));
        }
        if let Some(feels) = current.feels_like {
            lines.push(RenderedLine::new("feelsLabel", format!("{feels}°F")));
        }
        if let Some(humidity) = current.humidity {
            lines.push(RenderedLine::new("humidityLabel", format!("{humidity}%")));
        }
        if let Some(wind) = current.wind_speed {
            lines.push(RenderedLine::new("windLabel", format!("{wind} mph")));
        }
    }

    if !model.feedback.is_none() {
        lines.push(RenderedLine::new("feedbackLabel", model.feedback.to_string()));
    }

    if model.current.is_some() {
        for day in &model.forecast {
            if let Some(date) = &day.date_label {
                lines.push(RenderedLine::new("dateLabel", date.clone()));
            }
            if let Some(code) = day.icon_code {
                lines.push(RenderedLine::new("iconLabel", icon_class(code)));
            }
            if let Some(temp) = day.temperature {
                lines.push(RenderedLine::new("tempLabel", format!("{temp}°F")));
            }
            if let Some(description) = &day.description {
                lines.push(RenderedLine::new("descriptionLabel", description.clone()));
            }
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinates;

    fn entry(timestamp: &str, temp: f64) -> ForecastEntry {
        ForecastEntry {
            timestamp: timestamp.to_string(),
            condition_code: Some(803),
            condition_description: Some("broken clouds".to_string()),
            temperature: temp,
            feels_like: temp - 1.5,
            humidity: 72.0,
            wind_speed: 9.95,
        }
    }

    fn snapshot(len: usize) -> ForecastSnapshot {
        ForecastSnapshot::new(
            (0..len)
                .map(|i| {
                    let day = 1 + i / 8;
                    let hour = (i % 8) * 3;
                    entry(&format!("2024-05-{day:02} {hour:02}:00:00"), 50.0 + i as f64 + 0.9)
                })
                .collect(),
        )
    }

    #[test]
    fn truncation_never_rounds() {
        assert_eq!(truncate(59.9), Some(59));
        assert_eq!(truncate(-3.7), Some(-3));
        assert_eq!(truncate(0.0), Some(0));
        assert_eq!(truncate(f64::NAN), None);
    }

    #[test]
    fn month_day_has_no_padding() {
        assert_eq!(month_day("2024-05-03 12:00:00").as_deref(), Some("5/3"));
        assert_eq!(month_day("2024-12-25 00:00:00").as_deref(), Some("12/25"));
        assert_eq!(month_day("not a date"), None);
        assert_eq!(month_day(""), None);
    }

    #[test]
    fn current_conditions_read_first_entry() {
        let current = CurrentConditions::from_snapshot(&snapshot(1));

        assert_eq!(current.icon_code, Some(803));
        assert_eq!(current.temperature, Some(50));
        assert_eq!(current.feels_like, Some(49));
        assert_eq!(current.humidity, Some(72));
        assert_eq!(current.wind_speed, Some(9));
    }

    #[test]
    fn empty_snapshot_yields_blank_conditions() {
        let current = CurrentConditions::from_snapshot(&ForecastSnapshot::default());
        assert_eq!(current, CurrentConditions::default());
    }

    #[test]
    fn forecast_strip_samples_fixed_offsets() {
        let strip = forecast_strip(&snapshot(40));

        assert_eq!(strip.len(), 4);
        // index 15 -> day 2, 21:00
        assert_eq!(strip[0].date_label.as_deref(), Some("5/2"));
        assert_eq!(strip[0].temperature, Some(65));
        assert_eq!(strip[1].date_label.as_deref(), Some("5/3"));
        assert_eq!(strip[2].date_label.as_deref(), Some("5/4"));
        assert_eq!(strip[3].date_label.as_deref(), Some("5/5"));
        assert_eq!(strip[3].temperature, Some(88));
    }

    #[test]
    fn short_snapshot_leaves_late_slots_empty() {
        let strip = forecast_strip(&snapshot(15));
        assert!(strip.iter().all(|day| *day == ForecastDay::default()));

        let strip = forecast_strip(&snapshot(24));
        assert!(strip[0].temperature.is_some());
        assert!(strip[1].temperature.is_some());
        assert_eq!(strip[2], ForecastDay::default());
        assert_eq!(strip[3], ForecastDay::default());
    }

    #[test]
    fn render_without_forecast_shows_only_feedback() {
        let model = DisplayModel::derive(None, None, FeedbackMessage::EmptyInput);
        let lines = render_lines(&model);

        assert_eq!(
            lines,
            vec![RenderedLine::new("feedbackLabel", "Please enter a location".into())]
        );
    }

    #[test]
    fn render_tags_every_current_value() {
        let location = ResolvedLocation {
            name: "London".into(),
            coordinates: Coordinates { latitude: 51.51, longitude: -0.13 },
        };
        let snap = ForecastSnapshot::new(vec![entry("2024-05-01 00:00:00", 59.9)]);
        let model = DisplayModel::derive(Some(&location), Some(&snap), FeedbackMessage::None);
        let lines = render_lines(&model);

        let find = |label: &str| {
            lines
                .iter()
                .find(|l| l.label == label)
                .map(|l| l.text.as_str())
        };

        assert_eq!(find("tempLabel"), Some("59°F"));
        assert_eq!(find("feelsLabel"), Some("58°F"));
        assert_eq!(find("humidityLabel"), Some("72%"));
        assert_eq!(find("windLabel"), Some("9 mph"));
        assert_eq!(find("locationLabel"), Some("London"));
        assert_eq!(find("iconLabel"), Some("wi-owm-803"));
        assert_eq!(find("feedbackLabel"), None);
        // one entry: no forecast slot has a date
        assert_eq!(find("dateLabel"), None);
    }
}
