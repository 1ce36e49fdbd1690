//! Fallback chains that turn a loosely shaped snapshot into display values.

use serde::Serialize;

use crate::model::WeatherSnapshot;

/// Shown for any numeric-like field the payload did not carry.
pub const PLACEHOLDER: &str = "--";
pub const UNKNOWN_WEATHER: &str = "未知";
pub const UNKNOWN_LOCATION: &str = "未知位置";

/// Joins location parts; also replaces upstream `|` separators.
pub const LOCATION_SEPARATOR: char = '·';

/// Display values read from `data.weatherData`, with placeholders filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherFields {
    pub temperature: String,
    pub humidity: String,
    pub weather: String,
    pub wind: String,
    pub air_quality: String,
}

impl WeatherFields {
    /// Temperature with the Celsius suffix, e.g. `21°C` or `--°C`.
    pub fn temperature_label(&self) -> String {
        format!("{}°C", self.temperature)
    }
}

/// Which path of the location chain produced the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationSource<'a> {
    WeatherRegion(&'a str),
    Region(&'a str),
    Location(&'a str),
    Composed { province: Option<&'a str>, city: Option<&'a str> },
    Unknown,
}

impl<'a> LocationSource<'a> {
    /// Walk the chain in order; the first non-empty candidate wins.
    pub fn of(snapshot: &'a WeatherSnapshot) -> Self {
        let Some(data) = snapshot.data.as_ref() else {
            return LocationSource::Unknown;
        };

        let weather_region = data.weather_data.as_ref().and_then(|w| non_empty(&w.region));

        match (
            weather_region,
            non_empty(&data.region),
            non_empty(&data.location),
            non_empty(&data.province),
            non_empty(&data.city),
        ) {
            (Some(region), ..) => LocationSource::WeatherRegion(region),
            (None, Some(region), ..) => LocationSource::Region(region),
            (None, None, Some(location), ..) => LocationSource::Location(location),
            (None, None, None, None, None) => LocationSource::Unknown,
            (None, None, None, province, city) => LocationSource::Composed { province, city },
        }
    }

    /// Raw text for this source, before separator normalization.
    fn text(&self) -> String {
        match self {
            LocationSource::WeatherRegion(s)
            | LocationSource::Region(s)
            | LocationSource::Location(s) => (*s).to_string(),
            LocationSource::Composed { province, city } => {
                let sep = LOCATION_SEPARATOR.to_string();
                [*province, *city].into_iter().flatten().collect::<Vec<_>>().join(&sep)
            }
            LocationSource::Unknown => UNKNOWN_LOCATION.to_string(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn or_placeholder(value: Option<&String>, placeholder: &str) -> String {
    value
        .filter(|s| !s.is_empty())
        .cloned()
        .unwrap_or_else(|| placeholder.to_string())
}

pub fn resolve_location(snapshot: &WeatherSnapshot) -> String {
    LocationSource::of(snapshot).text().replace('|', &LOCATION_SEPARATOR.to_string())
}

pub fn resolve_weather_fields(snapshot: &WeatherSnapshot) -> WeatherFields {
    let wd = snapshot.weather_data();

    WeatherFields {
        temperature: or_placeholder(wd.and_then(|w| w.temperature.as_ref()), PLACEHOLDER),
        humidity: or_placeholder(wd.and_then(|w| w.humidity.as_ref()), PLACEHOLDER),
        weather: or_placeholder(wd.and_then(|w| w.weather.as_ref()), UNKNOWN_WEATHER),
        wind: or_placeholder(wd.and_then(|w| w.wind.as_ref()), PLACEHOLDER),
        air_quality: or_placeholder(wd.and_then(|w| w.air_quality.as_ref()), PLACEHOLDER),
    }
}
