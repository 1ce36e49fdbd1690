//! Shapes of the `/info` payload.
//!
//! The upstream API does not guarantee field types, so every field is
//! decoded leniently: a value of the wrong type reads as absent instead of
//! failing the whole payload.

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// Value of `status` on a successful response.
pub const STATUS_SUCCESS: &str = "success";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub data: Option<SnapshotData>,
}

impl WeatherSnapshot {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(STATUS_SUCCESS)
    }

    pub fn weather_data(&self) -> Option<&WeatherData> {
        self.data.as_ref().and_then(|d| d.weather_data.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotData {
    #[serde(default, deserialize_with = "lenient_object")]
    pub weather_data: Option<WeatherData>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub poetry_tokens: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub inspiration_tokens: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub province: Option<String>,
}

/// `data.weatherData`. Numbers arrive as either JSON numbers or strings and
/// are kept as display text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherData {
    #[serde(default, deserialize_with = "lenient_text")]
    pub temperature: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub humidity: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub weather: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub wind: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub air_quality: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub region: Option<String>,
}

/// Render a JSON scalar as text. Objects, arrays and null read as `None`.
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => Ok(serde_json::from_value(value).ok()),
        _ => Ok(None),
    }
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items.into_iter().filter_map(scalar_text).collect()),
        _ => Ok(Vec::new()),
    }
}
