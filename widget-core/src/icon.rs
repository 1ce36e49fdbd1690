use serde::Serialize;

/// Icon category for a free-text weather description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherIcon {
    Sunny,
    Cloudy,
    Rain,
    Snow,
    Wind,
}

/// Keyword sets in match priority. Latin keywords are lowercase.
const KEYWORDS: &[(WeatherIcon, &[&str])] = &[
    (WeatherIcon::Sunny, &["晴", "sunny", "clear"]),
    (WeatherIcon::Cloudy, &["云", "阴", "cloud", "overcast"]),
    (WeatherIcon::Rain, &["雨", "rain", "drizzle", "shower"]),
    (WeatherIcon::Snow, &["雪", "snow", "sleet"]),
    (WeatherIcon::Wind, &["风", "wind"]),
];

impl WeatherIcon {
    /// First category with a keyword contained in `description` wins;
    /// anything unrecognised is shown as sunny.
    pub fn classify(description: &str) -> Self {
        let lower = description.to_lowercase();

        KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| lower.contains(*w)))
            .map(|(icon, _)| *icon)
            .unwrap_or(WeatherIcon::Sunny)
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            WeatherIcon::Sunny => "☀",
            WeatherIcon::Cloudy => "☁",
            WeatherIcon::Rain => "🌧",
            WeatherIcon::Snow => "❄",
            WeatherIcon::Wind => "🌬",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherIcon::Sunny => "sunny",
            WeatherIcon::Cloudy => "cloudy",
            WeatherIcon::Rain => "rain",
            WeatherIcon::Snow => "snow",
            WeatherIcon::Wind => "wind",
        }
    }
}

impl std::fmt::Display for WeatherIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chinese_descriptions() {
        assert_eq!(WeatherIcon::classify("晴"), WeatherIcon::Sunny);
        assert_eq!(WeatherIcon::classify("多云"), WeatherIcon::Cloudy);
        assert_eq!(WeatherIcon::classify("阴"), WeatherIcon::Cloudy);
        assert_eq!(WeatherIcon::classify("小雨"), WeatherIcon::Rain);
        assert_eq!(WeatherIcon::classify("大雪"), WeatherIcon::Snow);
        assert_eq!(WeatherIcon::classify("大风"), WeatherIcon::Wind);
    }

    #[test]
    fn match_is_case_insensitive() {
        assert_eq!(WeatherIcon::classify("SUNNY"), WeatherIcon::Sunny);
        assert_eq!(WeatherIcon::classify("Light Rain"), WeatherIcon::Rain);
        assert_eq!(WeatherIcon::classify("Heavy SNOW"), WeatherIcon::Snow);
        assert_eq!(WeatherIcon::classify("Windy"), WeatherIcon::Wind);
    }

    #[test]
    fn priority_order_decides_mixed_descriptions() {
        assert_eq!(WeatherIcon::classify("晴转多云"), WeatherIcon::Sunny);
        assert_eq!(WeatherIcon::classify("多云转小雨"), WeatherIcon::Cloudy);
        assert_eq!(WeatherIcon::classify("雨夹雪"), WeatherIcon::Rain);
        assert_eq!(WeatherIcon::classify("snow and wind"), WeatherIcon::Snow);
    }

    #[test]
    fn unknown_falls_back_to_sunny() {
        assert_eq!(WeatherIcon::classify("未知"), WeatherIcon::Sunny);
        assert_eq!(WeatherIcon::classify(""), WeatherIcon::Sunny);
        assert_eq!(WeatherIcon::classify("雾"), WeatherIcon::Sunny);
    }
}
