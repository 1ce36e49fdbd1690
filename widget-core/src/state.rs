use chrono::{DateTime, Utc};

use crate::{
    icon::WeatherIcon,
    model::WeatherSnapshot,
    provider::FetchError,
    resolve::{WeatherFields, resolve_location, resolve_weather_fields},
};

/// Mutable UI state of one widget instance.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetState {
    pub loading: bool,
    pub error: Option<String>,
    pub hovering: bool,
    pub snapshot: Option<WeatherSnapshot>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self {
            loading: true,
            error: None,
            hovering: false,
            snapshot: None,
            updated_at: None,
        }
    }
}

impl WidgetState {
    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// A success replaces the snapshot wholesale; a failure discards it.
    pub fn finish_fetch(&mut self, result: Result<WeatherSnapshot, FetchError>) {
        self.loading = false;

        match result {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                self.error = None;
                self.updated_at = Some(Utc::now());
            }
            Err(err) => {
                self.snapshot = None;
                self.error = Some(err.user_message());
            }
        }
    }

    pub fn set_hovering(&mut self, hovering: bool) {
        self.hovering = hovering;
    }

    /// Visible state, by precedence loading > error or no data > ready.
    pub fn view(&self) -> WidgetView {
        if self.loading {
            return WidgetView::Loading;
        }

        let snapshot = match (&self.error, &self.snapshot) {
            (None, Some(snapshot)) => snapshot,
            (error, _) => return WidgetView::Unavailable { reason: error.clone() },
        };

        let fields = resolve_weather_fields(snapshot);

        WidgetView::Ready(ReadyView {
            icon: WeatherIcon::classify(&fields.weather),
            location: resolve_location(snapshot),
            fields,
            tooltip_visible: self.hovering,
            updated_at: self.updated_at,
        })
    }
}

/// One of the mutually exclusive render states.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetView {
    /// Disabled or not configured: render nothing.
    Hidden,
    Loading,
    Unavailable { reason: Option<String> },
    Ready(ReadyView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadyView {
    pub icon: WeatherIcon,
    pub fields: WeatherFields,
    pub location: String,
    pub tooltip_visible: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ReadyView {
    pub fn temperature_label(&self) -> String {
        self.fields.temperature_label()
    }

    /// Location text, only while the pointer is over the pill.
    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip_visible.then_some(self.location.as_str())
    }
}
