//! Turns a [`WidgetView`] into terminal text or a status-bar JSON object.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::{
    Breakpoints,
    icon::WeatherIcon,
    state::{ReadyView, WidgetView},
};

pub const LOADING_TEXT: &str = "加载天气中...";
pub const UNAVAILABLE_TEXT: &str = "天气不可用";

/// Points from the tooltip up at the pill.
pub const TOOLTIP_POINTER: &str = "▲";

/// Pulsing and static variants of the loading/unavailable cloud.
const CLOUD_PULSE: &str = "☁…";
const CLOUD: &str = "☁";

fn pill(parts: &[&str]) -> String {
    format!("( {} )", parts.join(" "))
}

/// Pill line, followed by the tooltip lines while hovering.
///
/// Nothing is rendered for [`WidgetView::Hidden`] or when `width` is below
/// `breakpoints.hide_below`. Below `breakpoints.text_below` only icons and
/// the temperature are kept.
pub fn render_text(view: &WidgetView, breakpoints: &Breakpoints, width: u16) -> String {
    if width < breakpoints.hide_below {
        return String::new();
    }
    let wide = width >= breakpoints.text_below;

    match view {
        WidgetView::Hidden => String::new(),
        WidgetView::Loading if wide => pill(&[CLOUD_PULSE, LOADING_TEXT]),
        WidgetView::Loading => pill(&[CLOUD_PULSE]),
        WidgetView::Unavailable { .. } => pill(&[CLOUD, UNAVAILABLE_TEXT]),
        WidgetView::Ready(ready) => render_ready(ready, wide),
    }
}

fn render_ready(ready: &ReadyView, wide: bool) -> String {
    let temperature = ready.temperature_label();
    let mut parts = vec![ready.icon.glyph(), temperature.as_str()];
    if wide {
        parts.push(ready.fields.weather.as_str());
    }

    let mut out = pill(&parts);
    if let Some(location) = ready.tooltip() {
        out.push_str(&format!("\n  {TOOLTIP_POINTER}\n  {location}"));
    }
    out
}

/// A custom-module object for bars like waybar. The bar owns hover, so the
/// tooltip is always filled in for a ready view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBarModule {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<WeatherIcon>,
}

impl StatusBarModule {
    pub fn from_view(view: &WidgetView) -> Self {
        match view {
            WidgetView::Hidden => {
                Self { text: String::new(), tooltip: None, class: None, alt: None }
            }
            WidgetView::Loading => Self {
                text: format!("{CLOUD} {LOADING_TEXT}"),
                tooltip: None,
                class: Some("loading"),
                alt: None,
            },
            WidgetView::Unavailable { reason } => Self {
                text: format!("{CLOUD} {UNAVAILABLE_TEXT}"),
                tooltip: reason.clone(),
                class: Some("unavailable"),
                alt: None,
            },
            WidgetView::Ready(ready) => {
                let f = &ready.fields;
                let mut tooltip = format!(
                    "{}\n湿度 {} · 风 {} · 空气质量 {}",
                    ready.location, f.humidity, f.wind, f.air_quality
                );
                if let Some(at) = ready.updated_at {
                    tooltip.push_str(&format!("\n{}", updated_label(at)));
                }

                Self {
                    text: format!("{} {} {}", ready.icon.glyph(), f.temperature_label(), f.weather),
                    tooltip: Some(tooltip),
                    class: Some("ready"),
                    alt: Some(ready.icon),
                }
            }
        }
    }
}

/// Local wall-clock time of the last successful fetch, e.g. `更新于 14:05`.
pub fn updated_label(at: DateTime<Utc>) -> String {
    format!("更新于 {}", at.with_timezone(&Local).format("%H:%M"))
}

pub fn render_json(view: &WidgetView) -> serde_json::Result<String> {
    serde_json::to_string(&StatusBarModule::from_view(view))
}
