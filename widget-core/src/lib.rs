//! Core library for the jinrishici weather widget.
//!
//! This crate defines:
//! - Configuration (host switch, endpoint and polling, responsive breakpoints)
//! - The `/info` payload model and its fallback field resolvers
//! - Abstraction over the weather source, with the HTTP implementation
//! - The widget state machine, its refresh scheduler and renderers
//!
//! It is used by `weather-widget`, but can also be embedded in other hosts.

pub mod config;
pub mod icon;
pub mod model;
pub mod provider;
pub mod render;
pub mod resolve;
pub mod scheduler;
pub mod state;
pub mod widget;

pub use config::{Breakpoints, Config, OverlapPolicy, SourceConfig, WidgetConfig};
pub use icon::WeatherIcon;
pub use model::{SnapshotData, WeatherData, WeatherSnapshot};
pub use provider::{FetchError, JinrishiciSource, WeatherSource, source_from_config};
pub use render::{StatusBarModule, render_json, render_text};
pub use resolve::{LocationSource, WeatherFields, resolve_location, resolve_weather_fields};
pub use state::{ReadyView, WidgetState, WidgetView};
pub use widget::WeatherWidget;
