use crate::{SourceConfig, model::WeatherSnapshot};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::fmt::Debug;

pub mod jinrishici;

pub use jinrishici::JinrishiciSource;

/// Shown for a transport failure (DNS, connect, timeout, ...).
pub const MSG_NETWORK: &str = "网络请求失败";
/// Shown for a non-OK HTTP status, and for a failed status without message.
pub const MSG_FETCH_FAILED: &str = "获取天气失败";
/// Shown when the body is not JSON.
pub const MSG_DECODE: &str = "天气数据解析失败";

/// Ways a single fetch can fail. Each one ends up as the widget's error text.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to weather endpoint failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("weather endpoint returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error(
        "weather endpoint reported status '{status}': {}",
        .message.as_deref().unwrap_or("no message")
    )]
    Application {
        status: String,
        message: Option<String>,
    },

    #[error("failed to decode weather payload: {0}")]
    Decode(#[source] serde_json::Error),
}

impl FetchError {
    /// Short localized text for the pill's error state.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Transport(_) => MSG_NETWORK.to_string(),
            FetchError::Status { .. } => MSG_FETCH_FAILED.to_string(),
            FetchError::Application { message, .. } => message
                .as_deref()
                .filter(|m| !m.is_empty())
                .unwrap_or(MSG_FETCH_FAILED)
                .to_string(),
            FetchError::Decode(_) => MSG_DECODE.to_string(),
        }
    }
}

/// A polled source of weather snapshots. The scheduler only talks to this
/// trait, so tests can drive it with an in-memory implementation.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch(&self) -> Result<WeatherSnapshot, FetchError>;
}

/// Construct the HTTP source described by `config`.
pub fn source_from_config(config: &SourceConfig) -> anyhow::Result<Box<dyn WeatherSource>> {
    let source = JinrishiciSource::new(&config.endpoint, config.timeout())?;
    Ok(Box::new(source))
}
