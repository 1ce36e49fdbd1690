use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::model::WeatherSnapshot;

use super::{FetchError, WeatherSource};

const USER_AGENT: &str = concat!("weather-widget/", env!("CARGO_PKG_VERSION"));

/// Reads `/info` from the jinrishici API.
#[derive(Debug, Clone)]
pub struct JinrishiciSource {
    endpoint: String,
    http: Client,
}

impl JinrishiciSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client for weather source")?;

        Ok(Self { endpoint: endpoint.into(), http })
    }
}

#[async_trait]
impl WeatherSource for JinrishiciSource {
    async fn fetch(&self) -> Result<WeatherSnapshot, FetchError> {
        let res = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = res.status();

        if !status.is_success() {
            // The body is only context for the log line.
            let body = res.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body: truncate_body(&body) });
        }

        let body = res.text().await.map_err(FetchError::Transport)?;

        let snapshot: WeatherSnapshot = serde_json::from_str(&body).map_err(FetchError::Decode)?;

        if !snapshot.is_success() {
            return Err(FetchError::Application {
                status: snapshot.status.clone().unwrap_or_default(),
                message: snapshot.message.clone(),
            });
        }

        Ok(snapshot)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
