use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::{error::WeatherError, model::RequestDescriptor};

use super::WeatherProvider;

const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Timeline API client. Executes a prepared request exactly once.
#[derive(Debug, Clone)]
pub struct VisualCrossingProvider {
    http: Client,
}

impl VisualCrossingProvider {
    pub fn new() -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| WeatherError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http })
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl WeatherProvider for VisualCrossingProvider {
    async fn fetch(&self, request: &RequestDescriptor) -> Result<Value, WeatherError> {
        let res = self
            .http
            .get(request.endpoint())
            .query(request.parameters())
            .send()
            .await
            .map_err(|e| transport("failed to send request", e))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| transport("failed to read response body", e))?;

        if !status.is_success() {
            return Err(WeatherError::Transport(format!(
                "request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            WeatherError::MalformedResponse(format!(
                "body is not valid JSON ({e}): {}",
                truncate_body(&body)
            ))
        })
    }
}

/// The request URL carries the API key in its query string, so it never
/// reaches the error text.
fn transport(context: &str, err: reqwest::Error) -> WeatherError {
    WeatherError::Transport(format!("{context}: {}", err.without_url()))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
