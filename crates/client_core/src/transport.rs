use std::time::Duration;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use shared::{
    domain::{Action, GameSnapshot},
    error::EngineRejection,
    protocol::{PerformActionRequest, StartGameRequest},
};
use tracing::debug;

use crate::{GameTransport, SessionError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One request/response exchange per call; no retries, no caching.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    async fn exchange(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> Result<GameSnapshot, SessionError> {
        debug!(url, "transport: dispatching exchange");
        let response = request
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|err| SessionError::Transport(format!("{url}: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            // The engine reports failures as {"detail": "..."}; anything
            // else degrades to the raw body text.
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<EngineRejection>(&body)
                .map(|rejection| rejection.detail)
                .unwrap_or(body);
            let message = if detail.is_empty() {
                format!("{url} returned {status}")
            } else {
                format!("{url} returned {status}: {detail}")
            };
            return Err(SessionError::Transport(message));
        }

        let body = response
            .text()
            .await
            .map_err(|err| SessionError::Transport(format!("{url}: {err}")))?;
        serde_json::from_str(&body).map_err(|err| SessionError::Decode(format!("{url}: {err}")))
    }
}

#[async_trait]
impl GameTransport for HttpTransport {
    async fn start_session(
        &self,
        name: &str,
        credit_hours: u32,
    ) -> Result<GameSnapshot, SessionError> {
        let url = format!("{}/game/start", self.base_url);
        let request = self.http.post(&url).json(&StartGameRequest {
            name: name.to_string(),
            credit_hours,
        });
        self.exchange(request, &url).await
    }

    async fn submit_action(
        &self,
        player_name: &str,
        action: Action,
    ) -> Result<GameSnapshot, SessionError> {
        let url = format!("{}/game/{player_name}/action", self.base_url);
        let request = self.http.post(&url).json(&PerformActionRequest { action });
        self.exchange(request, &url).await
    }

    async fn fetch_status(&self, player_name: &str) -> Result<GameSnapshot, SessionError> {
        let url = format!("{}/game/{player_name}/status", self.base_url);
        self.exchange(self.http.get(&url), &url).await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
