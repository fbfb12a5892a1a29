#[cfg(test)]
#[path = "legal_api_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Url;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ChatApi;
use crate::domain::models::ChatReply;
use crate::domain::models::ChatRequest;
use crate::domain::models::HistoryResponse;
use crate::domain::models::Message;

pub struct LegalApi {
    url: String,
    timeout: Duration,
    health_check_timeout: Duration,
}

impl Default for LegalApi {
    fn default() -> LegalApi {
        return LegalApi::new(
            &Config::get(ConfigKey::ApiURL),
            Config::get(ConfigKey::RequestTimeout)
                .parse::<u64>()
                .unwrap_or(30000),
            Config::get(ConfigKey::HealthCheckTimeout)
                .parse::<u64>()
                .unwrap_or(1000),
        );
    }
}

impl LegalApi {
    pub fn new(url: &str, timeout_ms: u64, health_check_timeout_ms: u64) -> LegalApi {
        return LegalApi {
            url: url.to_string(),
            timeout: Duration::from_millis(timeout_ms),
            health_check_timeout: Duration::from_millis(health_check_timeout_ms),
        };
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.url)?;
        url.path_segments_mut()
            .map_err(|_| return anyhow!("API URL {} cannot be a base", self.url))?
            .pop_if_empty()
            .extend(segments);

        return Ok(url);
    }
}

#[async_trait]
impl ChatApi for LegalApi {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        let res = reqwest::Client::new()
            .get(self.endpoint(&["health"])?)
            .timeout(self.health_check_timeout)
            .send()
            .await;

        if let Err(err) = &res {
            tracing::error!(error = ?err, "Legal assistant API is not running");
            bail!("Legal assistant API is not running");
        }

        let status = res?.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "Legal assistant API health check failed");
            bail!("Legal assistant API health check failed");
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn history(&self, session_id: &str) -> Result<Vec<Message>> {
        let res = reqwest::Client::new()
            .get(self.endpoint(&["api", "v1", "history", session_id])?)
            .timeout(self.timeout)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                session_id = session_id,
                "Failed to load history"
            );
            bail!("Failed to load history, status {}", res.status().as_u16());
        }

        let body = res.json::<HistoryResponse>().await?;
        tracing::debug!(
            count = body.messages.as_ref().map(|m| return m.len()).unwrap_or(0),
            "History response"
        );

        return Ok(body.messages.unwrap_or_default());
    }

    #[allow(clippy::implicit_return)]
    async fn chat(&self, request: ChatRequest) -> Result<ChatReply> {
        let res = reqwest::Client::new()
            .post(self.endpoint(&["api", "v1", "chat"])?)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                session_id = %request.session_id,
                "Failed to make chat request"
            );
            bail!("Failed to make chat request, status {}", res.status().as_u16());
        }

        let reply = res.json::<ChatReply>().await?;
        tracing::debug!(message_id = %reply.message_id, "Chat response");

        return Ok(reply);
    }
}
