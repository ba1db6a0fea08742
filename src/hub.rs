use crate::tile::TilePayload;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::debug;

/// Submission seam to the external push hub. Success means the hub accepted
/// the payload, not that any device received it.
#[async_trait]
pub trait NotificationHub: Send + Sync {
    async fn submit(&self, payload: &TilePayload) -> Result<()>;
}

pub struct HttpNotificationHub {
    url: String,
    platform: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpNotificationHub {
    pub fn new(url: &str, platform: &str, api_key: Option<&str>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("cointile/0.1")
            .build()?;
        Ok(HttpNotificationHub {
            url: url.to_string(),
            platform: platform.to_string(),
            api_key: api_key.map(str::to_string),
            client,
        })
    }
}

#[async_trait]
impl NotificationHub for HttpNotificationHub {
    async fn submit(&self, payload: &TilePayload) -> Result<()> {
        let envelope = json!({
            "platform": self.platform,
            "submitted_at": Utc::now().to_rfc3339(),
            "tiles": payload,
        });
        debug!("Submitting tile payload to hub at {}", self.url);

        let mut request = self.client.post(&self.url).json(&envelope);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to submit payload to hub: {}", self.url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Hub rejected submission: {status}, response body: {body}"
            ));
        }
        Ok(())
    }
}
