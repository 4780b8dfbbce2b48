//! reqwest によるローカル受信サーバーへの送信

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::snapshot::PresenceSnapshot;
use crate::traits::Receiver;

pub const STATUS_PATH: &str = "/status";
pub const RECEIVE_PATH: &str = "/receive_from_2kki";

#[derive(Debug, Clone)]
pub struct HttpReceiver {
    http: Client,
    base_url: String,
}

impl HttpReceiver {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RelayError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &RelayConfig) -> Result<Self, RelayError> {
        Self::new(config.receiver_url.clone(), config.http_timeout)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Receiver for HttpReceiver {
    async fn is_live(&self) -> bool {
        match self.http.get(self.url(STATUS_PATH)).send().await {
            Ok(response) => {
                let ok = response.status().is_success();
                if !ok {
                    debug!(status = %response.status(), "Receiver status check returned non-success");
                }
                ok
            }
            Err(err) => {
                debug!(error = %err, "Receiver status check failed");
                false
            }
        }
    }

    async fn deliver(&self, snapshot: &PresenceSnapshot) -> Result<u16, RelayError> {
        let response = self
            .http
            .post(self.url(RECEIVE_PATH))
            .header(CONTENT_TYPE, "application/json")
            .json(snapshot)
            .send()
            .await?;
        Ok(response.status().as_u16())
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// 受信サーバーの稼働確認（2xx応答なら稼働中）
pub async fn check_server_status(url: &str) -> bool {
    let client = match Client::builder().timeout(Duration::from_secs(5)).build() {
        Ok(client) => client,
        Err(err) => {
            debug!(error = %err, "Failed to build HTTP client");
            return false;
        }
    };
    match client.get(url).send().await {
        Ok(response) => response.status().is_success(),
        Err(err) => {
            debug!(error = %err, url, "Error checking server status");
            false
        }
    }
}
