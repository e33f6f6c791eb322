use crate::{Error, Result};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.dev.runwayml.com";
const VERSION_HEADER: &str = "X-Runway-Version";

/// Authenticated JSON transport for the Runway REST API.
pub struct RunwayHttpClient {
    client: Client,
    api_key: String,
    api_version: String,
    base_url: String,
    timeout: Duration,
}

impl RunwayHttpClient {
    pub fn new(api_key: String, api_version: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, api_version, timeout, Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        api_version: String,
        timeout: Duration,
        client: Client,
    ) -> Self {
        Self {
            client,
            api_key,
            api_version,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .timeout(self.timeout)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header(VERSION_HEADER, &self.api_version)
    }

    pub async fn post_json<Req: Serialize>(&self, path: &str, request: &Req) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        self.send(self.client.post(&url).json(request)).await
    }

    pub async fn get_json(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        self.send(self.client.get(&url)).await
    }

    /// POST raw bytes to an absolute URL (the asset upload endpoint lives
    /// outside the task API).
    pub async fn post_bytes(&self, url: &str, bytes: Vec<u8>, content_type: &str) -> Result<Value> {
        let builder = self
            .client
            .post(url)
            .header("Content-Type", content_type)
            .body(bytes);
        self.send(builder).await
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Value> {
        let response = self.authorized(builder).send().await.map_err(|e| {
            tracing::error!("Failed to send request to Runway: {}", e);
            e
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!("Runway API error (status {}): {}", status, body);
            return Err(Error::VendorApi {
                status: status.as_u16(),
                message: body.clone(),
                details: serde_json::from_str(&body).ok(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Runway response: {}\nBody: {}", e, body);
            Error::VendorApi {
                status: status.as_u16(),
                message: format!("Failed to parse Runway response: {}", e),
                details: None,
            }
        })
    }
}
