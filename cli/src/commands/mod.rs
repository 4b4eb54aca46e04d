//! CLI Commands

pub mod config;
pub mod forms;
pub mod users;

use serde::de::DeserializeOwned;

/// API client
pub struct ApiClient {
    pub base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, String> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "GET");
        let resp = self.client.get(&url).send().await.map_err(|e| e.to_string())?;
        Self::read(resp).await
    }

    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(&self, path: &str, body: &B) -> Result<T, String> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "POST");
        let resp = self.client.post(&url).json(body).send().await.map_err(|e| e.to_string())?;
        Self::read(resp).await
    }

    /// Decodes a success body, or surfaces the server's `{message}`.
    async fn read<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, String> {
        let status = resp.status();
        let json: serde_json::Value = resp.json().await.map_err(|e| e.to_string())?;
        if !status.is_success() {
            let message = json.get("message").and_then(|m| m.as_str()).unwrap_or("request failed");
            return Err(format!("{status}: {message}"));
        }
        serde_json::from_value(json).map_err(|e| e.to_string())
    }
}
