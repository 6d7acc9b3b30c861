use crate::{domain::MemeSource, errors::SourceError, models::ApiMeme};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{self, info};

pub const DEFAULT_MEME_API_URL: &str = "https://meme-api.com/gimme";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct HttpMemeSource {
    client: reqwest::Client,
    api_url: String,
}

impl HttpMemeSource {
    /// Creates a source for `api_url`, with every request bounded by `timeout`.
    pub fn new(api_url: String, timeout: Duration) -> Result<Self, SourceError> {
        info!(%api_url, timeout_secs = timeout.as_secs(), "Initializing HttpMemeSource");
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SourceError::Transport)?;
        Ok(Self { client, api_url })
    }
}

#[async_trait]
impl MemeSource for HttpMemeSource {
    /// One `GET` against the meme endpoint. Non-2xx responses are errors.
    async fn fetch(&self) -> Result<ApiMeme, SourceError> {
        let resp = self
            .client
            .get(&self.api_url)
            .send()
            .await? // Connect/timeout errors -> SourceError::Transport
            .error_for_status()?; // Non-2xx -> SourceError::Status

        let body = resp.text().await?; // Decoded by serde_json below, not reqwest
        tracing::debug!(bytes = body.len(), "Meme API responded");
        parse_response(&body)
    }
}

/// Decodes a response body. Anything but a JSON object is rejected.
fn parse_response(body: &str) -> Result<ApiMeme, SourceError> {
    serde_json::from_str(body).map_err(|e| SourceError::Decode(e.to_string()))
}
