// HTTP/file fetcher for the market data sources.
//
// Every source is a single attempt: no retries, no caching. A location
// without an http(s) scheme is treated as a local file path, which lets
// users point the tool at a downloaded copy of a workbook.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// Thin reqwest wrapper that returns raw bytes for a URL or path.
pub struct SourceClient {
    client: reqwest::Client,
}

impl SourceClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("keystone/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }

    /// Fetch the raw bytes behind `location`.
    pub async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        if !is_remote(location) {
            let path = Path::new(location);
            debug!(path = %path.display(), "Reading local source");
            return tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()));
        }

        debug!(url = location, "GET source");

        let response = self
            .client
            .get(location)
            .send()
            .await
            .with_context(|| format!("Request failed: {location}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "{location} returned {status}: {}",
                crate::output::truncate_chars(body.trim(), 200)
            );
        }

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read response body from {location}"))?;

        debug!(url = location, bytes = bytes.len(), "Fetched source");
        Ok(bytes.to_vec())
    }
}

/// True for http:// and https:// locations.
pub fn is_remote(location: &str) -> bool {
    let lower = location.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
