//! Blocking page fetcher.
//!
//! One synchronous client per scraping session; every facade call blocks
//! until its page is downloaded. Failures propagate to the caller as-is.

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::ScraperConfig;

/// HTTP wrapper resolving site-relative paths against the configured base
/// URL.
#[derive(Debug, Clone)]
pub struct PcsClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl PcsClient {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches a site-relative path (`race/tour-de-france/2021/overview`)
    /// and returns the page body.
    pub fn fetch_page(&self, path: &str) -> Result<String> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!(%url, "fetching page");

        let response = self
            .http
            .get(&url)
            .send()
            .with_context(|| format!("request failed for {url}"))?
            .error_for_status()
            .with_context(|| format!("error status for {url}"))?;

        response
            .text()
            .with_context(|| format!("failed to read body of {url}"))
    }
}
