use std::{future::Future, time::Duration};

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::debug;

use crate::config::SamplerConfig;

const PREALLOC_LIMIT: u64 = 1 << 20;

/// Byte transport for sample files.
///
/// `progress` receives `(received, declared_total)` after every chunk.
pub trait ByteFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        progress: &'a mut dyn FnMut(u64, Option<u64>),
    ) -> impl Future<Output = Result<Vec<u8>>> + 'a;
}

pub fn http_client(cfg: &SamplerConfig) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .timeout(Duration::from_secs(cfg.request_timeout_secs))
        .build()
        .context("reqwest client build failed")
}

/// Streams a response body chunk by chunk through reqwest.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ByteFetcher for HttpFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        progress: &'a mut dyn FnMut(u64, Option<u64>),
    ) -> impl Future<Output = Result<Vec<u8>>> + 'a {
        async move {
            let mut resp = self
                .client
                .get(url)
                .send()
                .await
                .with_context(|| format!("GET {url}"))?
                .error_for_status()?;

            let total = resp.content_length().filter(|t| *t > 0);
            debug!(url, ?total, "sample transfer started");

            // Content-Length is server-controlled, so the up-front reservation is capped.
            let mut bytes = Vec::with_capacity(total.map_or(0, |t| t.min(PREALLOC_LIMIT) as usize));
            progress(0, total);
            while let Some(chunk) = resp.chunk().await.context("reading response body")? {
                bytes.extend_from_slice(&chunk);
                progress(bytes.len() as u64, total);
            }

            debug!(url, received = bytes.len(), "sample transfer finished");
            Ok(bytes)
        }
    }
}

/// Turns a catalog sample url into something fetchable.
#[derive(Clone, Debug)]
pub struct UrlResolver {
    base: String,
}

impl UrlResolver {
    pub fn new(base: impl Into<String>) -> Self {
        let base: String = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// `None` for an empty locator; absolute http(s) urls pass through.
    pub fn resolve(&self, url: &str) -> Option<String> {
        let url = url.trim();
        if url.is_empty() {
            return None;
        }
        if url.starts_with("http://") || url.starts_with("https://") {
            return Some(url.replace(' ', "%20"));
        }
        let rel = url.trim_start_matches("./").trim_start_matches('/');
        Some(format!("{}/{}", self.base, rel.replace(' ', "%20")))
    }
}
