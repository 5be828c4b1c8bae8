// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Branding fetcher — downloads header/footer logos for generated documents.
//
// A logo that cannot be fetched (timeout, DNS failure, non-2xx status) is
// logged and left out; document generation never fails because of branding.
// Successful downloads are cached by URL for the life of the process.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use formwerk_core::config::BrandingConfig;
use formwerk_core::error::{FormwerkError, Result};
use formwerk_document::Branding;

/// HTTP logo downloader with a process-wide success cache.
pub struct LogoFetcher {
    client: reqwest::Client,
    cache: RwLock<HashMap<String, Vec<u8>>>,
}

impl LogoFetcher {
    /// Build a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("formwerk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FormwerkError::Branding(format!("build HTTP client: {e}")))?;
        Ok(Self {
            client,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Fetch logo bytes, or `None` if they are unavailable for any reason.
    #[instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        if let Some(bytes) = self.cache.read().await.get(url) {
            debug!(bytes = bytes.len(), "logo served from cache");
            return Some(bytes.clone());
        }

        match self.download(url).await {
            Ok(bytes) => {
                info!(bytes = bytes.len(), "logo downloaded");
                self.cache
                    .write()
                    .await
                    .insert(url.to_string(), bytes.clone());
                Some(bytes)
            }
            Err(e) => {
                warn!(error = %e, "logo unavailable, continuing without it");
                None
            }
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FormwerkError::Branding(format!("GET {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FormwerkError::Branding(format!("GET {url}: HTTP {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FormwerkError::Branding(format!("read body of {url}: {e}")))?;
        Ok(bytes.to_vec())
    }

    /// Resolve both logos concurrently and combine them with the configured
    /// footer text into a [`Branding`].
    pub async fn branding(&self, config: &BrandingConfig) -> Branding {
        let (header, footer) = tokio::join!(
            self.fetch_optional(config.header_logo_url.as_deref()),
            self.fetch_optional(config.footer_logo_url.as_deref()),
        );
        Branding::from_config(config).with_logos(header, footer)
    }

    async fn fetch_optional(&self, url: Option<&str>) -> Option<Vec<u8>> {
        match url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => self.fetch(url).await,
            None => None,
        }
    }
}
