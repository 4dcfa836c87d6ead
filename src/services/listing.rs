// src/services/listing.rs

//! Listing page retrieval.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::models::SourceConfig;
use crate::utils::http;

/// Something that can produce the listing page HTML.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch the current listing page.
    async fn fetch(&self) -> Result<String>;

    /// Human-readable location, for logs.
    fn location(&self) -> &str;
}

/// Fetches the listing page over HTTP with a single timed GET.
pub struct HttpListing {
    client: Client,
    url: String,
}

impl HttpListing {
    /// Create a listing source from configuration.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        Ok(Self {
            client: http::create_async_client(config)?,
            url: config.listing_url.clone(),
        })
    }
}

#[async_trait]
impl ListingSource for HttpListing {
    async fn fetch(&self) -> Result<String> {
        log::debug!("GET {}", self.url);
        http::fetch_text(&self.client, &self.url).await
    }

    fn location(&self) -> &str {
        &self.url
    }
}

/// Serves a page read from disk, for replaying a saved listing.
pub struct FileListing {
    path: std::path::PathBuf,
    display: String,
}

impl FileListing {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        let path = path.into();
        let display = path.display().to_string();
        Self { path, display }
    }
}

#[async_trait]
impl ListingSource for FileListing {
    async fn fetch(&self) -> Result<String> {
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }

    fn location(&self) -> &str {
        &self.display
    }
}
