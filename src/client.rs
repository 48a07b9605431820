use bytes::BytesMut;
use futures::StreamExt;
use reqwest::Client as ReqwestClient;
use std::sync::Arc;
use tracing::debug;
use url::Url;

use crate::{CrawlConfig, Error, Result};

/// Thin wrapper over one shared reqwest client, configured once per crawl
/// run with the user agent, request timeout and redirect policy.
#[derive(Debug)]
pub struct HttpClient {
    client: ReqwestClient,
    config: Arc<CrawlConfig>,
}

impl HttpClient {
    pub fn new(config: Arc<CrawlConfig>) -> Result<Self> {
        let client = ReqwestClient::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(
                config.max_redirects as usize,
            ))
            .build()?;

        Ok(Self { client, config })
    }

    /// Fetches one page body as text. Non-2xx statuses, disallowed content
    /// types and oversized bodies are all errors; callers treat any failure
    /// here as a skipped page.
    pub async fn fetch_html(&self, url: &Url) -> Result<String> {
        debug!(%url, "fetching");

        let response = self.client.get(url.as_str()).send().await?;
        let response = response.error_for_status()?;

        if let Some(content_type) = response.headers().get(reqwest::header::CONTENT_TYPE) {
            let content_type = content_type.to_str().unwrap_or("");
            if !self.is_allowed_content_type(content_type) {
                return Err(Error::UnsupportedContentType(content_type.to_string()));
            }
        }

        if let Some(length) = response.content_length() {
            if length > self.config.max_content_size as u64 {
                return Err(Error::ContentTooLarge {
                    size: length as usize,
                    max: self.config.max_content_size,
                });
            }
        }

        // Stream the body so the size cap holds even without a
        // Content-Length header.
        let mut bytes = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if bytes.len() + chunk.len() > self.config.max_content_size {
                return Err(Error::ContentTooLarge {
                    size: bytes.len() + chunk.len(),
                    max: self.config.max_content_size,
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        debug!(%url, bytes = bytes.len(), "fetched");
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn is_allowed_content_type(&self, content_type: &str) -> bool {
        self.config
            .allowed_content_types
            .iter()
            .any(|allowed| content_type.starts_with(allowed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_content_types() {
        let config = Arc::new(CrawlConfig::new("https://example.com"));
        let client = HttpClient::new(config).unwrap();

        assert!(client.is_allowed_content_type("text/html"));
        assert!(client.is_allowed_content_type("text/html; charset=utf-8"));
        assert!(client.is_allowed_content_type("text/plain"));
        assert!(!client.is_allowed_content_type("image/jpeg"));
        assert!(!client.is_allowed_content_type("application/pdf"));
    }
}
