//! Where feed bytes come from

use std::time::Duration;

#[cfg(test)]
use mockall::automock;
use tracing::{debug, warn};

use crate::feed::error::{DiscoverError, FetchError};
use crate::feed::resolver::parse_feed;
use crate::feed::types::FeedResolution;

/// A release feed that can be fetched as raw bytes
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    /// Human readable location, used in logs
    fn location(&self) -> String;

    /// Fetches the feed document
    async fn fetch(&self) -> Result<Vec<u8>, FetchError>;
}

/// Feed served over HTTP(S)
pub struct HttpFeedSource {
    client: reqwest::Client,
    url: String,
}

impl HttpFeedSource {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(crate::config::USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl FeedSource for HttpFeedSource {
    fn location(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .header(
                "Accept",
                "application/rss+xml, application/atom+xml, application/xml;q=0.9, */*;q=0.8",
            )
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(self.url.clone()));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(FetchError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            warn!("Feed returned status {}: {}", status, self.url);
            return Err(FetchError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let body = response.bytes().await?;
        debug!("Fetched {} bytes from {}", body.len(), self.url);
        Ok(body.to_vec())
    }
}

/// Fetch a feed and resolve its release candidates
///
/// A body that is empty or only whitespace resolves to no candidates.
pub async fn discover(source: &dyn FeedSource) -> Result<FeedResolution, DiscoverError> {
    let raw = source.fetch().await?;
    if raw.iter().all(u8::is_ascii_whitespace) {
        debug!("Feed at {} is empty", source.location());
        return Ok(FeedResolution::default());
    }
    Ok(parse_feed(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::error::FeedFormatError;
    use mockito::Server;

    const FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <item><title>Godot 4.3 RC 1</title></item>
  <item><title>Maintenance release: Godot 4.2.2</title></item>
</channel></rss>"#;

    fn source(server: &Server) -> HttpFeedSource {
        HttpFeedSource::new(&format!("{}/rss.xml", server.url()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn fetch_returns_body_bytes() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/rss.xml")
            .with_status(200)
            .with_header("content-type", "application/rss+xml")
            .with_body(FEED)
            .create_async()
            .await;

        let body = source(&server).fetch().await.unwrap();

        mock.assert_async().await;
        assert_eq!(body, FEED.as_bytes());
    }

    #[tokio::test]
    async fn fetch_returns_not_found_for_missing_feed() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/rss.xml")
            .with_status(404)
            .create_async()
            .await;

        let result = source(&server).fetch().await;

        assert!(matches!(result, Err(FetchError::NotFound(_))));
    }

    #[tokio::test]
    async fn fetch_returns_rate_limited_with_retry_after() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/rss.xml")
            .with_status(429)
            .with_header("retry-after", "120")
            .create_async()
            .await;

        let result = source(&server).fetch().await;

        assert!(matches!(
            result,
            Err(FetchError::RateLimited {
                retry_after_secs: Some(120)
            })
        ));
    }

    #[tokio::test]
    async fn fetch_returns_invalid_response_for_server_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/rss.xml")
            .with_status(500)
            .create_async()
            .await;

        let result = source(&server).fetch().await;

        assert!(matches!(result, Err(FetchError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn discover_resolves_http_feed() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/rss.xml")
            .with_status(200)
            .with_body(FEED)
            .create_async()
            .await;

        let resolution = discover(&source(&server)).await.unwrap();

        assert_eq!(
            resolution.latest(false).map(|c| c.version.raw()),
            Some("4.2.2")
        );
        assert_eq!(
            resolution.latest(true).map(|c| c.version.raw()),
            Some("4.3-rc1")
        );
    }

    #[tokio::test]
    async fn discover_treats_blank_body_as_empty_feed() {
        let mut mock = MockFeedSource::new();
        mock.expect_fetch().returning(|| Ok(b" \n".to_vec()));
        mock.expect_location().returning(|| "memory".to_string());

        let resolution = discover(&mock).await.unwrap();

        assert_eq!(resolution, FeedResolution::default());
    }

    #[tokio::test]
    async fn discover_reports_format_errors() {
        let mut mock = MockFeedSource::new();
        mock.expect_fetch()
            .returning(|| Ok(b"<html></html>".to_vec()));
        mock.expect_location().returning(|| "memory".to_string());

        let result = discover(&mock).await;

        assert!(matches!(
            result,
            Err(DiscoverError::Format(FeedFormatError::UnrecognizedRoot(root))) if root == "html"
        ));
    }

    #[tokio::test]
    async fn discover_propagates_fetch_errors() {
        let mut mock = MockFeedSource::new();
        mock.expect_fetch()
            .returning(|| Err(FetchError::NotFound("memory".to_string())));
        mock.expect_location().returning(|| "memory".to_string());

        let result = discover(&mock).await;

        assert!(matches!(
            result,
            Err(DiscoverError::Fetch(FetchError::NotFound(_)))
        ));
    }
}
