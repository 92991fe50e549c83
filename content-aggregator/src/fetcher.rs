use crate::traits::ContentFetcher;
use crate::types::{AggregatorError, FetchConfig, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const ACCEPT_VALUE: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// `reqwest`-backed fetcher. The client-wide timeout bounds every single
/// attempt, independent of how many attempts the retry controller makes.
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn classify(url: &str, err: reqwest::Error) -> AggregatorError {
        if err.is_timeout() {
            AggregatorError::Timeout { url: url.to_string() }
        } else {
            AggregatorError::Http(err)
        }
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let start_time = Instant::now();
        debug!("Fetching: {}", url);

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AggregatorError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let limit = self.config.max_body_bytes;
        if let Some(content_length) = response.content_length() {
            let size = usize::try_from(content_length).unwrap_or(usize::MAX);
            if size > limit {
                return Err(AggregatorError::BodyTooLarge { size });
            }
        }

        // Chunked responses carry no length up front; stop reading at the limit.
        let mut buf: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| Self::classify(url, e))? {
            if buf.len() + chunk.len() > limit {
                return Err(AggregatorError::BodyTooLarge {
                    size: buf.len() + chunk.len(),
                });
            }
            buf.extend_from_slice(&chunk);
        }
        let body = String::from_utf8_lossy(&buf).into_owned();

        info!(
            "Fetched {} ({} bytes) in {}ms",
            url,
            body.len(),
            start_time.elapsed().as_millis()
        );
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(FetchConfig {
            timeout_seconds: 5,
            max_body_bytes: 64,
            ..FetchConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn returns_body_on_success() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/feed");
            then.status(200).body("<rss></rss>");
        });

        let body = fetcher().fetch(&server.url("/feed")).await.unwrap();
        mock.assert();
        assert_eq!(body, "<rss></rss>");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/gone");
            then.status(503);
        });

        let err = fetcher().fetch(&server.url("/gone")).await.unwrap_err();
        assert!(matches!(err, AggregatorError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/big");
            then.status(200).body("x".repeat(1024));
        });

        let err = fetcher().fetch(&server.url("/big")).await.unwrap_err();
        assert!(matches!(err, AggregatorError::BodyTooLarge { .. }));
    }

    #[tokio::test]
    async fn body_at_the_limit_is_accepted() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/exact");
            then.status(200).body("y".repeat(64));
        });

        let body = fetcher().fetch(&server.url("/exact")).await.unwrap();
        assert_eq!(body.len(), 64);
    }

    #[tokio::test]
    async fn chunked_body_stops_at_the_limit() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            let _ = socket
                .write_all(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\nContent-Type: text/html\r\n\r\n")
                .await;
            for _ in 0..16 {
                if socket.write_all(b"20\r\nzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz\r\n").await.is_err() {
                    return;
                }
            }
            let _ = socket.write_all(b"0\r\n\r\n").await;
        });

        let err = fetcher().fetch(&format!("http://{addr}/stream")).await.unwrap_err();
        assert!(matches!(err, AggregatorError::BodyTooLarge { size } if size > 64));
    }
}
