//! Streaming GET requests for asset downloads.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use reqwest::StatusCode;

use crate::error::{Error, Result};

/// Body of a response, delivered as chunks.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// An opened response whose body has not been read yet.
pub struct RemoteBody {
    /// Response status.
    pub status: StatusCode,
    /// Advertised `content-length`, if the server sent one.
    pub content_length: Option<u64>,
    /// The response body.
    pub body: ByteStream,
}

impl std::fmt::Debug for RemoteBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteBody")
            .field("status", &self.status)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Opens streaming GET requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a GET for `url` and returns as soon as the headers arrive.
    async fn get(&self, url: &str) -> Result<RemoteBody>;
}

/// [`Transport`] backed by `reqwest`.
///
/// Asset URLs are pre-signed, so no credentials are attached.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Builds a transport with a fresh HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(60))
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;
        Ok(Self { client })
    }

    /// Wraps an existing client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<RemoteBody> {
        let response = self.client.get(url).send().await?;
        Ok(RemoteBody {
            status: response.status(),
            content_length: response.content_length(),
            body: response.bytes_stream().map_err(Error::from).boxed(),
        })
    }
}
