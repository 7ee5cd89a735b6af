//! Network fetch boundary and the reqwest-backed implementation.
//!
//! [`NetworkFetcher`] turns a resource identifier into a response or a
//! transport failure. A non-success HTTP status is still a response here:
//! whether it is acceptable is the caller's policy (install rejects it,
//! intercept passes it through to the requester).

use std::time::Duration;

use anyhow::Result;
use futures::future::BoxFuture;
use reqwest::Client;
use tracing::debug;

use crate::error::FetchError;
use crate::models::StoredResponse;

/// HTTP request timeout in seconds.
/// 30s allows for slow asset servers while failing fast enough that an
/// install attempt does not hang the deployment.
const REQUEST_TIMEOUT_SECS: u64 = 30;

pub trait NetworkFetcher: Send + Sync {
    /// Issue a GET for the identifier and materialize whatever the network
    /// produced. `Err` only on transport failure (unreachable host,
    /// timeout); any completed response comes back as `Ok`.
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<StoredResponse, FetchError>>;
}

/// Fetcher backed by reqwest.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    origin: String,
}

impl HttpFetcher {
    /// Create a fetcher that resolves relative manifest paths against
    /// `origin` (e.g. `https://app.example.com`). Absolute URLs in the
    /// manifest pass through untouched.
    pub fn new(origin: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            origin: origin.into().trim_end_matches('/').to_string(),
        })
    }

    fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.origin, url)
        } else {
            format!("{}/{}", self.origin, url)
        }
    }
}

impl NetworkFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<StoredResponse, FetchError>> {
        Box::pin(async move {
            let target = self.resolve(url);

            let response = self
                .client
                .get(&target)
                .send()
                .await
                .map_err(|e| FetchError::network(url, &e.to_string()))?;

            let status = response.status().as_u16();
            let headers: Vec<(String, String)> = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
                .collect();

            let body = response
                .bytes()
                .await
                .map_err(|e| FetchError::network(url, &e.to_string()))?;

            debug!(url = %target, status, bytes = body.len(), "fetched resource");

            Ok(StoredResponse::new(status, headers, body.to_vec()))
        })
    }
}
