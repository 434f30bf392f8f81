//! Byte-stream retrieval keyed by URL.
//!
//! The pipeline only sees the `Fetch` trait so it can run against canned bytes in tests.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{AppError, EXIT_FETCH};

pub trait Fetch: Sync {
    /// Fetch the full body behind `url`.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError>;
}

/// Blocking HTTP fetcher.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(concat!("corona-overview/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::new(EXIT_FETCH, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| AppError::new(EXIT_FETCH, format!("Request to {url} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                EXIT_FETCH,
                format!("Request to {url} failed with status {}.", resp.status()),
            ));
        }

        let body = resp
            .bytes()
            .map_err(|e| AppError::new(EXIT_FETCH, format!("Failed to read response from {url}: {e}")))?;
        tracing::debug!(url, bytes = body.len(), "fetched source");
        Ok(body.to_vec())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use super::*;

    /// Serves canned bodies; unknown URLs fail like an unreachable host.
    #[derive(Default)]
    pub struct StaticFetcher {
        bodies: HashMap<String, Vec<u8>>,
    }

    impl StaticFetcher {
        pub fn with(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
            self.bodies.insert(url.to_string(), body.into());
            self
        }
    }

    impl Fetch for StaticFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError> {
            self.bodies
                .get(url)
                .cloned()
                .ok_or_else(|| AppError::new(EXIT_FETCH, format!("Request to {url} failed: unknown host")))
        }
    }
}
