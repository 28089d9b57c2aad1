use std::future::Future;

use reqwest::Client;

use crate::config::ScraperConfig;

/// A plain HTTP GET returning the response body.
///
/// Errors are request failures (connect, timeout, body decode, malformed
/// request). Only the transient ones are retried by the scraper.
pub trait Transport {
    type Error: std::error::Error + 'static;

    fn get(&self, url: &str) -> impl Future<Output = Result<String, Self::Error>>;

    /// Whether repeating the request could succeed.
    fn is_transient(error: &Self::Error) -> bool;
}

impl<T: Transport> Transport for &T {
    type Error = T::Error;

    fn get(&self, url: &str) -> impl Future<Output = Result<String, Self::Error>> {
        (**self).get(url)
    }

    fn is_transient(error: &Self::Error) -> bool {
        T::is_transient(error)
    }
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ScraperConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    type Error = reqwest::Error;

    async fn get(&self, url: &str) -> Result<String, reqwest::Error> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .inspect_err(|e| log::debug!("HTTP error: {e:?}"))?;

        // Error statuses still carry a page body; it is parsed, not retried.
        let status = response.status();
        if !status.is_success() {
            log::warn!("{url} answered with {status}");
        }

        response
            .text()
            .await
            .inspect_err(|e| log::debug!("Decode error: {e:?}"))
    }

    /// A request reqwest refused to build (bad URL) fails the same way every time.
    fn is_transient(error: &reqwest::Error) -> bool {
        !error.is_builder()
    }
}
